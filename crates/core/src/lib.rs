//! Core library for trackertools
//!
//! This crate implements the **Functional Core** of the trackertools application,
//! following the Functional Core - Imperative Shell architectural pattern.
//!
//! # Architecture Overview
//!
//! - **`trackertools_core`** (this crate): Pure transformation functions with zero I/O
//! - **`trackertools`**: HTTP client, CLI and MCP server (the Imperative Shell)
//!
//! Every function in this crate is deterministic and free of side effects, so
//! it can be tested with fixture data and no mocking.
//!
//! # Module Organization
//!
//! - [`fields`]: Parser, tree model and editor for YouTrack field selectors
//!   (`id,project(id,name)`), plus the default selector for each resource
//! - [`pagination`]: `$top`/`$skip` clamping
//! - [`youtrack`]: Transformations from YouTrack API responses to output models and text
//!
//! # Example Usage
//!
//! ```rust,ignore
//! use trackertools_core::fields::{presets, remove_field};
//!
//! let mut selector = presets::issue_summary();
//! selector.add("project.leader.login");
//!
//! let selector = remove_field(&selector.build(), "customFields");
//! assert!(selector.contains("project(id,name,shortName,leader(login))"));
//! ```

pub mod fields;
pub mod pagination;
pub mod youtrack;
