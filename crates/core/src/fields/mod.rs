//! Field selector builder
//!
//! YouTrack's REST API takes a `fields` query parameter written in a small
//! selector language that lists which nested attributes to return:
//!
//! ```text
//! forest = [ field *( "," field ) ]
//! field  = name [ "(" forest ")" ]
//! name   = *any-char-except "(),"   ; trimmed
//! ```
//!
//! A selector has no single root, so it is modeled as a forest
//! (`Vec<FieldNode>`). The parser and serializer in this module are the only
//! place the grammar lives; [`FieldBuilder`], [`add_field`] and
//! [`remove_field`] all edit a parsed forest and serialize it again.
//!
//! Everything here is total. Malformed selectors are recovered from rather
//! than rejected (see [`parse_field_string`]), and unresolved paths make the
//! path operations return their input unchanged.

mod builder;
mod node;
mod parser;
pub mod presets;
mod serializer;

pub use builder::{add_field, remove_field, FieldBuilder};
pub use node::{forest_depth, FieldNode};
pub use parser::parse_field_string;
pub use serializer::serialize_field_structure;
