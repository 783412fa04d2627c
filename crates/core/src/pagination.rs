//! Offset pagination helpers
//!
//! YouTrack pages collections with `$top` and `$skip`. These pure functions
//! clamp caller-provided limits into the range the tools accept and work out
//! where the next page starts.

use serde::Serialize;

/// Page size used when the caller does not ask for one.
pub const DEFAULT_LIMIT: usize = 10;

/// Largest page size the tools will request.
pub const MAX_LIMIT: usize = 100;

/// Clamp a requested page size into `1..=MAX_LIMIT`.
pub fn clamp_limit(limit: Option<usize>) -> usize {
    limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT)
}

/// A `$top`/`$skip` window over a collection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageWindow {
    pub top: usize,
    pub skip: usize,
}

impl PageWindow {
    pub fn new(limit: Option<usize>, skip: Option<usize>) -> Self {
        Self {
            top: clamp_limit(limit),
            skip: skip.unwrap_or(0),
        }
    }

    /// The following window, if the server filled this one.
    ///
    /// YouTrack does not return a total count, so a full page is the only
    /// signal that more results may exist.
    pub fn next(&self, returned: usize) -> Option<PageWindow> {
        if returned >= self.top {
            Some(PageWindow {
                top: self.top,
                skip: self.skip + self.top,
            })
        } else {
            None
        }
    }

    /// Query parameters for this window.
    pub fn query_params(&self) -> [(&'static str, String); 2] {
        [("$top", self.top.to_string()), ("$skip", self.skip.to_string())]
    }
}

impl Default for PageWindow {
    fn default() -> Self {
        Self::new(None, None)
    }
}
