//! Half-open time windows `[start_at, end_at)`.
//!
//! Every care request and assignment carries one. A `Window` can only be built
//! through [`Window::new`], so holding one means `end_at > start_at`.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::api::error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Window {
    start_at: DateTime<Utc>,
    end_at: DateTime<Utc>,
}

/// Strict overlap of `[s1, e1)` and `[s2, e2)`. Touching windows do not overlap.
pub fn overlaps<T: PartialOrd>(s1: T, e1: T, s2: T, e2: T) -> bool {
    s1 < e2 && s2 < e1
}

impl Window {
    pub fn new(start_at: DateTime<Utc>, end_at: DateTime<Utc>) -> Result<Self, error::SystemError> {
        if end_at > start_at {
            Ok(Window { start_at, end_at })
        } else {
            Err(error::SystemError::InvalidInterval)
        }
    }

    pub fn start_at(&self) -> DateTime<Utc> {
        self.start_at
    }

    pub fn end_at(&self) -> DateTime<Utc> {
        self.end_at
    }

    pub fn overlaps(&self, other: &Window) -> bool {
        overlaps(self.start_at, self.end_at, other.start_at, other.end_at)
    }

    /// `inner` lies entirely within `self`; equal windows contain each other.
    pub fn contains(&self, inner: &Window) -> bool {
        self.start_at <= inner.start_at && inner.end_at <= self.end_at
    }

    pub fn hours(&self) -> f64 {
        (self.end_at - self.start_at).num_seconds() as f64 / 3600.0
    }
}
