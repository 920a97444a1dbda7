//! Label-kind marker types.
//!
//! A raw slice and a normalized slice have the same layout but very
//! different meaning: raw labels are only unique within their slice, while
//! normalized labels are global synapse ids. The markers keep the two from
//! being mixed up.

use std::fmt;

/// Marker for per-slice connected-component labels.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub enum Raw {}

/// Marker for globally consistent synapse ids.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub enum Normalized {}

impl fmt::Debug for Raw {
    fn fmt(&self, _: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {}
    }
}

impl fmt::Debug for Normalized {
    fn fmt(&self, _: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {}
    }
}
