//! Newtype IDs for type-safe identification of synapses and skeleton nodes.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A global synapse id, as assigned by the slice relabeler.
///
/// Id `0` is never assigned to an object; it is the background label.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SynapseId(pub u32);

impl SynapseId {
    /// Creates a new SynapseId.
    #[inline]
    pub fn new(id: u32) -> Self {
        Self(id)
    }

    /// Returns the underlying u32 value.
    #[inline]
    pub fn as_u32(&self) -> u32 {
        self.0
    }
}

impl fmt::Debug for SynapseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SynapseId({})", self.0)
    }
}

impl fmt::Display for SynapseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for SynapseId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

/// The id of a skeleton node, as given by the skeleton source.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub u64);

impl NodeId {
    /// Creates a new NodeId.
    #[inline]
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the underlying u64 value.
    #[inline]
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({})", self.0)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for NodeId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_ordering() {
        assert!(SynapseId(1) < SynapseId(2));
        assert!(NodeId(10) > NodeId(5));
    }

    #[test]
    fn test_id_display() {
        assert_eq!(SynapseId::new(42).to_string(), "42");
        assert_eq!(format!("{:?}", NodeId::new(7)), "NodeId(7)");
    }
}
