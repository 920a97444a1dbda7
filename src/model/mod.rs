//! Skeleton nodes, ids and the output record model.

mod ids;
mod record;

pub use ids::{NodeId, SynapseId};
pub use record::{SkeletonNode, SynapseRecord};
