pub use crate::config::{Column, IndexConfig, LoadConfig};
pub use crate::identity::ProteinId;
pub use crate::index::{KmerIndex, ProteinEntry, QueryResult};
pub use crate::loader::LoadStats;
pub use crate::voting::{AnnotationVoter, Proposal};
pub use crate::Result;
