pub mod stream_group;
pub mod stream_id;

pub use crate::types::streams::stream_group::StreamGroup;
pub use crate::types::streams::stream_id::{SourceFamily, StreamId, StreamKind};
