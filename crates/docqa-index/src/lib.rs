//! docqa-index
//!
//! Exact nearest-neighbor search by cosine similarity over L2-normalized
//! vectors, with parallel passage metadata, directory persistence and a
//! swappable shared handle.

pub mod index;
pub mod normalize;
pub mod persist;
pub mod shared;

pub use index::VectorIndex;
pub use normalize::{normalize, normalized, NORM_EPSILON};
pub use persist::{read_manifest, IndexManifest};
pub use shared::SharedIndex;
