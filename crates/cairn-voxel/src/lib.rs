//! Sparse chunked voxel world: lazy chunk generation, residency tracking,
//! change notification, and modified-chunk persistence.

pub mod bounds;
pub mod chunk;
pub mod events;
pub mod key;
pub mod store;

pub use bounds::ChunkBounds;
pub use chunk::{CHUNK_SIZE, CHUNK_VOLUME, ChunkData};
pub use events::{ChangeListeners, ListenerId, VoxelChange};
pub use key::{ChunkKey, KeyParseError};
pub use store::{ArchiveError, ChunkArchive, ChunkStore, LoadedSet, VoxelGenerator};
