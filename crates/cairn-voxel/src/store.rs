//! The chunked voxel store: lazy chunk arena, residency set, change events,
//! and the modified-chunk persistence surface.
//!
//! Chunks are created on first access and populated by an injected generator
//! callback, so any world coordinate is valid at any time — missing terrain
//! simply reads as Air. The store is the single authority for voxel data;
//! meshing, physics, and pathfinding all read through it.

use glam::IVec3;
use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};

use crate::bounds::ChunkBounds;
use crate::chunk::{CHUNK_SIZE, CHUNK_VOLUME, ChunkData};
use crate::events::{ChangeListeners, ListenerId, VoxelChange};
use crate::key::{ChunkKey, KeyParseError};

/// Injected terrain callback: world voxel coordinate → voxel id.
///
/// Must be pure: the same coordinate always yields the same id. Invoked at
/// most once per cell per store lifetime (until [`ChunkStore::clear_chunks`]).
pub type VoxelGenerator = Box<dyn Fn(i32, i32, i32) -> u8>;

/// Residency bookkeeping: the chunk keys currently wanted by streaming
/// collaborators, in scan order, plus the origin of the last
/// [`load_chunks`](ChunkStore::load_chunks) call.
///
/// Dropping a key from this list does not evict the chunk's data.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LoadedSet {
    /// Resident chunk keys, box scan order first, merged survivors after.
    pub chunks: Vec<ChunkKey>,
    /// Origin of the residency box, `None` before the first load.
    pub origin: Option<ChunkKey>,
}

/// Snapshot of every modified chunk: canonical key string → raw 16³ byte
/// payload.
///
/// Derives serde so callers can embed it in whatever save format they use.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkArchive(pub FxHashMap<String, Vec<u8>>);

impl ChunkArchive {
    /// Number of chunks in the archive.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the archive holds no chunks.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Why an archive entry was rejected during import.
#[derive(Debug, thiserror::Error)]
pub enum ArchiveError {
    /// The entry's key is not three `:`-separated integers.
    #[error("unparseable chunk key {key:?}: {source}")]
    BadKey {
        key: String,
        #[source]
        source: KeyParseError,
    },
    /// The entry's payload is not exactly one chunk worth of bytes.
    #[error("chunk {key} payload has {actual} bytes, expected {expected}")]
    BadPayload {
        key: ChunkKey,
        expected: usize,
        actual: usize,
    },
}

/// Sparse chunked voxel world.
///
/// Owns the chunk arena, the injected generator, the change-listener list,
/// and the residency set. All mutation goes through `&mut self`; callers
/// needing concurrent access must synchronize externally.
pub struct ChunkStore {
    chunks: FxHashMap<ChunkKey, ChunkData>,
    generator: Option<VoxelGenerator>,
    listeners: ChangeListeners,
    loaded: LoadedSet,
}

impl ChunkStore {
    /// Creates a store. With `None`, ungenerated terrain is all Air.
    pub fn new(generator: Option<VoxelGenerator>) -> Self {
        Self {
            chunks: FxHashMap::default(),
            generator,
            listeners: ChangeListeners::new(),
            loaded: LoadedSet::default(),
        }
    }

    /// Returns the voxel id at a world coordinate.
    ///
    /// Never fails: if the containing chunk does not exist yet it is created
    /// and generated as a side effect, which is why reads take `&mut self`.
    pub fn get_voxel(&mut self, world: IVec3) -> u8 {
        let (key, local) = ChunkKey::from_world(world);
        self.chunk_mut_or_create(key)
            .get(local.x as usize, local.y as usize, local.z as usize)
    }

    /// Writes the voxel id at a world coordinate, marks the chunk modified,
    /// and notifies every registered listener.
    ///
    /// The notification fires even when the written value equals the previous
    /// one; listeners see every write, not every change of state.
    pub fn set_voxel(&mut self, world: IVec3, value: u8) {
        let (key, local) = ChunkKey::from_world(world);
        self.chunk_mut_or_create(key)
            .set(local.x as usize, local.y as usize, local.z as usize, value);
        self.listeners.dispatch(&VoxelChange {
            position: world,
            value,
        });
    }

    /// Registers a change listener; see [`ChangeListeners`] for the delivery
    /// contract.
    pub fn add_listener(&mut self, callback: impl FnMut(&VoxelChange) + 'static) -> ListenerId {
        self.listeners.add(callback)
    }

    /// Unregisters a change listener. Returns `false` for unknown handles.
    pub fn remove_listener(&mut self, id: ListenerId) -> bool {
        self.listeners.remove(id)
    }

    /// The current residency set.
    pub fn loaded(&self) -> &LoadedSet {
        &self.loaded
    }

    /// Recomputes the residency set for the box `[origin+min, origin+max)`.
    ///
    /// Every chunk in the box is materialized (and generated) as it is
    /// visited, z outermost. Previously-resident keys outside the box survive
    /// if they still fall inside the doubled window
    /// `origin + bounds*2` — checked purely in chunk space — and are appended
    /// after the box keys; everything else is dropped from the residency list
    /// only, with its data left in the arena.
    pub fn load_chunks(&mut self, origin: ChunkKey, bounds: ChunkBounds) {
        let mut next = Vec::with_capacity(bounds.len());
        let mut seen = FxHashSet::default();
        for offset in bounds.iter() {
            let key = origin.offset(offset.x, offset.y, offset.z);
            self.chunk_mut_or_create(key);
            if seen.insert(key) {
                next.push(key);
            }
        }

        let window = bounds.scaled(2);
        let previous = std::mem::take(&mut self.loaded);
        for key in previous.chunks {
            if seen.contains(&key) {
                continue;
            }
            let relative = IVec3::new(key.x - origin.x, key.y - origin.y, key.z - origin.z);
            if window.contains(relative) && seen.insert(key) {
                next.push(key);
            }
        }

        self.loaded = LoadedSet {
            chunks: next,
            origin: Some(origin),
        };
    }

    /// Drops all chunk data and resets residency — a full world reset.
    ///
    /// The generator will run again on the next access of any coordinate.
    /// Listeners stay registered.
    pub fn clear_chunks(&mut self) {
        self.chunks.clear();
        self.loaded = LoadedSet::default();
    }

    /// Serializes every modified chunk into an archive keyed by the canonical
    /// key string. Generated-but-untouched chunks are skipped.
    pub fn export_chunks(&self) -> ChunkArchive {
        let mut archive = ChunkArchive::default();
        for (key, chunk) in &self.chunks {
            if chunk.is_modified() {
                archive.0.insert(key.to_string(), chunk.bytes().to_vec());
            }
        }
        archive
    }

    /// Restores chunks from an archive, replacing any existing chunk at the
    /// same key wholesale (no merge with prior content). Restored chunks are
    /// marked modified so a later export emits them again.
    ///
    /// Malformed entries (unparseable key, wrong-length payload) are skipped
    /// with a warning and never touch other chunks. Returns the number of
    /// chunks actually restored.
    pub fn import_chunks(&mut self, archive: &ChunkArchive) -> usize {
        let mut imported = 0;
        for (key, bytes) in &archive.0 {
            match self.restore_entry(key, bytes) {
                Ok(()) => imported += 1,
                Err(err) => tracing::warn!("import_chunks: skipping entry: {err}"),
            }
        }
        imported
    }

    /// Direct read access to a chunk, for collaborators that walk resident
    /// chunks (the mesher). Does not create the chunk.
    pub fn chunk(&self, key: ChunkKey) -> Option<&ChunkData> {
        self.chunks.get(&key)
    }

    /// Number of chunks currently materialized in the arena.
    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    fn restore_entry(&mut self, key: &str, bytes: &[u8]) -> Result<(), ArchiveError> {
        let parsed: ChunkKey = key.parse().map_err(|source| ArchiveError::BadKey {
            key: key.to_string(),
            source,
        })?;
        let chunk = ChunkData::from_bytes(bytes, true).ok_or(ArchiveError::BadPayload {
            key: parsed,
            expected: CHUNK_VOLUME,
            actual: bytes.len(),
        })?;
        self.chunks.insert(parsed, chunk);
        Ok(())
    }

    /// The lazy-map core: looks the chunk up, creating and generating it on
    /// first access.
    fn chunk_mut_or_create(&mut self, key: ChunkKey) -> &mut ChunkData {
        self.chunks
            .entry(key)
            .or_insert_with(|| Self::generate_chunk(key, self.generator.as_deref()))
    }

    /// Fills a fresh chunk from the generator, z outermost, then y, then x —
    /// the same order as the linear voxel index, so the running index walks
    /// the array front to back.
    fn generate_chunk(key: ChunkKey, generator: Option<&(dyn Fn(i32, i32, i32) -> u8)>) -> ChunkData {
        let mut data = ChunkData::new();
        let Some(generate) = generator else {
            return data;
        };
        let origin = key.origin();
        let voxels = data.voxels_mut();
        let mut i = 0;
        for z in 0..CHUNK_SIZE as i32 {
            for y in 0..CHUNK_SIZE as i32 {
                for x in 0..CHUNK_SIZE as i32 {
                    voxels[i] = generate(origin.x + x, origin.y + y, origin.z + z);
                    i += 1;
                }
            }
        }
        data
    }
}

impl Default for ChunkStore {
    fn default() -> Self {
        Self::new(None)
    }
}

impl std::fmt::Debug for ChunkStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChunkStore")
            .field("chunks", &self.chunks.len())
            .field("listeners", &self.listeners.len())
            .field("loaded", &self.loaded.chunks.len())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
