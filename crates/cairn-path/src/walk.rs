//! Walkability: the obstacle overlay and the per-query predicate.
//!
//! An agent occupies a solid floor cell and needs `height` empty cells of
//! headroom above it. The obstacle overlay blocks cells independently of
//! terrain, for transient blockers such as other agents.

use cairn_voxel::ChunkStore;
use glam::{IVec3, Vec3};
use rustc_hash::FxHashSet;

/// Transient blocked cells at voxel granularity, independent of terrain.
#[derive(Debug, Default)]
pub struct ObstacleSet {
    cells: FxHashSet<IVec3>,
}

impl ObstacleSet {
    /// Creates an empty overlay.
    pub fn new() -> Self {
        Self::default()
    }

    /// Blocks the voxel containing `position`.
    pub fn insert(&mut self, position: Vec3) {
        self.cells.insert(position.floor().as_ivec3());
    }

    /// Unblocks the voxel containing `position`.
    pub fn remove(&mut self, position: Vec3) {
        self.cells.remove(&position.floor().as_ivec3());
    }

    /// Whether the given cell is blocked.
    pub fn contains(&self, cell: IVec3) -> bool {
        self.cells.contains(&cell)
    }

    /// Number of blocked cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Returns `true` if no cell is blocked.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// Per-query view binding the voxel oracle, the clearance height, and the
/// obstacle overlay.
///
/// Built fresh for every query, so nothing mutable is shared between
/// queries; the borrow of the store also makes overlapping queries on one
/// store impossible by construction.
pub(crate) struct QueryContext<'a> {
    store: &'a mut ChunkStore,
    height: u32,
    obstacles: &'a ObstacleSet,
}

impl<'a> QueryContext<'a> {
    pub fn new(store: &'a mut ChunkStore, height: u32, obstacles: &'a ObstacleSet) -> Self {
        Self {
            store,
            height,
            obstacles,
        }
    }

    /// Whether an agent of the query's height can occupy `cell`.
    ///
    /// Requires a solid voxel at the cell itself (the floor), no obstacle on
    /// it, and `height` empty voxels above it.
    pub fn can_walk(&mut self, cell: IVec3) -> bool {
        if self.store.get_voxel(cell) == 0 {
            return false;
        }
        if self.obstacles.contains(cell) {
            return false;
        }
        for step in 1..=self.height as i32 {
            if self.store.get_voxel(cell + IVec3::new(0, step, 0)) != 0 {
                return false;
            }
        }
        true
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_cell_is_not_walkable() {
        let mut store = ChunkStore::default();
        let obstacles = ObstacleSet::new();
        let mut ctx = QueryContext::new(&mut store, 0, &obstacles);
        assert!(!ctx.can_walk(IVec3::new(0, 0, 0)));
    }

    #[test]
    fn test_clearance_height_checks_exactly_height_cells() {
        let mut store = ChunkStore::default();
        store.set_voxel(IVec3::new(0, 0, 0), 1);
        store.set_voxel(IVec3::new(0, 3, 0), 1); // above the headroom window
        let obstacles = ObstacleSet::new();

        let mut ctx = QueryContext::new(&mut store, 2, &obstacles);
        assert!(ctx.can_walk(IVec3::new(0, 0, 0)));

        store.set_voxel(IVec3::new(0, 2, 0), 1); // inside the window
        let mut ctx = QueryContext::new(&mut store, 2, &obstacles);
        assert!(!ctx.can_walk(IVec3::new(0, 0, 0)));

        // A shorter agent fits under it.
        let mut ctx = QueryContext::new(&mut store, 1, &obstacles);
        assert!(ctx.can_walk(IVec3::new(0, 0, 0)));
    }

    #[test]
    fn test_obstacle_blocks_regardless_of_material() {
        let mut store = ChunkStore::default();
        store.set_voxel(IVec3::new(4, 0, 4), 1);
        let mut obstacles = ObstacleSet::new();
        obstacles.insert(Vec3::new(4.7, 0.2, 4.9)); // floors to (4, 0, 4)

        let mut ctx = QueryContext::new(&mut store, 0, &obstacles);
        assert!(!ctx.can_walk(IVec3::new(4, 0, 4)));

        obstacles.remove(Vec3::new(4.1, 0.0, 4.3));
        let mut ctx = QueryContext::new(&mut store, 0, &obstacles);
        assert!(ctx.can_walk(IVec3::new(4, 0, 4)));
    }

    #[test]
    fn test_obstacle_positions_floor_for_negative_coordinates() {
        let mut obstacles = ObstacleSet::new();
        obstacles.insert(Vec3::new(-0.5, 0.0, -1.2));
        assert!(obstacles.contains(IVec3::new(-1, 0, -2)));
        assert_eq!(obstacles.len(), 1);
    }

    #[test]
    fn test_zero_height_needs_no_headroom() {
        let mut store = ChunkStore::default();
        store.set_voxel(IVec3::new(0, 0, 0), 1);
        store.set_voxel(IVec3::new(0, 1, 0), 1); // directly above
        let obstacles = ObstacleSet::new();

        let mut ctx = QueryContext::new(&mut store, 0, &obstacles);
        assert!(ctx.can_walk(IVec3::new(0, 0, 0)));
    }
}
