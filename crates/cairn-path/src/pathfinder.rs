//! The pathfinding component: obstacle overlay, path queries, ground probe.

use cairn_voxel::ChunkStore;
use glam::Vec3;

use crate::path::PathBuilder;
use crate::search;
use crate::walk::{ObstacleSet, QueryContext};

/// Default bound on A* node expansion per query.
pub const DEFAULT_MAX_EXPANDED: usize = 16_384;

/// Computes walkable paths and ground levels over a [`ChunkStore`].
///
/// Owns the dynamic obstacle overlay on behalf of the caller layer. Each
/// query borrows the store exclusively for its duration and keeps all its
/// working state in a per-call context, so a pathfinder can be shared freely
/// between sequential callers.
#[derive(Debug)]
pub struct Pathfinder {
    obstacles: ObstacleSet,
    max_expanded: usize,
}

impl Pathfinder {
    /// Creates a pathfinder with an empty obstacle overlay and the default
    /// search budget.
    pub fn new() -> Self {
        Self {
            obstacles: ObstacleSet::new(),
            max_expanded: DEFAULT_MAX_EXPANDED,
        }
    }

    /// Overrides the per-query node budget. Lower values trade completeness
    /// on large open worlds for bounded latency.
    pub fn with_max_expanded(mut self, max_expanded: usize) -> Self {
        self.max_expanded = max_expanded;
        self
    }

    /// Blocks the voxel containing `position` for subsequent queries.
    pub fn add_obstacle(&mut self, position: Vec3) {
        self.obstacles.insert(position);
    }

    /// Unblocks the voxel containing `position`.
    pub fn remove_obstacle(&mut self, position: Vec3) {
        self.obstacles.remove(position);
    }

    /// The current obstacle overlay.
    pub fn obstacles(&self) -> &ObstacleSet {
        &self.obstacles
    }

    /// Computes a walkable path for an agent of the given clearance height.
    ///
    /// `from` and `to` are floored to voxel coordinates. The result is the
    /// waypoint sequence excluding the start cell, with an elbow waypoint
    /// splitting every level change so no segment is diagonal in y; it is
    /// empty when no path exists — that is a normal answer, not an error.
    pub fn get_path(&self, store: &mut ChunkStore, from: Vec3, to: Vec3, height: u32) -> Vec<Vec3> {
        let start = from.floor().as_ivec3();
        let goal = to.floor().as_ivec3();
        let mut ctx = QueryContext::new(store, height, &self.obstacles);
        let Some(cells) = search::find_cells(&mut ctx, start, goal, self.max_expanded) else {
            return Vec::new();
        };
        let mut builder = PathBuilder::new();
        for cell in cells {
            builder.push(cell);
        }
        builder.into_waypoints()
    }

    /// Probes straight down from `position` for the highest walkable cell at
    /// or above `min_y`.
    ///
    /// `position` is floored, then its y is decremented one cell at a time;
    /// on success it is left at the found level and the probe returns `true`.
    /// On failure it returns `false` with the y resting one below `min_y`.
    /// A linear probe, not a search.
    pub fn ground(
        &self,
        store: &mut ChunkStore,
        position: &mut Vec3,
        height: u32,
        min_y: i32,
    ) -> bool {
        *position = position.floor();
        let mut ctx = QueryContext::new(store, height, &self.obstacles);
        while position.y >= min_y as f32 {
            if ctx.can_walk(position.as_ivec3()) {
                return true;
            }
            position.y -= 1.0;
        }
        false
    }
}

impl Default for Pathfinder {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use glam::IVec3;

    /// Solid floor at y == 0, air everywhere else.
    fn flat_floor() -> ChunkStore {
        ChunkStore::new(Some(Box::new(|_, y, _| u8::from(y == 0))))
    }

    /// One-cell-wide corridor along x at z == 0, with a solid floor.
    fn corridor() -> ChunkStore {
        ChunkStore::new(Some(Box::new(|x, y, z| {
            u8::from(y == 0 && z == 0 && (0..=8).contains(&x))
        })))
    }

    #[test]
    fn test_path_over_flat_ground() {
        let mut store = flat_floor();
        let finder = Pathfinder::new();

        let path = finder.get_path(
            &mut store,
            Vec3::new(0.4, 0.0, 0.6),
            Vec3::new(4.0, 0.0, 0.0),
            1,
        );

        assert_eq!(path.len(), 4);
        assert_eq!(path.last(), Some(&Vec3::new(4.5, 0.0, 0.5)));
        assert!(path.iter().all(|p| p.y == 0.0));
    }

    #[test]
    fn test_rising_path_contains_elbows_and_no_diagonals() {
        // Three-step staircase along x at z == 0.
        let mut store = ChunkStore::new(Some(Box::new(|x, y, z| {
            u8::from(z == 0 && (0..=2).contains(&x) && y == x)
        })));
        let finder = Pathfinder::new();

        let path = finder.get_path(
            &mut store,
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(2.0, 2.0, 0.0),
            0,
        );

        assert_eq!(
            path,
            vec![
                Vec3::new(0.5, 1.0, 0.5), // elbow: step up at the old column
                Vec3::new(1.5, 1.0, 0.5),
                Vec3::new(1.5, 2.0, 0.5), // elbow again
                Vec3::new(2.5, 2.0, 0.5),
            ]
        );
        for pair in path.windows(2) {
            let vertical = pair[0].y != pair[1].y;
            let horizontal = pair[0].x != pair[1].x || pair[0].z != pair[1].z;
            assert!(!(vertical && horizontal), "diagonal segment in {path:?}");
        }
    }

    #[test]
    fn test_obstacle_blocks_and_unblocks_a_corridor() {
        let mut store = corridor();
        let mut finder = Pathfinder::new().with_max_expanded(2_000);
        let from = Vec3::new(0.0, 0.0, 0.0);
        let to = Vec3::new(8.0, 0.0, 0.0);

        assert_eq!(finder.get_path(&mut store, from, to, 1).len(), 8);

        finder.add_obstacle(Vec3::new(4.0, 0.0, 0.0));
        assert!(finder.get_path(&mut store, from, to, 1).is_empty());

        finder.remove_obstacle(Vec3::new(4.2, 0.9, 0.1));
        assert_eq!(finder.get_path(&mut store, from, to, 1).len(), 8);
    }

    #[test]
    fn test_clearance_height_routes_around_low_ceiling() {
        // Corridor with a ceiling block two cells above the floor at x == 4.
        let mut store = ChunkStore::new(Some(Box::new(|x, y, z| {
            u8::from((y == 0 && z == 0 && (0..=8).contains(&x)) || (x == 4 && y == 2 && z == 0))
        })));
        let from = Vec3::new(0.0, 0.0, 0.0);
        let to = Vec3::new(8.0, 0.0, 0.0);
        let finder = Pathfinder::new().with_max_expanded(2_000);

        // A short agent passes under the ceiling.
        assert_eq!(finder.get_path(&mut store, from, to, 1).len(), 8);
        // A tall agent cannot, and the corridor has no way around.
        assert!(finder.get_path(&mut store, from, to, 2).is_empty());
    }

    #[test]
    fn test_enclosed_goal_yields_empty_path() {
        let mut store = flat_floor();
        let mut finder = Pathfinder::new().with_max_expanded(1_000);
        let goal = Vec3::new(10.0, 0.0, 10.0);

        // On flat ground the only approaches are the four level neighbors.
        for (dx, dz) in [(1.0, 0.0), (-1.0, 0.0), (0.0, 1.0), (0.0, -1.0)] {
            finder.add_obstacle(goal + Vec3::new(dx, 0.0, dz));
        }

        let path = finder.get_path(&mut store, Vec3::new(0.0, 0.0, 0.0), goal, 1);
        assert!(path.is_empty());
    }

    #[test]
    fn test_start_equals_goal_is_empty() {
        let mut store = flat_floor();
        let finder = Pathfinder::new();
        let p = Vec3::new(3.0, 0.0, 3.0);
        assert!(finder.get_path(&mut store, p, p, 1).is_empty());
    }

    #[test]
    fn test_ground_probe_finds_highest_walkable_level() {
        let mut store = flat_floor();
        let finder = Pathfinder::new();

        let mut position = Vec3::new(5.3, 10.9, 5.1);
        assert!(finder.ground(&mut store, &mut position, 1, 0));
        assert_eq!(position, Vec3::new(5.0, 0.0, 5.0));
    }

    #[test]
    fn test_ground_probe_respects_min_y_and_obstacles() {
        let mut store = flat_floor();
        let mut finder = Pathfinder::new();

        // The floor cell itself is blocked: nothing walkable above min_y.
        finder.add_obstacle(Vec3::new(2.0, 0.0, 2.0));
        let mut position = Vec3::new(2.0, 5.0, 2.0);
        assert!(!finder.ground(&mut store, &mut position, 1, 0));
        assert_eq!(position.y, -1.0);

        // A min_y above the floor stops the probe before it reaches ground.
        let mut high_floor = Vec3::new(5.0, 4.0, 5.0);
        assert!(!finder.ground(&mut store, &mut high_floor, 1, 1));
        assert_eq!(high_floor.y, 0.0);
    }

    #[test]
    fn test_ground_probe_with_clearance() {
        // Solid at y == 0 and an obstructed ledge at y == 2: a height-2
        // agent fits nowhere in the column, a height-1 agent reaches the
        // floor beneath the ledge.
        let mut store = ChunkStore::default();
        store.set_voxel(IVec3::new(7, 0, 7), 1);
        store.set_voxel(IVec3::new(7, 2, 7), 1);
        let mut finder = Pathfinder::new();
        finder.add_obstacle(Vec3::new(7.0, 2.0, 7.0));

        let mut tall = Vec3::new(7.0, 6.0, 7.0);
        assert!(!finder.ground(&mut store, &mut tall, 2, 0));

        let mut short = Vec3::new(7.0, 6.0, 7.0);
        assert!(finder.ground(&mut store, &mut short, 1, 0));
        assert_eq!(short.y, 0.0);
    }
}
