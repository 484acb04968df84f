//! Bounded A* over the walkable voxel grid.
//!
//! Moves are the four orthogonal horizontal steps, each flat or combined
//! with a one-cell rise or drop, all at uniform cost 1. The heuristic
//! `max(|dx| + |dz|, |dy|)` is admissible for that move set (one move
//! reduces horizontal Manhattan distance by at most 1 and vertical distance
//! by at most 1), so the first time the goal is popped the path is minimal.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use glam::IVec3;
use rustc_hash::{FxHashMap, FxHashSet};

use crate::walk::QueryContext;

/// Neighbor moves: four orthogonal horizontal steps × {drop, flat, rise}.
const MOVES: [(i32, i32, i32); 12] = [
    (1, -1, 0),
    (1, 0, 0),
    (1, 1, 0),
    (-1, -1, 0),
    (-1, 0, 0),
    (-1, 1, 0),
    (0, -1, 1),
    (0, 0, 1),
    (0, 1, 1),
    (0, -1, -1),
    (0, 0, -1),
    (0, 1, -1),
];

/// Tie-break ordering for equal f-scores: lower y first, then x, then z.
fn tie_key(cell: IVec3) -> (i32, i32, i32) {
    (cell.y, cell.x, cell.z)
}

fn untie(key: (i32, i32, i32)) -> IVec3 {
    IVec3::new(key.1, key.0, key.2)
}

fn heuristic(from: IVec3, to: IVec3) -> u32 {
    let d = (from - to).abs();
    (d.x + d.z).max(d.y) as u32
}

/// Finds a minimal-length walkable cell sequence from `start` to `goal`,
/// both inclusive.
///
/// The start cell itself is not checked for walkability (the agent already
/// stands there); every expanded neighbor is. Returns `None` when the goal
/// is unreachable or when `max_expanded` nodes have been expanded without
/// reaching it — the budget keeps an enclosed goal in an open world from
/// flooding every reachable cell.
pub(crate) fn find_cells(
    ctx: &mut QueryContext<'_>,
    start: IVec3,
    goal: IVec3,
    max_expanded: usize,
) -> Option<Vec<IVec3>> {
    if start == goal {
        return Some(vec![start]);
    }

    let mut open: BinaryHeap<Reverse<(u32, (i32, i32, i32))>> = BinaryHeap::new();
    let mut g_score: FxHashMap<IVec3, u32> = FxHashMap::default();
    let mut came_from: FxHashMap<IVec3, IVec3> = FxHashMap::default();
    let mut closed: FxHashSet<IVec3> = FxHashSet::default();

    g_score.insert(start, 0);
    open.push(Reverse((heuristic(start, goal), tie_key(start))));

    let mut expanded = 0usize;
    while let Some(Reverse((_, key))) = open.pop() {
        let cell = untie(key);
        if cell == goal {
            return Some(reconstruct(&came_from, start, goal));
        }
        // The heap may hold stale duplicates for re-discovered cells; the
        // closed set keeps each cell expanded once.
        if !closed.insert(cell) {
            continue;
        }
        if expanded >= max_expanded {
            tracing::debug!(
                "path search from {start} to {goal} exhausted its budget of {max_expanded} nodes"
            );
            return None;
        }
        expanded += 1;

        let g = g_score[&cell] + 1;
        for (dx, dy, dz) in MOVES {
            let next = cell + IVec3::new(dx, dy, dz);
            if closed.contains(&next) {
                continue;
            }
            if !ctx.can_walk(next) {
                continue;
            }
            if g_score.get(&next).is_some_and(|&known| known <= g) {
                continue;
            }
            g_score.insert(next, g);
            came_from.insert(next, cell);
            open.push(Reverse((g + heuristic(next, goal), tie_key(next))));
        }
    }

    None
}

/// Walks the parent links back from `goal` and returns the start→goal cell
/// sequence.
fn reconstruct(came_from: &FxHashMap<IVec3, IVec3>, start: IVec3, goal: IVec3) -> Vec<IVec3> {
    let mut cells = vec![goal];
    let mut cursor = goal;
    while cursor != start {
        cursor = came_from[&cursor];
        cells.push(cursor);
    }
    cells.reverse();
    cells
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
