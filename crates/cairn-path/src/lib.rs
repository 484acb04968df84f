//! Grid pathfinding over the chunked voxel world: walkability with clearance
//! and dynamic obstacles, bounded A* search, and step-segmented path output.

mod path;
mod search;

pub mod pathfinder;
pub mod walk;

pub use pathfinder::{DEFAULT_MAX_EXPANDED, Pathfinder};
pub use walk::ObstacleSet;
