//! Waypoint accumulation with vertical elbow insertion.
//!
//! Cells come out of the search as integer grid coordinates; waypoints go to
//! the caller as voxel-center positions (+0.5 on x and z, y at floor level).
//! Whenever the path changes level, an elbow waypoint splits the transition
//! so that no single segment is a diagonal rise or fall: rising inserts the
//! new level above the previous position ("step up, then walk"), dropping
//! inserts the old level above the new position ("walk, then step down").

use glam::{IVec3, Vec3};

/// Accumulates the search's accepted cells into the final waypoint list.
#[derive(Debug, Default)]
pub(crate) struct PathBuilder {
    points: Vec<Vec3>,
}

impl PathBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends the waypoint for `cell`, preceded by an elbow waypoint when
    /// the level changes.
    pub fn push(&mut self, cell: IVec3) {
        let point = Vec3::new(cell.x as f32 + 0.5, cell.y as f32, cell.z as f32 + 0.5);
        if let Some(&last) = self.points.last() {
            if point.y > last.y {
                self.points.push(Vec3::new(last.x, point.y, last.z));
            } else if point.y < last.y {
                self.points.push(Vec3::new(point.x, last.y, point.z));
            }
        }
        self.points.push(point);
    }

    /// Returns the waypoints with the leading start-cell point removed — the
    /// caller supplied the start position and does not need it back.
    pub fn into_waypoints(self) -> Vec<Vec3> {
        let mut points = self.points;
        if !points.is_empty() {
            points.remove(0);
        }
        points
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn build(cells: &[(i32, i32, i32)]) -> Vec<Vec3> {
        let mut builder = PathBuilder::new();
        for &(x, y, z) in cells {
            builder.push(IVec3::new(x, y, z));
        }
        builder.into_waypoints()
    }

    #[test]
    fn test_flat_path_offsets_to_voxel_centers() {
        let points = build(&[(0, 0, 0), (1, 0, 0), (1, 0, 1)]);
        assert_eq!(
            points,
            vec![Vec3::new(1.5, 0.0, 0.5), Vec3::new(1.5, 0.0, 1.5)]
        );
    }

    #[test]
    fn test_rise_inserts_elbow_at_previous_position() {
        let points = build(&[(0, 0, 0), (1, 1, 0)]);
        assert_eq!(
            points,
            vec![Vec3::new(0.5, 1.0, 0.5), Vec3::new(1.5, 1.0, 0.5)]
        );
    }

    #[test]
    fn test_drop_inserts_elbow_at_new_position() {
        let points = build(&[(0, 1, 0), (1, 0, 0)]);
        assert_eq!(
            points,
            vec![Vec3::new(1.5, 1.0, 0.5), Vec3::new(1.5, 0.0, 0.5)]
        );
    }

    #[test]
    fn test_no_segment_mixes_vertical_and_horizontal() {
        let points = build(&[
            (0, 0, 0),
            (1, 1, 0),
            (2, 2, 0),
            (2, 2, 1),
            (3, 1, 1),
            (4, 1, 1),
        ]);
        for pair in points.windows(2) {
            let vertical = pair[0].y != pair[1].y;
            let horizontal = pair[0].x != pair[1].x || pair[0].z != pair[1].z;
            assert!(
                !(vertical && horizontal),
                "diagonal segment {:?} -> {:?}",
                pair[0],
                pair[1]
            );
        }
    }

    #[test]
    fn test_single_cell_path_collapses_to_empty() {
        assert!(build(&[(7, 0, 7)]).is_empty());
        assert!(build(&[]).is_empty());
    }
}
