//! Axis-aligned chunk-unit boxes used by the residency scan.

use glam::IVec3;

/// Half-open `[min, max)` box in chunk units, relative to a residency origin.
///
/// Invariant: `min.x <= max.x`, `min.y <= max.y`, `min.z <= max.z`. The
/// constructor enforces this by sorting components.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ChunkBounds {
    pub min: IVec3,
    pub max: IVec3,
}

impl ChunkBounds {
    /// Creates a box from two corners, sorting components so that
    /// `min <= max` on every axis.
    pub fn new(a: IVec3, b: IVec3) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    /// Creates the symmetric box `[-half, half)` around the origin.
    pub fn from_half_extent(half: IVec3) -> Self {
        Self::new(-half, half)
    }

    /// Returns `true` if the point lies inside the half-open box.
    pub fn contains(&self, p: IVec3) -> bool {
        p.x >= self.min.x
            && p.x < self.max.x
            && p.y >= self.min.y
            && p.y < self.max.y
            && p.z >= self.min.z
            && p.z < self.max.z
    }

    /// Returns the box with both corners scaled by `factor`.
    ///
    /// `scaled(2)` is the relaxed window the residency merge checks retained
    /// chunks against.
    pub fn scaled(&self, factor: i32) -> Self {
        Self::new(self.min * factor, self.max * factor)
    }

    /// Iterates every cell of the box, z outermost, then y, then x.
    pub fn iter(self) -> impl Iterator<Item = IVec3> {
        let (min, max) = (self.min, self.max);
        (min.z..max.z).flat_map(move |z| {
            (min.y..max.y)
                .flat_map(move |y| (min.x..max.x).map(move |x| IVec3::new(x, y, z)))
        })
    }

    /// Number of cells in the box.
    pub fn len(&self) -> usize {
        let d = (self.max - self.min).max(IVec3::ZERO);
        d.x as usize * d.y as usize * d.z as usize
    }

    /// Returns `true` if the box spans no cells.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constructor_sorts_corners() {
        let b = ChunkBounds::new(IVec3::new(2, -1, 0), IVec3::new(-2, 1, 3));
        assert_eq!(b.min, IVec3::new(-2, -1, 0));
        assert_eq!(b.max, IVec3::new(2, 1, 3));
    }

    #[test]
    fn test_contains_is_half_open() {
        let b = ChunkBounds::new(IVec3::splat(-1), IVec3::splat(2));
        assert!(b.contains(IVec3::new(-1, -1, -1)));
        assert!(b.contains(IVec3::new(1, 1, 1)));
        assert!(!b.contains(IVec3::new(2, 0, 0)));
        assert!(!b.contains(IVec3::new(0, -2, 0)));
    }

    #[test]
    fn test_iter_order_is_z_then_y_then_x() {
        let b = ChunkBounds::new(IVec3::ZERO, IVec3::new(2, 1, 2));
        let cells: Vec<IVec3> = b.iter().collect();
        assert_eq!(
            cells,
            vec![
                IVec3::new(0, 0, 0),
                IVec3::new(1, 0, 0),
                IVec3::new(0, 0, 1),
                IVec3::new(1, 0, 1),
            ]
        );
        assert_eq!(cells.len(), b.len());
    }

    #[test]
    fn test_scaled_doubles_both_corners() {
        let b = ChunkBounds::new(IVec3::splat(-2), IVec3::splat(3)).scaled(2);
        assert_eq!(b.min, IVec3::splat(-4));
        assert_eq!(b.max, IVec3::splat(6));
    }

    #[test]
    fn test_degenerate_box_is_empty() {
        let b = ChunkBounds::new(IVec3::ZERO, IVec3::ZERO);
        assert!(b.is_empty());
        assert_eq!(b.iter().count(), 0);
    }
}
