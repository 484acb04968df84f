//! Typed chunk coordinates and the canonical `x:y:z` key format.
//!
//! A [`ChunkKey`] is the chunk-grid position of a chunk (world voxel
//! coordinates divided by the chunk size, floored). Its `Display`/`FromStr`
//! pair defines the string form used by the persistence surface.

use std::fmt;
use std::str::FromStr;

use glam::IVec3;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::chunk::CHUNK_SIZE;

/// Identifies a chunk's position in the chunk grid.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct ChunkKey {
    /// Chunk-grid X coordinate.
    pub x: i32,
    /// Chunk-grid Y coordinate.
    pub y: i32,
    /// Chunk-grid Z coordinate.
    pub z: i32,
}

/// Errors from parsing a persisted chunk or obstacle key.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum KeyParseError {
    /// The string does not consist of three `:`-separated fields.
    #[error("expected three `:`-separated integers, got {0:?}")]
    WrongShape(String),
    /// A field is not a valid integer.
    #[error("invalid coordinate in key: {0}")]
    BadCoordinate(#[from] std::num::ParseIntError),
}

impl ChunkKey {
    /// Creates a new chunk key.
    pub fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Returns the key offset by `(dx, dy, dz)` chunk units.
    pub fn offset(self, dx: i32, dy: i32, dz: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            z: self.z + dz,
        }
    }

    /// Splits a world voxel coordinate into its containing chunk's key and
    /// the chunk-local coordinate.
    ///
    /// Uses Euclidean division so that the local coordinate is always in
    /// `[0, 16)`, including for negative world coordinates.
    pub fn from_world(world: IVec3) -> (Self, IVec3) {
        let size = CHUNK_SIZE as i32;
        let key = Self::new(
            world.x.div_euclid(size),
            world.y.div_euclid(size),
            world.z.div_euclid(size),
        );
        let local = IVec3::new(
            world.x.rem_euclid(size),
            world.y.rem_euclid(size),
            world.z.rem_euclid(size),
        );
        (key, local)
    }

    /// World voxel coordinate of this chunk's minimum corner.
    pub fn origin(self) -> IVec3 {
        IVec3::new(self.x, self.y, self.z) * CHUNK_SIZE as i32
    }
}

impl fmt::Display for ChunkKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.x, self.y, self.z)
    }
}

impl FromStr for ChunkKey {
    type Err = KeyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut fields = s.split(':');
        let (Some(x), Some(y), Some(z), None) =
            (fields.next(), fields.next(), fields.next(), fields.next())
        else {
            return Err(KeyParseError::WrongShape(s.to_string()));
        };
        Ok(Self::new(x.parse()?, y.parse()?, z.parse()?))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
