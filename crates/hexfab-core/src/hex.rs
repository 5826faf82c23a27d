//! Hex coordinate algebra.
//!
//! Cells are addressed by [`AxialCoord`] `(q, r)`. Distance and neighbor math
//! go through [`CubeCoord`] `(x, y, z)` with the invariant `x + y + z == 0`.
//! The two representations convert by the fixed formula `x = q, z = r,
//! y = -x - z`, so conversion never produces an invalid cube. Cube
//! components are `i64`, wide enough that every `i32` axial cell converts
//! and measures without overflow.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

// ---------------------------------------------------------------------------
// Directions
// ---------------------------------------------------------------------------

/// The six hex directions, in the fixed iteration order used by every
/// neighbor query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HexDirection {
    East,
    NorthEast,
    NorthWest,
    West,
    SouthWest,
    SouthEast,
}

impl HexDirection {
    /// All six directions in neighbor order.
    pub fn all() -> [HexDirection; 6] {
        [
            HexDirection::East,
            HexDirection::NorthEast,
            HexDirection::NorthWest,
            HexDirection::West,
            HexDirection::SouthWest,
            HexDirection::SouthEast,
        ]
    }

    /// Unit step in cube space `(dx, dy, dz)`.
    pub fn cube_offset(self) -> (i32, i32, i32) {
        match self {
            HexDirection::East => (1, -1, 0),
            HexDirection::NorthEast => (1, 0, -1),
            HexDirection::NorthWest => (0, 1, -1),
            HexDirection::West => (-1, 1, 0),
            HexDirection::SouthWest => (-1, 0, 1),
            HexDirection::SouthEast => (0, -1, 1),
        }
    }

    /// Unit step in axial space `(dq, dr)`.
    pub fn axial_offset(self) -> (i32, i32) {
        let (dx, _, dz) = self.cube_offset();
        (dx, dz)
    }

    /// The direction pointing the other way.
    pub fn opposite(self) -> Self {
        match self {
            HexDirection::East => HexDirection::West,
            HexDirection::NorthEast => HexDirection::SouthWest,
            HexDirection::NorthWest => HexDirection::SouthEast,
            HexDirection::West => HexDirection::East,
            HexDirection::SouthWest => HexDirection::NorthEast,
            HexDirection::SouthEast => HexDirection::NorthWest,
        }
    }
}

// ---------------------------------------------------------------------------
// Axial coordinates
// ---------------------------------------------------------------------------

/// Canonical storage and addressing form of a hex cell.
///
/// Ordering is row-major (`r` first, then `q`), so ordered maps keyed by
/// `AxialCoord` iterate the grid one row at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AxialCoord {
    pub q: i32,
    pub r: i32,
}

impl AxialCoord {
    pub const ORIGIN: AxialCoord = AxialCoord { q: 0, r: 0 };

    pub fn new(q: i32, r: i32) -> Self {
        Self { q, r }
    }

    pub fn to_cube(self) -> CubeCoord {
        let x = i64::from(self.q);
        let z = i64::from(self.r);
        CubeCoord { x, y: -x - z, z }
    }

    /// The adjacent cell in `dir`, or `None` past the edge of the `i32`
    /// coordinate range.
    pub fn checked_step(self, dir: HexDirection) -> Option<Self> {
        let (dq, dr) = dir.axial_offset();
        Some(Self::new(self.q.checked_add(dq)?, self.r.checked_add(dr)?))
    }

    /// The adjacent cell in `dir`. Components saturate at the edge of the
    /// `i32` range; use [`AxialCoord::checked_step`] to detect that case.
    pub fn step(self, dir: HexDirection) -> Self {
        let (dq, dr) = dir.axial_offset();
        Self::new(self.q.saturating_add(dq), self.r.saturating_add(dr))
    }

    /// The six adjacent cells, in [`HexDirection::all`] order.
    pub fn neighbors(self) -> [AxialCoord; 6] {
        HexDirection::all().map(|dir| self.step(dir))
    }

    /// Number of steps between two cells.
    pub fn distance(self, other: AxialCoord) -> u64 {
        self.to_cube().distance(other.to_cube())
    }
}

impl Ord for AxialCoord {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.r, self.q).cmp(&(other.r, other.q))
    }
}

impl PartialOrd for AxialCoord {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl From<CubeCoord> for AxialCoord {
    fn from(cube: CubeCoord) -> Self {
        cube.to_axial()
    }
}

impl fmt::Display for AxialCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.q, self.r)
    }
}

// ---------------------------------------------------------------------------
// Cube coordinates
// ---------------------------------------------------------------------------

/// Three-component form used for distance and neighbor math.
/// Valid only when `x + y + z == 0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CubeCoord {
    pub x: i64,
    pub y: i64,
    pub z: i64,
}

impl CubeCoord {
    /// Whether the zero-sum constraint holds.
    pub fn is_valid(&self) -> bool {
        i128::from(self.x) + i128::from(self.y) + i128::from(self.z) == 0
    }

    /// Drops `y`. Components outside the `i32` range saturate.
    pub fn to_axial(self) -> AxialCoord {
        debug_assert!(self.is_valid(), "invalid cube coordinate {self}");
        AxialCoord::new(saturate_i32(self.x), saturate_i32(self.z))
    }

    pub fn step(self, dir: HexDirection) -> Self {
        let (dx, dy, dz) = dir.cube_offset();
        Self {
            x: self.x.saturating_add(i64::from(dx)),
            y: self.y.saturating_add(i64::from(dy)),
            z: self.z.saturating_add(i64::from(dz)),
        }
    }

    pub fn neighbors(self) -> [CubeCoord; 6] {
        HexDirection::all().map(|dir| self.step(dir))
    }

    /// `(|dx| + |dy| + |dz|) / 2`.
    pub fn distance(self, other: CubeCoord) -> u64 {
        let delta = |a: i64, b: i64| (i128::from(a) - i128::from(b)).unsigned_abs();
        let sum = delta(self.x, other.x) + delta(self.y, other.y) + delta(self.z, other.z);
        u64::try_from(sum / 2).unwrap_or(u64::MAX)
    }
}

fn saturate_i32(v: i64) -> i32 {
    i32::try_from(v).unwrap_or(if v < 0 { i32::MIN } else { i32::MAX })
}

impl From<AxialCoord> for CubeCoord {
    fn from(axial: AxialCoord) -> Self {
        axial.to_cube()
    }
}

impl fmt::Display for CubeCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

// ---------------------------------------------------------------------------
// Fractional cube (rounding)
// ---------------------------------------------------------------------------

/// A cube position with fractional components, produced by the world-to-grid
/// transform before snapping to a cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FractionalCube {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl FractionalCube {
    /// Build from fractional axial components.
    pub fn from_axial(q: f64, r: f64) -> Self {
        Self {
            x: q,
            y: -q - r,
            z: r,
        }
    }

    /// Snap to the nearest cell. Each component is rounded; the one with the
    /// largest rounding error is recomputed from the other two so the result
    /// keeps the zero-sum constraint.
    pub fn round(self) -> CubeCoord {
        let mut rx = self.x.round();
        let mut ry = self.y.round();
        let mut rz = self.z.round();

        let dx = (rx - self.x).abs();
        let dy = (ry - self.y).abs();
        let dz = (rz - self.z).abs();

        if dx > dy && dx > dz {
            rx = -ry - rz;
        } else if dy > dz {
            ry = -rx - rz;
        } else {
            rz = -rx - ry;
        }

        CubeCoord {
            x: rx as i64,
            y: ry as i64,
            z: rz as i64,
        }
    }
}
