//! Flat-topped world geometry for presentation layers.
//!
//! Maps axial cells to planar `(x, z)` positions and back. The inverse snaps
//! through [`FractionalCube::round`], so every point inside a cell resolves
//! to that cell.

use crate::hex::{AxialCoord, FractionalCube};
use serde::{Deserialize, Serialize};

const SQRT_3: f64 = 1.732_050_807_568_877_2;

/// A point on the ground plane.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WorldPoint {
    pub x: f64,
    pub z: f64,
}

impl WorldPoint {
    pub fn new(x: f64, z: f64) -> Self {
        Self { x, z }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum LayoutError {
    #[error("cell radius must be finite and positive, got {0}")]
    InvalidRadius(f64),
}

/// Flat-topped hex layout with a configurable cell radius (center to corner).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawLayout")]
pub struct HexLayout {
    cell_radius: f64,
}

#[derive(Deserialize)]
struct RawLayout {
    cell_radius: f64,
}

impl TryFrom<RawLayout> for HexLayout {
    type Error = LayoutError;

    fn try_from(raw: RawLayout) -> Result<Self, Self::Error> {
        HexLayout::new(raw.cell_radius)
    }
}

impl Default for HexLayout {
    fn default() -> Self {
        Self { cell_radius: 1.0 }
    }
}

impl HexLayout {
    pub fn new(cell_radius: f64) -> Result<Self, LayoutError> {
        if !cell_radius.is_finite() || cell_radius <= 0.0 {
            return Err(LayoutError::InvalidRadius(cell_radius));
        }
        Ok(Self { cell_radius })
    }

    pub fn cell_radius(&self) -> f64 {
        self.cell_radius
    }

    /// Center of a cell on the ground plane.
    pub fn to_world(&self, coord: AxialCoord) -> WorldPoint {
        let q = f64::from(coord.q);
        let r = f64::from(coord.r);
        WorldPoint {
            x: self.cell_radius * (1.5 * q),
            z: self.cell_radius * (SQRT_3 / 2.0 * q + SQRT_3 * r),
        }
    }

    /// The cell containing a ground-plane point.
    pub fn to_axial(&self, point: WorldPoint) -> AxialCoord {
        let q = (2.0 / 3.0 * point.x) / self.cell_radius;
        let r = (-1.0 / 3.0 * point.x + SQRT_3 / 3.0 * point.z) / self.cell_radius;
        FractionalCube::from_axial(q, r).round().to_axial()
    }

    /// The six outline vertices of a cell, starting at angle 0 and stepping
    /// 60 degrees counter-clockwise.
    pub fn corners(&self, coord: AxialCoord) -> [WorldPoint; 6] {
        let center = self.to_world(coord);
        std::array::from_fn(|i| {
            let angle = (60.0 * i as f64).to_radians();
            WorldPoint {
                x: center.x + self.cell_radius * angle.cos(),
                z: center.z + self.cell_radius * angle.sin(),
            }
        })
    }
}
