//! Flow-aligned coordinate frame
//!
//! Closed-form solutions are written in a frame whose origin is the source centre
//! and whose first axis points along the groundwater flow. Field coordinates are
//! mapped into it with a translation followed by a rotation in the horizontal plane:
//!
//! ```text
//! ξ =  (x - xs)·cosθ + (y - ys)·sinθ
//! η = -(x - xs)·sinθ + (y - ys)·cosθ
//! ζ =   z - zs
//! ```
//!
//! θ is the flow direction in degrees counter-clockwise from +x. Axes the
//! scenario does not use are reported as zero.

use nalgebra::{Point3, Rotation2, Vector2};

use crate::physics::{Dimensionality, QueryPoint};

/// Coordinates relative to the source, aligned with the flow
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocalCoordinates {
    /// Distance along the flow axis (ξ)
    pub longitudinal: f64,
    /// Transverse horizontal offset (η)
    pub transverse: f64,
    /// Vertical offset (ζ)
    pub vertical: f64,
}

/// Translation + rotation from field coordinates to the flow frame
#[derive(Debug, Clone, PartialEq)]
pub struct FlowFrame {
    origin: Point3<f64>,
    rotation: Rotation2<f64>,
    dimensionality: Dimensionality,
}

impl FlowFrame {
    pub fn new(origin: Point3<f64>, flow_angle_deg: f64, dimensionality: Dimensionality) -> Self {
        // Rotating field offsets by -θ lines the flow direction up with +ξ
        let rotation = Rotation2::new(-flow_angle_deg.to_radians());
        Self { origin, rotation, dimensionality }
    }

    pub fn origin(&self) -> &Point3<f64> {
        &self.origin
    }

    /// Map a query point into the flow frame
    pub fn to_local(&self, point: &QueryPoint) -> LocalCoordinates {
        let dx = point.x() - self.origin.x;

        match self.dimensionality {
            Dimensionality::OneD => LocalCoordinates {
                longitudinal: dx,
                transverse: 0.0,
                vertical: 0.0,
            },
            Dimensionality::TwoD | Dimensionality::ThreeD => {
                let offset = Vector2::new(dx, point.y() - self.origin.y);
                let aligned = self.rotation * offset;
                let vertical = match self.dimensionality {
                    Dimensionality::ThreeD => point.z() - self.origin.z,
                    _ => 0.0,
                };
                LocalCoordinates {
                    longitudinal: aligned.x,
                    transverse: aligned.y,
                    vertical,
                }
            }
        }
    }
}
