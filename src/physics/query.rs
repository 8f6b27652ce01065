//! Query points and rectilinear grids
//!
//! A [`QueryPoint`] is where (and when) the engine is asked for a concentration.
//! A [`GridSpec`] is a convenience generator of ordered query points on a
//! rectilinear grid at one time, the usual input of a concentration map.
//!
//! # Ordering
//!
//! `GridSpec::points()` emits x fastest, then y, then z. The result objects rely on
//! this order to reshape a field into an `ndarray` array of shape `(nz, ny, nx)`.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::ValidationError;

// =================================================================================================
// Query Point
// =================================================================================================

/// Spatial coordinates plus elapsed time, validated on construction
///
/// For 1D scenarios `y` and `z` are ignored (zero is the natural value to pass).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct QueryPoint {
    x: f64,
    y: f64,
    z: f64,
    t: f64,
}

impl QueryPoint {
    /// Create a query point
    ///
    /// # Errors
    ///
    /// - any coordinate is NaN or infinite
    /// - `t` is negative
    ///
    /// # Example
    ///
    /// ```rust
    /// use plume_rs::physics::QueryPoint;
    ///
    /// assert!(QueryPoint::new(10.0, 0.0, 0.0, 5.0).is_ok());
    /// assert!(QueryPoint::new(10.0, 0.0, 0.0, -1.0).is_err());
    /// ```
    pub fn new(x: f64, y: f64, z: f64, t: f64) -> Result<Self, ValidationError> {
        for (field, value) in [("query.x", x), ("query.y", y), ("query.z", z)] {
            if !value.is_finite() {
                return Err(ValidationError::new(field, "must be finite", Some(value)));
            }
        }
        if !t.is_finite() || t < 0.0 {
            return Err(ValidationError::new("query.t", "must be finite and >= 0", Some(t)));
        }
        Ok(Self { x, y, z, t })
    }

    /// Point on the flow axis of a 1D scenario
    pub fn on_axis(x: f64, t: f64) -> Result<Self, ValidationError> {
        Self::new(x, 0.0, 0.0, t)
    }

    pub fn x(&self) -> f64 {
        self.x
    }

    pub fn y(&self) -> f64 {
        self.y
    }

    pub fn z(&self) -> f64 {
        self.z
    }

    pub fn t(&self) -> f64 {
        self.t
    }

    /// Spatial part of the query
    pub fn location(&self) -> SpatialPoint {
        SpatialPoint { x: self.x, y: self.y, z: self.z }
    }

    /// Same location at another time (used by superposition, `t` is trusted)
    pub(crate) fn shifted_to(&self, t: f64) -> Self {
        Self { t, ..*self }
    }
}

impl fmt::Display for QueryPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(x={}, y={}, z={}, t={})", self.x, self.y, self.z, self.t)
    }
}

// =================================================================================================
// Spatial Point
// =================================================================================================

/// Fixed monitoring location of a breakthrough curve
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpatialPoint {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl SpatialPoint {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Query this location at time `t`
    pub fn at(&self, t: f64) -> Result<QueryPoint, ValidationError> {
        QueryPoint::new(self.x, self.y, self.z, t)
    }
}

// =================================================================================================
// Rectilinear grid
// =================================================================================================

/// One axis of a rectilinear grid
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Axis {
    /// Single coordinate
    Fixed(f64),

    /// `count` evenly spaced coordinates from `min` to `max` inclusive
    Linspace { min: f64, max: f64, count: usize },
}

impl Axis {
    pub fn fixed(value: f64) -> Self {
        Axis::Fixed(value)
    }

    pub fn linspace(min: f64, max: f64, count: usize) -> Self {
        Axis::Linspace { min, max, count }
    }

    /// Number of coordinates on this axis
    pub fn len(&self) -> usize {
        match self {
            Axis::Fixed(_) => 1,
            Axis::Linspace { count, .. } => *count,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Coordinates along the axis
    pub fn values(&self) -> Vec<f64> {
        match *self {
            Axis::Fixed(value) => vec![value],
            Axis::Linspace { min, count: 1, .. } => vec![min],
            Axis::Linspace { min, max, count } => {
                let step = (max - min) / (count - 1) as f64;
                (0..count)
                    .map(|i| if i + 1 == count { max } else { min + step * i as f64 })
                    .collect()
            }
        }
    }

    /// Distance between neighbouring coordinates, `None` for a single coordinate
    pub fn spacing(&self) -> Option<f64> {
        match *self {
            Axis::Linspace { min, max, count } if count >= 2 => Some((max - min) / (count - 1) as f64),
            _ => None,
        }
    }

    fn validate(&self, name: &str) -> Result<(), ValidationError> {
        match *self {
            Axis::Fixed(value) if !value.is_finite() => {
                Err(ValidationError::new(name, "must be finite", Some(value)))
            }
            Axis::Fixed(_) => Ok(()),
            Axis::Linspace { min, max, count } => {
                if !min.is_finite() || !max.is_finite() {
                    return Err(ValidationError::new(name, "bounds must be finite", None));
                }
                if count == 0 {
                    return Err(ValidationError::new(name, "must contain at least one point", Some(0.0)));
                }
                if max < min {
                    return Err(ValidationError::new(
                        format!("{name}.max"),
                        format!("must be >= min ({min})"),
                        Some(max),
                    ));
                }
                Ok(())
            }
        }
    }
}

/// Rectilinear grid of query points at a single time
///
/// # Example
///
/// ```rust
/// use plume_rs::physics::{Axis, GridSpec};
///
/// let grid = GridSpec::plane(Axis::linspace(0.0, 100.0, 101), Axis::linspace(-20.0, 20.0, 41), 30.0);
/// let points = grid.points().unwrap();
/// assert_eq!(points.len(), 101 * 41);
/// assert_eq!(grid.shape(), (1, 41, 101));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridSpec {
    pub x: Axis,
    pub y: Axis,
    pub z: Axis,
    pub t: f64,
}

impl GridSpec {
    /// Transect along x at y = z = 0
    pub fn line(x: Axis, t: f64) -> Self {
        Self { x, y: Axis::Fixed(0.0), z: Axis::Fixed(0.0), t }
    }

    /// Horizontal plane at z = 0
    pub fn plane(x: Axis, y: Axis, t: f64) -> Self {
        Self { x, y, z: Axis::Fixed(0.0), t }
    }

    /// Full volume
    pub fn volume(x: Axis, y: Axis, z: Axis, t: f64) -> Self {
        Self { x, y, z, t }
    }

    /// Array shape `(nz, ny, nx)` of the grid
    pub fn shape(&self) -> (usize, usize, usize) {
        (self.z.len(), self.y.len(), self.x.len())
    }

    /// Ordered query points, x fastest
    ///
    /// # Errors
    ///
    /// Invalid axis bounds or a negative/non-finite time.
    pub fn points(&self) -> Result<Vec<QueryPoint>, ValidationError> {
        self.x.validate("grid.x")?;
        self.y.validate("grid.y")?;
        self.z.validate("grid.z")?;

        let xs = self.x.values();
        let ys = self.y.values();
        let zs = self.z.values();

        let mut points = Vec::with_capacity(xs.len() * ys.len() * zs.len());
        for &z in &zs {
            for &y in &ys {
                for &x in &xs {
                    points.push(QueryPoint::new(x, y, z, self.t)?);
                }
            }
        }
        Ok(points)
    }
}

// =================================================================================================
// Tests
// =================================================================================================
