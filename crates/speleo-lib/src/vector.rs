//! Immutable 3D vector and polar conversion helpers.
//!
//! Coordinates live in a single cave-wide Cartesian frame: `x` grows east,
//! `y` grows north (azimuth zero), and `z` grows up. Angles passed to the
//! conversion helpers are radians; use [`degrees_to_radians`] on raw
//! instrument readings first.

use std::f64::consts::TAU;
use std::ops::{Add, Mul, Neg, Sub};

use serde::{Deserialize, Serialize};

/// Convert an angle in degrees to radians.
pub fn degrees_to_radians(degrees: f64) -> f64 {
    degrees.to_radians()
}

/// Cartesian coordinates of a station or a displacement between stations.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vector3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vector3 {
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);

    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Displacement for a shot of `distance` along `azimuth` (clockwise from
    /// north) and `inclination` (positive upwards).
    ///
    /// Non-finite inputs propagate into the result unchanged.
    pub fn from_polar(distance: f64, azimuth: f64, inclination: f64) -> Self {
        let horizontal = inclination.cos() * distance;
        Self {
            x: azimuth.sin() * horizontal,
            y: azimuth.cos() * horizontal,
            z: inclination.sin() * distance,
        }
    }

    /// Inverse of [`Vector3::from_polar`]: returns `(distance, azimuth, inclination)`
    /// in radians, with azimuth normalised to `[0, 2π)`.
    ///
    /// The zero vector maps to all zeros. Azimuth is meaningless for vertical
    /// vectors and is reported as zero there.
    pub fn to_polar(&self) -> (f64, f64, f64) {
        let distance = self.length();
        if distance == 0.0 {
            return (0.0, 0.0, 0.0);
        }
        let inclination = (self.z / distance).clamp(-1.0, 1.0).asin();
        let horizontal = self.x.hypot(self.y);
        let azimuth = if horizontal == 0.0 {
            0.0
        } else {
            self.x.atan2(self.y).rem_euclid(TAU)
        };
        (distance, azimuth, inclination)
    }

    /// Unit normal of a plane dipping by `dip` towards `azimuth`.
    ///
    /// A horizontal plane (`dip == 0`) yields the up vector.
    pub fn plane_normal(azimuth: f64, dip: f64) -> Self {
        Self {
            x: azimuth.sin() * dip.sin(),
            y: azimuth.cos() * dip.sin(),
            z: dip.cos(),
        }
    }

    /// Euclidean length of the vector.
    pub fn length(&self) -> f64 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }

    /// Calculate the Euclidean distance to another position.
    pub fn distance_to(&self, other: &Self) -> f64 {
        (*self - *other).length()
    }

    /// Whether every component is finite.
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }

    pub fn to_array(&self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }
}

impl Add for Vector3 {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for Vector3 {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Mul<f64> for Vector3 {
    type Output = Self;

    fn mul(self, rhs: f64) -> Self {
        Self::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

impl Neg for Vector3 {
    type Output = Self;

    fn neg(self) -> Self {
        Self::new(-self.x, -self.y, -self.z)
    }
}
