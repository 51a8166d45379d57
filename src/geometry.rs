//! Shared geometry and air-physics primitives.
//!
//! Every engine works in a right-handed room coordinate system: `x` runs
//! across the room width, `y` along its length (front wall at `y = 0`),
//! `z` up from the floor. All distances are meters.

use serde::{Deserialize, Serialize};

use crate::error::AcousticsError;

/// Speed of sound in still air at 0 °C, m/s.
const SPEED_OF_SOUND_AT_0C: f64 = 331.3;

/// First-order temperature coefficient of the speed of sound, m/s per °C.
const SPEED_OF_SOUND_PER_DEGREE: f64 = 0.606;

/// Reference air temperature used by the delay helpers, °C.
pub const DEFAULT_TEMPERATURE_C: f64 = 20.0;

/// Speed of sound in air at the given temperature.
///
/// Linear approximation `c = 331.3 + 0.606 * T`, valid for ordinary indoor
/// temperatures. At 20 °C this gives 343.42 m/s.
pub fn speed_of_sound(temperature_c: f64) -> f64 {
    SPEED_OF_SOUND_AT_0C + SPEED_OF_SOUND_PER_DEGREE * temperature_c
}

/// A position (or direction) in room coordinates, meters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Point3 {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Point3 { x, y, z }
    }

    /// Euclidean distance to another point.
    pub fn distance_to(&self, other: &Point3) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        let dz = other.z - self.z;
        (dx * dx + dy * dy + dz * dz).sqrt()
    }

    /// Vector length when the point is read as a direction from the origin.
    pub fn magnitude(&self) -> f64 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }
}

impl std::ops::Sub for Point3 {
    type Output = Point3;

    fn sub(self, rhs: Point3) -> Point3 {
        Point3 {
            x: self.x - rhs.x,
            y: self.y - rhs.y,
            z: self.z - rhs.z,
        }
    }
}

/// Angle between two direction vectors, degrees in `[0, 180]`.
///
/// A zero-magnitude vector on either side is treated as on-axis and yields
/// 0°, so an unaimed speaker never picks up an off-axis penalty.
pub fn angle_between_deg(a: Point3, b: Point3) -> f64 {
    let mags = a.magnitude() * b.magnitude();
    if mags == 0.0 {
        return 0.0;
    }
    let dot = a.x * b.x + a.y * b.y + a.z * b.z;
    // Clamp before acos: rounding can push the ratio a hair past 1.
    (dot / mags).clamp(-1.0, 1.0).acos().to_degrees()
}

/// Interior dimensions of a rectangular room, meters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RoomDimensions {
    pub length: f64,
    pub width: f64,
    pub height: f64,
}

impl RoomDimensions {
    pub fn new(length: f64, width: f64, height: f64) -> Self {
        RoomDimensions {
            length,
            width,
            height,
        }
    }

    /// Interior air volume, m³.
    pub fn volume(&self) -> f64 {
        self.length * self.width * self.height
    }

    /// Floor area, m².
    pub fn floor_area(&self) -> f64 {
        self.length * self.width
    }

    /// Total boundary area of the bare shell (floor, ceiling, four walls), m².
    pub fn total_surface_area(&self) -> f64 {
        2.0 * (self.length * self.width + self.length * self.height + self.width * self.height)
    }

    /// Checks that all three dimensions are finite and strictly positive.
    pub fn validate(&self) -> Result<(), AcousticsError> {
        let ok = |v: f64| v.is_finite() && v > 0.0;
        if ok(self.length) && ok(self.width) && ok(self.height) {
            Ok(())
        } else {
            Err(AcousticsError::InvalidDimensions {
                length: self.length,
                width: self.width,
                height: self.height,
            })
        }
    }
}
