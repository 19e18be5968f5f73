//! Read-only views of an orientation estimate.
//!
//! All conversions work on a copied quaternion, so an [`Orientation`] can be
//! handed to another context (a render thread, a logger) without touching the
//! estimator that produced it.

use core::f32::consts::PI;

use libm::{acosf, asinf, atan2f, cosf, sinf, sqrtf};
use nalgebra::{Quaternion, UnitQuaternion, Vector3};

/// Below this `sin(angle / 2)` the rotation axis is considered undefined.
const AXIS_EPSILON: f32 = 1e-6;

/// Heading, pitch and roll for the aerospace ZYX sequence.
///
/// The body is rotated by `heading` about Z, then `pitch` about the new Y,
/// then `roll` about the new X. Units depend on the producer:
/// [`Orientation::euler_angles`] yields radians,
/// [`Orientation::euler_angles_degrees`] degrees.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EulerAngles {
    pub heading: f32,
    pub pitch: f32,
    pub roll: f32,
}

impl EulerAngles {
    pub const fn new(heading: f32, pitch: f32, roll: f32) -> Self {
        Self {
            heading,
            pitch,
            roll,
        }
    }

    /// Converts radians to degrees component-wise.
    pub fn to_degrees(self) -> Self {
        Self::new(
            self.heading.to_degrees(),
            self.pitch.to_degrees(),
            self.roll.to_degrees(),
        )
    }

    /// Converts degrees to radians component-wise.
    pub fn to_radians(self) -> Self {
        Self::new(
            self.heading.to_radians(),
            self.pitch.to_radians(),
            self.roll.to_radians(),
        )
    }
}

/// Rotation of `angle` radians about the unit axis `(x, y, z)`.
#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AxisAngle {
    /// In `[0, 2π]`.
    pub angle: f32,
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Default for AxisAngle {
    fn default() -> Self {
        Self {
            angle: 0.0,
            x: 0.0,
            y: 0.0,
            z: 1.0,
        }
    }
}

impl AxisAngle {
    pub fn axis(&self) -> Vector3<f32> {
        Vector3::new(self.x, self.y, self.z)
    }

    /// Rebuilds the rotation. The axis is renormalized first; a zero axis
    /// gives the identity.
    pub fn to_quaternion(&self) -> UnitQuaternion<f32> {
        let Some(axis) = self.axis().try_normalize(AXIS_EPSILON) else {
            return UnitQuaternion::identity();
        };
        let half = 0.5 * self.angle;
        UnitQuaternion::from_quaternion(Quaternion::from_parts(cosf(half), axis * sinf(half)))
    }
}

/// Snapshot of an orientation estimate.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Orientation {
    quaternion: UnitQuaternion<f32>,
}

impl Default for Orientation {
    fn default() -> Self {
        Self::new(UnitQuaternion::identity())
    }
}

impl From<UnitQuaternion<f32>> for Orientation {
    fn from(quaternion: UnitQuaternion<f32>) -> Self {
        Self::new(quaternion)
    }
}

impl Orientation {
    pub const fn new(quaternion: UnitQuaternion<f32>) -> Self {
        Self { quaternion }
    }

    pub fn quaternion(&self) -> UnitQuaternion<f32> {
        self.quaternion
    }

    /// Components in `[x, y, z, w]` order, the layout three.js and most
    /// game engines expect.
    pub fn to_xyzw(&self) -> [f32; 4] {
        let q = self.quaternion.as_ref();
        [q.i, q.j, q.k, q.w]
    }

    /// Components in `[w, x, y, z]` order.
    pub fn to_wxyz(&self) -> [f32; 4] {
        let q = self.quaternion.as_ref();
        [q.w, q.i, q.j, q.k]
    }

    /// ZYX Euler angles in radians.
    ///
    /// The pitch argument is clamped to `[-1, 1]` before `asin`, so at
    /// ±90° pitch the result stays finite.
    pub fn euler_angles(&self) -> EulerAngles {
        let q = self.quaternion.as_ref();
        let (w, x, y, z) = (q.w, q.i, q.j, q.k);

        let heading = atan2f(2.0 * (w * z + x * y), 1.0 - 2.0 * (y * y + z * z));
        let pitch = asinf((2.0 * (w * y - x * z)).clamp(-1.0, 1.0));
        let roll = atan2f(2.0 * (w * x + y * z), 1.0 - 2.0 * (x * x + y * y));

        EulerAngles::new(heading, pitch, roll)
    }

    pub fn euler_angles_degrees(&self) -> EulerAngles {
        self.euler_angles().to_degrees()
    }

    /// Axis-angle form with `angle = 2·acos(w)`.
    ///
    /// Near the identity the axis is undefined; `AxisAngle::default()`
    /// (zero angle about Z) is returned instead.
    pub fn axis_angle(&self) -> AxisAngle {
        let q = self.quaternion.as_ref();
        let w = q.w.clamp(-1.0, 1.0);
        let sin_half = sqrtf(1.0 - w * w);
        if sin_half < AXIS_EPSILON {
            return AxisAngle::default();
        }

        AxisAngle {
            angle: (2.0 * acosf(w)).clamp(0.0, 2.0 * PI),
            x: q.i / sin_half,
            y: q.j / sin_half,
            z: q.k / sin_half,
        }
    }
}
