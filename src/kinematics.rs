use nalgebra::{Quaternion, UnitQuaternion, Vector3};

/// Readings at or below this norm carry no direction and are treated as absent.
pub(crate) const MIN_SENSOR_NORM: f32 = f32::EPSILON;

#[inline]
pub(crate) fn direction(reading: &Vector3<f32>) -> Option<Vector3<f32>> {
    reading.try_normalize(MIN_SENSOR_NORM)
}

/// Quaternion derivative `0.5 * q ⊗ (0, ω)` for body rates in rad/s.
#[inline]
pub(crate) fn rate_of_change(q: &Quaternion<f32>, gyroscope: Vector3<f32>) -> Quaternion<f32> {
    q * Quaternion::from_parts(0.0, gyroscope) * 0.5
}

/// First-order step followed by renormalization.
#[inline]
pub(crate) fn integrate(
    q: &Quaternion<f32>,
    q_dot: Quaternion<f32>,
    dt: f32,
) -> UnitQuaternion<f32> {
    UnitQuaternion::from_quaternion(q + q_dot * dt)
}

/// Gravity direction predicted in the sensor frame for `q`.
#[inline]
pub(crate) fn expected_gravity(q: &Quaternion<f32>) -> Vector3<f32> {
    let (w, x, y, z) = (q.w, q.i, q.j, q.k);
    Vector3::new(
        2.0 * (x * z - w * y),
        2.0 * (w * x + y * z),
        w * w - x * x - y * y + z * z,
    )
}

/// Earth field reference `(bx, bz)`: the measured field rotated into the
/// earth frame and collapsed onto the north/down plane.
#[inline]
pub(crate) fn field_reference(q: &Quaternion<f32>, mag: Vector3<f32>) -> (f32, f32) {
    let h = q * (Quaternion::from_parts(0.0, mag) * q.conjugate());
    (libm::sqrtf(h.i * h.i + h.j * h.j), h.k)
}

/// Field direction predicted in the sensor frame for `q` and reference `(bx, bz)`.
#[inline]
pub(crate) fn expected_field(q: &Quaternion<f32>, bx: f32, bz: f32) -> Vector3<f32> {
    let (w, x, y, z) = (q.w, q.i, q.j, q.k);
    Vector3::new(
        2.0 * bx * (0.5 - y * y - z * z) + 2.0 * bz * (x * z - w * y),
        2.0 * bx * (x * y - w * z) + 2.0 * bz * (w * x + y * z),
        2.0 * bx * (w * y + x * z) + 2.0 * bz * (0.5 - x * x - y * y),
    )
}
