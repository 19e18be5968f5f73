use core::time::Duration;

use nalgebra::{Matrix4x3, Matrix4x6, Quaternion, UnitQuaternion, Vector3, Vector6};

use crate::kinematics::{
    direction, expected_field, expected_gravity, field_reference, integrate, rate_of_change,
};
use crate::traits::Ahrs;

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct MadgwickParams {
    /// Gradient-descent gain. Larger converges faster and passes more
    /// accelerometer noise through.
    pub beta: f32,
}

impl Default for MadgwickParams {
    fn default() -> Self {
        Self { beta: 0.4 }
    }
}

/// Gradient-descent orientation filter.
#[derive(Debug, Clone)]
pub struct Madgwick {
    dt: f32,
    params: MadgwickParams,
    quaternion: UnitQuaternion<f32>,
}

impl Default for Madgwick {
    fn default() -> Madgwick {
        Madgwick::new(
            Duration::from_secs_f32(1.0 / 20.0),
            MadgwickParams::default(),
        )
    }
}

impl Madgwick {
    pub fn new(sample_period: Duration, params: MadgwickParams) -> Self {
        Madgwick::new_with_orientation(sample_period, params, UnitQuaternion::identity())
    }

    pub fn new_with_orientation(
        sample_period: Duration,
        params: MadgwickParams,
        orientation: UnitQuaternion<f32>,
    ) -> Self {
        Madgwick {
            dt: sample_period.as_secs_f32(),
            params,
            quaternion: orientation,
        }
    }

    pub fn params(&self) -> MadgwickParams {
        self.params
    }

    /// Applies the rate of change with the normalized gradient subtracted,
    /// or plain gyro integration when the gradient vanishes.
    fn descend(&mut self, gyroscope: Vector3<f32>, gradient: Quaternion<f32>, dt: f32) {
        let q = self.quaternion.into_inner();
        let mut q_dot = rate_of_change(&q, gyroscope);
        if let Some(step) = gradient.coords.try_normalize(f32::EPSILON) {
            q_dot -= Quaternion::from(step) * self.params.beta;
        }
        self.quaternion = integrate(&q, q_dot, dt);
    }
}

impl Ahrs for Madgwick {
    fn orientation(&self) -> UnitQuaternion<f32> {
        self.quaternion
    }

    fn set_orientation(&mut self, quat: UnitQuaternion<f32>) {
        self.quaternion = quat;
    }

    fn sample_period(&self) -> f32 {
        self.dt
    }

    fn update_with_dt(
        &mut self,
        gyroscope: Vector3<f32>,
        accelerometer: Vector3<f32>,
        magnetometer: Vector3<f32>,
        dt: f32,
    ) -> UnitQuaternion<f32> {
        let Some(accel) = direction(&accelerometer) else {
            return self.update_gyro_with_dt(gyroscope, dt);
        };
        let Some(mag) = direction(&magnetometer) else {
            return self.update_imu_with_dt(gyroscope, accelerometer, dt);
        };

        let q = self.quaternion.into_inner();
        let (w, x, y, z) = (q.w, q.i, q.j, q.k);
        let (bx, bz) = field_reference(&q, mag);

        let gravity_error = expected_gravity(&q) - accel;
        let field_error = expected_field(&q, bx, bz) - mag;
        let f = Vector6::new(
            gravity_error.x,
            gravity_error.y,
            gravity_error.z,
            field_error.x,
            field_error.y,
            field_error.z,
        );

        // Rows in (w, x, y, z) order, columns follow f.
        #[rustfmt::skip]
        let j_t = Matrix4x6::new(
            -2.0 * y, 2.0 * x, 0.0,
            -2.0 * bz * y,
            -2.0 * bx * z + 2.0 * bz * x,
            2.0 * bx * y,

            2.0 * z, 2.0 * w, -4.0 * x,
            2.0 * bz * z,
            2.0 * bx * y + 2.0 * bz * w,
            2.0 * bx * z - 4.0 * bz * x,

            -2.0 * w, 2.0 * z, -4.0 * y,
            -4.0 * bx * y - 2.0 * bz * w,
            2.0 * bx * x + 2.0 * bz * z,
            2.0 * bx * w - 4.0 * bz * y,

            2.0 * x, 2.0 * y, 0.0,
            -4.0 * bx * z + 2.0 * bz * x,
            -2.0 * bx * w + 2.0 * bz * y,
            2.0 * bx * x,
        );

        let g = j_t * f;
        self.descend(gyroscope, Quaternion::new(g[0], g[1], g[2], g[3]), dt);
        self.quaternion
    }

    fn update_imu_with_dt(
        &mut self,
        gyroscope: Vector3<f32>,
        accelerometer: Vector3<f32>,
        dt: f32,
    ) -> UnitQuaternion<f32> {
        let Some(accel) = direction(&accelerometer) else {
            return self.update_gyro_with_dt(gyroscope, dt);
        };

        let q = self.quaternion.into_inner();
        let (w, x, y, z) = (q.w, q.i, q.j, q.k);
        let f = expected_gravity(&q) - accel;

        #[rustfmt::skip]
        let j_t = Matrix4x3::new(
            -2.0 * y, 2.0 * x, 0.0,
            2.0 * z, 2.0 * w, -4.0 * x,
            -2.0 * w, 2.0 * z, -4.0 * y,
            2.0 * x, 2.0 * y, 0.0,
        );

        let g = j_t * f;
        self.descend(gyroscope, Quaternion::new(g[0], g[1], g[2], g[3]), dt);
        self.quaternion
    }

    fn update_gyro_with_dt(&mut self, gyroscope: Vector3<f32>, dt: f32) -> UnitQuaternion<f32> {
        let q = self.quaternion.into_inner();
        self.quaternion = integrate(&q, rate_of_change(&q, gyroscope), dt);
        self.quaternion
    }
}
