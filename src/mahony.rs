use core::time::Duration;

use nalgebra::{UnitQuaternion, Vector3};

use crate::kinematics::{
    direction, expected_field, expected_gravity, field_reference, integrate, rate_of_change,
};
use crate::traits::Ahrs;

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct MahonyParams {
    /// Proportional gain on the reference-vector error.
    pub kp: f32,
    /// Integral gain. Zero disables accumulation entirely.
    pub ki: f32,
}

impl Default for MahonyParams {
    fn default() -> Self {
        Self { kp: 0.5, ki: 0.0 }
    }
}

/// Complementary orientation filter with PI feedback.
#[derive(Debug, Clone)]
pub struct Mahony {
    dt: f32,
    params: MahonyParams,
    integral_feedback: Vector3<f32>,
    quaternion: UnitQuaternion<f32>,
}

impl Default for Mahony {
    fn default() -> Mahony {
        Mahony::new(
            Duration::from_secs_f32(1.0 / 20.0),
            MahonyParams::default(),
        )
    }
}

impl Mahony {
    pub fn new(sample_period: Duration, params: MahonyParams) -> Self {
        Mahony::new_with_orientation(sample_period, params, UnitQuaternion::identity())
    }

    pub fn new_with_orientation(
        sample_period: Duration,
        params: MahonyParams,
        orientation: UnitQuaternion<f32>,
    ) -> Self {
        Mahony {
            dt: sample_period.as_secs_f32(),
            params,
            integral_feedback: Vector3::zeros(),
            quaternion: orientation,
        }
    }

    pub fn params(&self) -> MahonyParams {
        self.params
    }

    /// Accumulated integral term, in rad/s.
    pub fn integral_feedback(&self) -> Vector3<f32> {
        self.integral_feedback
    }

    /// Feeds the summed cross-product error back into the gyro rates and
    /// integrates.
    fn correct(
        &mut self,
        gyroscope: Vector3<f32>,
        error: Vector3<f32>,
        dt: f32,
    ) -> UnitQuaternion<f32> {
        if self.params.ki > 0.0 {
            self.integral_feedback += error * (self.params.ki * dt);
        } else {
            self.integral_feedback = Vector3::zeros();
        }

        let corrected = gyroscope + error * self.params.kp + self.integral_feedback;
        self.update_gyro_with_dt(corrected, dt)
    }
}

impl Ahrs for Mahony {
    fn orientation(&self) -> UnitQuaternion<f32> {
        self.quaternion
    }

    fn set_orientation(&mut self, quat: UnitQuaternion<f32>) {
        self.integral_feedback = Vector3::zeros();
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
        let (bx, bz) = field_reference(&q, mag);
        let v = expected_gravity(&q);
        let w = expected_field(&q, bx, bz);

        let error = accel.cross(&v) + mag.cross(&w);
        self.correct(gyroscope, error, dt)
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

        let v = expected_gravity(self.quaternion.as_ref());
        let error = accel.cross(&v);
        self.correct(gyroscope, error, dt)
    }

    fn update_gyro_with_dt(&mut self, gyroscope: Vector3<f32>, dt: f32) -> UnitQuaternion<f32> {
        let q = self.quaternion.into_inner();
        self.quaternion = integrate(&q, rate_of_change(&q, gyroscope), dt);
        self.quaternion
    }
}
