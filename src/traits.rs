use nalgebra::{UnitQuaternion, Vector3};

/// Common interface of the orientation filters.
///
/// Every update returns the new estimate. The `*_with_dt` methods take the
/// elapsed time in seconds; the short forms use [`Ahrs::sample_period`].
pub trait Ahrs {
    fn orientation(&self) -> UnitQuaternion<f32>;

    fn set_orientation(&mut self, quat: UnitQuaternion<f32>);

    /// Default elapsed time between samples, in seconds.
    fn sample_period(&self) -> f32;

    /// Full update with gyroscope, accelerometer and magnetometer.
    ///
    /// A zero magnetometer falls back to [`Ahrs::update_imu_with_dt`] and a
    /// zero accelerometer to [`Ahrs::update_gyro_with_dt`].
    fn update_with_dt(
        &mut self,
        gyroscope: Vector3<f32>,
        accelerometer: Vector3<f32>,
        magnetometer: Vector3<f32>,
        dt: f32,
    ) -> UnitQuaternion<f32>;

    fn update_imu_with_dt(
        &mut self,
        gyroscope: Vector3<f32>,
        accelerometer: Vector3<f32>,
        dt: f32,
    ) -> UnitQuaternion<f32>;

    fn update_gyro_with_dt(&mut self, gyroscope: Vector3<f32>, dt: f32) -> UnitQuaternion<f32>;

    fn update(
        &mut self,
        gyroscope: Vector3<f32>,
        accelerometer: Vector3<f32>,
        magnetometer: Vector3<f32>,
    ) -> UnitQuaternion<f32> {
        let dt = self.sample_period();
        self.update_with_dt(gyroscope, accelerometer, magnetometer, dt)
    }

    fn update_imu(
        &mut self,
        gyroscope: Vector3<f32>,
        accelerometer: Vector3<f32>,
    ) -> UnitQuaternion<f32> {
        let dt = self.sample_period();
        self.update_imu_with_dt(gyroscope, accelerometer, dt)
    }

    fn update_gyro(&mut self, gyroscope: Vector3<f32>) -> UnitQuaternion<f32> {
        let dt = self.sample_period();
        self.update_gyro_with_dt(gyroscope, dt)
    }
}
