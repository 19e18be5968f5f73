use libm::{atan2f, cosf, sinf, sqrtf};
use log::{debug, trace};
use nalgebra::{UnitQuaternion, Vector3};

use crate::config::{Algorithm, FilterConfig};
use crate::error::ConfigError;
use crate::kinematics::direction;
use crate::madgwick::Madgwick;
use crate::mahony::Mahony;
use crate::orientation::{AxisAngle, EulerAngles, Orientation};
use crate::traits::Ahrs;

/// One reading from the inertial sensors.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SensorSample {
    /// Angular velocity in rad/s.
    pub gyroscope: Vector3<f32>,
    /// Specific force in any consistent unit; only the direction is used.
    pub accelerometer: Vector3<f32>,
    /// Magnetic field in any consistent unit, if the sensor has one.
    pub magnetometer: Option<Vector3<f32>>,
    /// Seconds since the previous sample. `None` uses the configured rate.
    pub dt: Option<f32>,
}

impl SensorSample {
    pub fn new(gyroscope: Vector3<f32>, accelerometer: Vector3<f32>) -> Self {
        Self {
            gyroscope,
            accelerometer,
            magnetometer: None,
            dt: None,
        }
    }

    pub fn with_magnetometer(mut self, magnetometer: Vector3<f32>) -> Self {
        self.magnetometer = Some(magnetometer);
        self
    }

    pub fn with_dt(mut self, dt: f32) -> Self {
        self.dt = Some(dt);
        self
    }
}

#[derive(Debug, Clone)]
enum Filter {
    Madgwick(Madgwick),
    Mahony(Mahony),
}

impl Filter {
    fn new(config: &FilterConfig) -> Self {
        match config.algorithm {
            Algorithm::Madgwick => Filter::Madgwick(Madgwick::new(
                config.sample_duration(),
                config.madgwick_params(),
            )),
            Algorithm::Mahony => {
                Filter::Mahony(Mahony::new(config.sample_duration(), config.mahony_params()))
            }
        }
    }

    fn as_ahrs(&self) -> &dyn Ahrs {
        match self {
            Filter::Madgwick(filter) => filter,
            Filter::Mahony(filter) => filter,
        }
    }

    fn as_ahrs_mut(&mut self) -> &mut dyn Ahrs {
        match self {
            Filter::Madgwick(filter) => filter,
            Filter::Mahony(filter) => filter,
        }
    }
}

/// Orientation estimator driven one sample at a time.
///
/// The algorithm is fixed at construction. Each [`Estimator::update`] runs a
/// single integration step; the read accessors compute their views from the
/// current quaternion on demand.
#[derive(Debug, Clone)]
pub struct Estimator {
    config: FilterConfig,
    filter: Filter,
    awaiting_alignment: bool,
}

impl Default for Estimator {
    fn default() -> Self {
        Self::from_valid_config(FilterConfig::default())
    }
}

impl Estimator {
    pub fn new(config: FilterConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::from_valid_config(config))
    }

    fn from_valid_config(config: FilterConfig) -> Self {
        debug!(
            "ahrs: {} filter at {} Hz (beta={}, kp={}, ki={})",
            config.algorithm, config.sample_rate_hz, config.beta, config.kp, config.ki
        );
        Self {
            filter: Filter::new(&config),
            awaiting_alignment: config.initialize_from_first_sample,
            config,
        }
    }

    pub fn config(&self) -> &FilterConfig {
        &self.config
    }

    pub fn algorithm(&self) -> Algorithm {
        self.config.algorithm
    }

    /// Elapsed time assumed for samples without an explicit `dt`, in seconds.
    pub fn sample_period(&self) -> f32 {
        self.config.sample_period()
    }

    /// Advances the estimate by one sample.
    ///
    /// A zero accelerometer reading skips the correction and integrates the
    /// gyroscope alone; a zero magnetometer reading is ignored for this call.
    /// Any reading with a norm at or below `f32::EPSILON` counts as zero, so
    /// scale readings in very small units up before passing them in.
    pub fn update(&mut self, sample: &SensorSample) {
        if self.awaiting_alignment && self.align(sample.accelerometer, sample.magnetometer) {
            return;
        }

        let dt = sample.dt.unwrap_or_else(|| self.config.sample_period());
        if direction(&sample.accelerometer).is_none() {
            trace!("ahrs: zero accelerometer, gyro-only step");
        }

        let filter = self.filter.as_ahrs_mut();
        match sample.magnetometer {
            Some(mag) => filter.update_with_dt(sample.gyroscope, sample.accelerometer, mag, dt),
            None => filter.update_imu_with_dt(sample.gyroscope, sample.accelerometer, dt),
        };
    }

    /// Current estimate. See [`Orientation::to_xyzw`] for component order.
    pub fn quaternion(&self) -> UnitQuaternion<f32> {
        self.filter.as_ahrs().orientation()
    }

    /// Copy of the current estimate for use outside the update loop.
    pub fn orientation(&self) -> Orientation {
        Orientation::new(self.quaternion())
    }

    pub fn euler_angles(&self) -> EulerAngles {
        self.orientation().euler_angles()
    }

    pub fn euler_angles_degrees(&self) -> EulerAngles {
        self.orientation().euler_angles_degrees()
    }

    pub fn axis_angle(&self) -> AxisAngle {
        self.orientation().axis_angle()
    }

    /// Mahony's integral term; `None` under Madgwick.
    pub fn integral_feedback(&self) -> Option<Vector3<f32>> {
        match &self.filter {
            Filter::Madgwick(_) => None,
            Filter::Mahony(mahony) => Some(mahony.integral_feedback()),
        }
    }

    pub fn set_orientation(&mut self, quat: UnitQuaternion<f32>) {
        self.filter.as_ahrs_mut().set_orientation(quat);
        self.awaiting_alignment = false;
    }

    /// Returns to the identity orientation with cleared feedback.
    pub fn reset(&mut self) {
        debug!("ahrs: reset");
        self.filter = Filter::new(&self.config);
        self.awaiting_alignment = self.config.initialize_from_first_sample;
    }

    /// Sets the orientation straight from a gravity reading and an optional
    /// field reading.
    ///
    /// Roll and pitch come from the accelerometer, heading from the
    /// tilt-compensated magnetometer (zero without one). Returns `false` and
    /// leaves the estimate untouched when the accelerometer reading is zero.
    pub fn align(
        &mut self,
        accelerometer: Vector3<f32>,
        magnetometer: Option<Vector3<f32>>,
    ) -> bool {
        let Some(accel) = direction(&accelerometer) else {
            trace!("ahrs: zero accelerometer, alignment deferred");
            return false;
        };

        let roll = atan2f(accel.y, accel.z);
        let pitch = atan2f(-accel.x, sqrtf(accel.y * accel.y + accel.z * accel.z));

        let heading = match magnetometer.as_ref().and_then(direction) {
            Some(mag) => {
                let (sin_roll, cos_roll) = (sinf(roll), cosf(roll));
                let (sin_pitch, cos_pitch) = (sinf(pitch), cosf(pitch));
                let north = mag.x * cos_pitch + (mag.y * sin_roll + mag.z * cos_roll) * sin_pitch;
                let east = mag.y * cos_roll - mag.z * sin_roll;
                atan2f(-east, north)
            }
            None => 0.0,
        };

        debug!(
            "ahrs: aligned to heading={} pitch={} roll={}",
            heading, pitch, roll
        );
        self.set_orientation(UnitQuaternion::from_euler_angles(roll, pitch, heading));
        true
    }
}

impl Ahrs for Estimator {
    fn orientation(&self) -> UnitQuaternion<f32> {
        self.quaternion()
    }

    fn set_orientation(&mut self, quat: UnitQuaternion<f32>) {
        Estimator::set_orientation(self, quat);
    }

    fn sample_period(&self) -> f32 {
        Estimator::sample_period(self)
    }

    fn update_with_dt(
        &mut self,
        gyroscope: Vector3<f32>,
        accelerometer: Vector3<f32>,
        magnetometer: Vector3<f32>,
        dt: f32,
    ) -> UnitQuaternion<f32> {
        let sample = SensorSample::new(gyroscope, accelerometer)
            .with_magnetometer(magnetometer)
            .with_dt(dt);
        self.update(&sample);
        self.quaternion()
    }

    fn update_imu_with_dt(
        &mut self,
        gyroscope: Vector3<f32>,
        accelerometer: Vector3<f32>,
        dt: f32,
    ) -> UnitQuaternion<f32> {
        self.update(&SensorSample::new(gyroscope, accelerometer).with_dt(dt));
        self.quaternion()
    }

    fn update_gyro_with_dt(&mut self, gyroscope: Vector3<f32>, dt: f32) -> UnitQuaternion<f32> {
        self.update(&SensorSample::new(gyroscope, Vector3::zeros()).with_dt(dt));
        self.quaternion()
    }
}
