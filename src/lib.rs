#![no_std]
#![doc = include_str!("../README.md")]

mod config;
mod error;
mod estimator;
mod kinematics;
mod madgwick;
mod mahony;
mod orientation;
mod traits;

pub use config::{Algorithm, FilterConfig};
pub use error::ConfigError;
pub use estimator::{Estimator, SensorSample};
pub use madgwick::{Madgwick, MadgwickParams};
pub use mahony::{Mahony, MahonyParams};
pub use orientation::{AxisAngle, EulerAngles, Orientation};
pub use traits::Ahrs;
