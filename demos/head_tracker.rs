//! Host loop driving an estimator from a paired accelerometer/gyroscope
//! stream, the way a head-tracking view would.
//!
//! The sensor reports gyro rates in deg/s at 52 Hz. A render side receives
//! `[x, y, z, w]` snapshots over a channel and never touches the estimator.

use std::sync::mpsc;
use std::thread;

use ahrs_fusion::{Estimator, FilterConfig, SensorSample};
use nalgebra::{UnitQuaternion, Vector3};

const SAMPLE_RATE_HZ: f32 = 52.0;
const GRAVITY: f32 = 9.81;

struct Reading {
    accel: Vector3<f32>,
    gyro_dps: Vector3<f32>,
}

/// A head nodding about the pitch axis at 0.5 Hz.
fn nodding_head(samples: usize) -> impl Iterator<Item = Reading> {
    let dt = 1.0 / SAMPLE_RATE_HZ;
    let amplitude = 20f32.to_radians();
    let omega = core::f32::consts::TAU * 0.5;
    (0..samples).map(move |n| {
        let t = n as f32 * dt;
        let pitch = amplitude * (omega * t).sin();
        let pitch_rate = amplitude * omega * (omega * t).cos();
        let attitude = UnitQuaternion::from_euler_angles(0.0, pitch, 0.0);
        Reading {
            accel: attitude.inverse_transform_vector(&Vector3::new(0.0, 0.0, GRAVITY)),
            gyro_dps: Vector3::new(0.0, pitch_rate.to_degrees(), 0.0),
        }
    })
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = FilterConfig::default().with_sample_rate_hz(SAMPLE_RATE_HZ);
    let mut ahrs = Estimator::new(config)?;

    let (tx, rx) = mpsc::channel::<[f32; 4]>();
    let render = thread::spawn(move || {
        for (frame, [x, y, z, w]) in rx.iter().enumerate() {
            if frame % 13 == 0 {
                println!("frame {frame:4}: x={x:+.4} y={y:+.4} z={z:+.4} w={w:+.4}");
            }
        }
    });

    for reading in nodding_head(4 * SAMPLE_RATE_HZ as usize) {
        let gyro = reading.gyro_dps.map(f32::to_radians);
        ahrs.update(&SensorSample::new(gyro, reading.accel));
        if tx.send(ahrs.orientation().to_xyzw()).is_err() {
            break;
        }
    }
    drop(tx);

    render.join().map_err(|_| "render thread panicked")?;
    println!("final: {:?}", ahrs.euler_angles_degrees());
    Ok(())
}
