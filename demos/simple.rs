use core::time::Duration;
use nalgebra::Vector3;
use ahrs_fusion::{Ahrs, Madgwick, MadgwickParams, Mahony, MahonyParams, Orientation};

fn main() {
    let dt = Duration::from_secs_f32(1.0 / 100.0);

    let mut mahony = Mahony::new(dt, MahonyParams::default());
    let mut madgwick = Madgwick::new(dt, MadgwickParams::default());

    // Sensor data
    let gyr = Vector3::new(0.0, 0.0, 0.0);
    let acc = Vector3::new(0.0, 0.0, 9.81);
    let mag = Vector3::new(20.0, 0.0, 0.0);

    mahony.update(gyr, acc, mag);
    madgwick.update(gyr, acc, mag);

    let mahony = Orientation::from(mahony.orientation());
    let madgwick = Orientation::from(madgwick.orientation());

    println!("Mahony:   {:?}", mahony.euler_angles_degrees());
    println!("Madgwick: {:?}", madgwick.euler_angles_degrees());
}
