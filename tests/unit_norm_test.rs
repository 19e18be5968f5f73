use ahrs_fusion::{Algorithm, Estimator, FilterConfig, SensorSample};
use nalgebra::Vector3;
use proptest::prelude::*;

const NORM_TOLERANCE: f32 = 1e-6;

fn vector(range: f32) -> impl Strategy<Value = Vector3<f32>> {
    (-range..range, -range..range, -range..range).prop_map(|(x, y, z)| Vector3::new(x, y, z))
}

fn sample() -> impl Strategy<Value = SensorSample> {
    (
        vector(10.0),
        prop_oneof![Just(Vector3::zeros()), vector(20.0)],
        proptest::option::of(prop_oneof![Just(Vector3::zeros()), vector(1.0)]),
        proptest::option::of(0.001f32..0.1),
    )
        .prop_map(|(gyroscope, accelerometer, magnetometer, dt)| SensorSample {
            gyroscope,
            accelerometer,
            magnetometer,
            dt,
        })
}

fn algorithm() -> impl Strategy<Value = Algorithm> {
    prop_oneof![Just(Algorithm::Madgwick), Just(Algorithm::Mahony)]
}

proptest! {
    #[test]
    fn quaternion_stays_unit_norm(
        algorithm in algorithm(),
        gain in 0.0f32..2.0,
        ki in 0.0f32..0.5,
        samples in proptest::collection::vec(sample(), 1..200),
    ) {
        let config = FilterConfig::default()
            .with_sample_rate_hz(52.0)
            .with_algorithm(algorithm)
            .with_beta(gain)
            .with_kp(gain)
            .with_ki(ki);
        let mut ahrs = Estimator::new(config).unwrap();

        for sample in &samples {
            ahrs.update(sample);
            let norm = ahrs.quaternion().into_inner().norm();
            prop_assert!((norm - 1.0).abs() < NORM_TOLERANCE, "norm drifted to {}", norm);

            let angles = ahrs.euler_angles();
            prop_assert!(angles.heading.is_finite() && angles.pitch.is_finite() && angles.roll.is_finite());
        }
    }
}
