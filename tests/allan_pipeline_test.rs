// tests/allan_pipeline_test.rs
// End-to-end checks of grid -> curve -> parameters on synthetic noise.

use approx::assert_relative_eq;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};

use IMU_Allan_Render::axis_names::SensorType;
use IMU_Allan_Render::config::AllanConfig;
use IMU_Allan_Render::data_analysis::allan_deviation::{allan_deviation, DeviationCurve, Signal};
use IMU_Allan_Render::data_analysis::channel_analysis::{analyze_channels, analyze_signal};
use IMU_Allan_Render::data_analysis::noise_parameters::extract_noise_parameters;
use IMU_Allan_Render::data_analysis::noise_regions::fit_loglog_slope;
use IMU_Allan_Render::data_analysis::tau_grid::build_tau_grid;
use IMU_Allan_Render::data_input::log_data::ImuChannel;
use IMU_Allan_Render::AllanError;

fn white_noise(n: usize, sigma: f64, seed: u64) -> Vec<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    let normal = Normal::new(0.0, sigma).unwrap();
    (0..n).map(|_| normal.sample(&mut rng)).collect()
}

fn random_walk(n: usize, sigma: f64, seed: u64) -> Vec<f64> {
    white_noise(n, sigma, seed)
        .into_iter()
        .scan(0.0, |acc, step| {
            *acc += step;
            Some(*acc)
        })
        .collect()
}

fn white_noise_config() -> AllanConfig {
    AllanConfig {
        sample_rate: 1000.0,
        n_points: 50,
        ..Default::default()
    }
}

#[test]
fn white_noise_curve_starts_at_sigma() {
    let samples = white_noise(10_000, 0.01, 42);
    let signal = Signal::new(&samples, 1000.0).unwrap();
    let analysis = analyze_signal("gyro_x", &signal, SensorType::Gyro, &white_noise_config()).unwrap();

    let taus = analysis.curve.taus();
    assert_eq!(taus.len(), 50);
    assert_relative_eq!(taus[0], 0.001, max_relative = 1e-12);
    assert_relative_eq!(taus[49], 1.0, max_relative = 1e-12);
    assert!(analysis.curve.skipped().is_empty());

    let adev = analysis.curve.deviations();
    assert_relative_eq!(adev[0], 0.01, max_relative = 0.05);

    let params = &analysis.parameters;
    assert!(params.bias_instability < adev[0]);
    assert_relative_eq!(
        params.random_walk,
        adev[0] * taus[0].sqrt(),
        max_relative = 1e-12
    );
    assert!(analysis.white_noise_check.within_tolerance);
}

#[test]
fn white_noise_slope_is_minus_half() {
    let samples = white_noise(10_000, 0.01, 7);
    let signal = Signal::new(&samples, 1000.0).unwrap();
    let taus = build_tau_grid(samples.len(), 1000.0, 1, 0.1, 50).unwrap();
    let curve = allan_deviation(&signal, &taus).unwrap();

    // Stay where there are plenty of independent averages.
    let cutoff = curve.taus().iter().take_while(|&&t| t <= 0.1).count();
    let slope = fit_loglog_slope(&curve.taus()[..cutoff], &curve.deviations()[..cutoff]).unwrap();
    assert!((slope + 0.5).abs() < 0.1, "slope {slope}");
}

#[test]
fn random_walk_slope_is_plus_half() {
    let samples = random_walk(50_000, 0.01, 3);
    let signal = Signal::new(&samples, 1.0).unwrap();
    let n_points = 20;
    let (lo, hi) = (10f64.log10(), 500f64.log10());
    let taus: Vec<f64> = (0..n_points)
        .map(|i| 10f64.powf(lo + (hi - lo) * i as f64 / (n_points - 1) as f64))
        .collect();
    let curve = allan_deviation(&signal, &taus).unwrap();
    assert_eq!(curve.len(), n_points);

    let slope = fit_loglog_slope(curve.taus(), curve.deviations()).unwrap();
    assert!(slope > 0.3 && slope < 0.7, "slope {slope}");
}

#[test]
fn analysis_is_deterministic() {
    let samples = white_noise(5_000, 0.02, 11);
    let signal = Signal::new(&samples, 1000.0).unwrap();
    let config = white_noise_config();
    let first = analyze_signal("accel_z", &signal, SensorType::Accel, &config).unwrap();
    let second = analyze_signal("accel_z", &signal, SensorType::Accel, &config).unwrap();

    assert_eq!(first.curve, second.curve);
    for (a, b) in first
        .curve
        .deviations()
        .iter()
        .zip(second.curve.deviations())
    {
        assert_eq!(a.to_bits(), b.to_bits());
    }
    assert_eq!(first.parameters, second.parameters);
}

#[test]
fn drift_onset_is_first_point_above_threshold() {
    let taus: Vec<f64> = (1..=15).map(|i| i as f64 * 0.1).collect();
    // Minimum 2.0 at index 4; threshold 2.6 is first exceeded at index 9.
    let deviations = vec![
        10.0, 8.0, 6.0, 4.0, 2.0, 2.1, 2.2, 2.3, 2.6, 2.7, 3.0, 3.5, 2.0, 4.0, 5.0,
    ];
    let curve = DeviationCurve::from_parts(taus.clone(), deviations).unwrap();
    let params = extract_noise_parameters(&curve, SensorType::Gyro, 1.3).unwrap();

    assert_eq!(params.bias_instability, 2.0);
    assert_eq!(params.averaging_time, taus[4]);
    assert_eq!(params.bias_drift_onset, taus[9]);
    assert!(params.drift_onset_observed);
}

#[test]
fn monotonic_curve_reports_last_tau_as_onset() {
    let taus = vec![0.01, 0.1, 1.0, 10.0];
    let curve = DeviationCurve::from_parts(taus, vec![1.0, 0.5, 0.2, 0.1]).unwrap();
    let params = extract_noise_parameters(&curve, SensorType::Accel, 1.3).unwrap();

    assert_eq!(params.averaging_time, 10.0);
    assert_eq!(params.bias_drift_onset, 10.0);
    assert!(!params.drift_onset_observed);
}

#[test]
fn long_windows_are_dropped_not_failed() {
    let samples = white_noise(100, 1.0, 5);
    let signal = Signal::new(&samples, 1.0).unwrap();
    let config = AllanConfig {
        sample_rate: 1.0,
        max_fraction: 1.0,
        n_points: 30,
        ..Default::default()
    };
    let analysis = analyze_signal("gyro_z", &signal, SensorType::Gyro, &config).unwrap();

    assert_eq!(analysis.grid_points, 30);
    assert!(!analysis.curve.skipped().is_empty());
    assert_eq!(analysis.curve.len() + analysis.curve.skipped().len(), 30);
    assert!(analysis.curve.stats().iter().all(|s| 2 * s.window <= 100));
    assert!(analysis.curve.skipped().iter().all(|s| 2 * s.window > 100));
}

#[test]
fn one_bad_channel_does_not_stop_the_others() {
    let mut broken = white_noise(4_000, 0.01, 1);
    broken[1234] = f64::INFINITY;
    let channels = vec![
        ImuChannel {
            name: "gyro_x".to_string(),
            sensor: SensorType::Gyro,
            samples: white_noise(4_000, 0.01, 2),
        },
        ImuChannel {
            name: "gyro_y".to_string(),
            sensor: SensorType::Gyro,
            samples: broken,
        },
        ImuChannel {
            name: "accel_x".to_string(),
            sensor: SensorType::Accel,
            samples: white_noise(4_000, 0.05, 3),
        },
    ];
    let outcomes = analyze_channels(&channels, &white_noise_config());

    assert_eq!(outcomes.len(), 3);
    assert!(outcomes[0].result.is_ok());
    match &outcomes[1].result {
        Err(AllanError::InvalidSample { index, value }) => {
            assert_eq!(*index, 1234);
            assert!(value.is_infinite());
        }
        other => panic!("expected InvalidSample, got {other:?}"),
    }
    let accel = outcomes[2].result.as_ref().unwrap();
    assert_eq!(accel.parameters.sensor, SensorType::Accel);
}

#[test]
fn too_short_signal_is_a_config_error() {
    let samples = white_noise(5, 1.0, 9);
    let signal = Signal::new(&samples, 1000.0).unwrap();
    let result = analyze_signal("gyro_x", &signal, SensorType::Gyro, &white_noise_config());
    assert!(matches!(result, Err(AllanError::InvalidConfig(_))));
}
