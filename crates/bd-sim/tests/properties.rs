//! Property tests over random environment configurations.

use bd_results::parse_elapsed;
use bd_sim::{Environment, EnvironmentConfig};
use proptest::prelude::*;

fn rises(flags: impl Iterator<Item = bool>) -> u32 {
    let mut previous = false;
    let mut count = 0;
    for flag in flags {
        if flag && !previous {
            count += 1;
        }
        previous = flag;
    }
    count
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn elapsed_advances_by_exactly_one_step(
        step in 1_i64..=30,
        horizon in 1_i64..=50_000,
        temperature in 0.0_f64..70.0,
        ph in 5.0_f64..9.5,
    ) {
        let mut env = Environment::new(EnvironmentConfig {
            time_step_min: step,
            horizon_s: horizon,
            initial_temperature_c: temperature,
            initial_ph: ph,
            ..EnvironmentConfig::default()
        }).unwrap();
        let report = env.run(None).unwrap();

        let step_s = step as u64 * 60;
        let expected_ticks = horizon as u64 / step_s + 1;
        prop_assert_eq!(report.ticks, expected_ticks);

        let mut last = 0_u64;
        for snapshot in &report.output.time_series {
            let elapsed = parse_elapsed(&snapshot.elapsed_time).unwrap();
            prop_assert_eq!(elapsed, last + step_s);
            last = elapsed;
        }
        prop_assert!(last > horizon as u64);
    }

    #[test]
    fn counters_match_recorded_edges(
        temperature in 0.0_f64..70.0,
        ph in 5.0_f64..9.5,
    ) {
        let mut env = Environment::new(EnvironmentConfig {
            horizon_s: 2 * 86_400,
            initial_temperature_c: temperature,
            initial_ph: ph,
            ..EnvironmentConfig::default()
        }).unwrap();
        let report = env.run(None).unwrap();
        let series = &report.output.time_series;
        let counts = report.output.summary.activations;

        prop_assert_eq!(counts.pump, rises(series.iter().map(|s| s.pump)));
        prop_assert_eq!(counts.acid_valve, rises(series.iter().map(|s| s.acid_valve)));
        prop_assert_eq!(counts.base_valve, rises(series.iter().map(|s| s.base_valve)));
        // A valve hand-over can stop and restart the agitator inside one tick.
        prop_assert!(counts.agitator >= rises(series.iter().map(|s| s.agitator)));
    }

    #[test]
    fn state_stays_finite(
        temperature in -10.0_f64..90.0,
        ph in 0.0_f64..14.0,
    ) {
        let mut env = Environment::new(EnvironmentConfig {
            horizon_s: 86_400,
            initial_temperature_c: temperature,
            initial_ph: ph,
            ..EnvironmentConfig::default()
        }).unwrap();
        let report = env.run(None).unwrap();
        for snapshot in &report.output.time_series {
            prop_assert!(snapshot.temperature.is_finite());
            prop_assert!(snapshot.ph.is_finite());
        }
    }
}
