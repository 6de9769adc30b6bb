//! Property tests for the actuator counters and the controller policy.

use bd_controls::{
    Actuator, ActuatorKind, Actuators, ControllerConfig, Measurement, MeasurementProvider,
    MicroController, Sensors,
};
use proptest::prelude::*;

struct Probe {
    temperature: f64,
    ph: f64,
}

impl MeasurementProvider for Probe {
    fn measure(&self, measurement: Measurement) -> f64 {
        match measurement {
            Measurement::Temperature => self.temperature,
            Measurement::Ph => self.ph,
        }
    }
}

proptest! {
    #[test]
    fn counter_tracks_off_on_edges(ops in prop::collection::vec(any::<bool>(), 0..200)) {
        let mut valve = Actuator::new(ActuatorKind::BaseValve);
        let mut expected = 0_u32;
        for on in ops {
            let before = valve.activations();
            if on {
                let was_active = valve.is_active();
                valve.activate();
                if !was_active {
                    expected += 1;
                }
            } else {
                valve.deactivate();
            }
            prop_assert!(valve.activations() >= before);
            prop_assert!(valve.activations() - before <= 1);
        }
        prop_assert_eq!(valve.activations(), expected);
    }

    #[test]
    fn policy_counters_never_decrease(
        readings in prop::collection::vec((0.0_f64..80.0, 4.0_f64..10.0), 1..150)
    ) {
        let mut ctl = MicroController::new(ControllerConfig::default()).unwrap();
        let mut act = Actuators::new();
        let mut probe = Probe { temperature: 20.0, ph: 7.0 };
        let mut sensors = Sensors::attach(&probe);

        for (tick, (temperature, ph)) in readings.into_iter().enumerate() {
            probe.temperature = temperature;
            probe.ph = ph;
            sensors.refresh(&probe);

            let before = act.activation_counts();
            let events = ctl.update(&sensors, &mut act, (tick as u64 + 1) * 300);
            let after = act.activation_counts();

            for kind in ActuatorKind::ALL {
                let rises = events.iter().filter(|e| e.kind == kind && e.active).count() as u32;
                prop_assert_eq!(after.get(kind) - before.get(kind), rises);
            }
        }
    }

    #[test]
    fn policy_is_idempotent(temperature in 0.0_f64..80.0, ph in 4.0_f64..10.0, pump_on in any::<bool>()) {
        let mut ctl = MicroController::new(ControllerConfig::default()).unwrap();
        let mut act = Actuators::new();
        if pump_on {
            act.pump.activate();
        }
        let sensors = Sensors::attach(&Probe { temperature, ph });

        ctl.update(&sensors, &mut act, 3600);
        let states = act.states();
        let events = ctl.update(&sensors, &mut act, 3600);

        prop_assert!(events.is_empty());
        prop_assert_eq!(act.states(), states);
    }
}

#[test]
fn boundary_comparisons_are_asymmetric() {
    let config = ControllerConfig::default();

    // Exactly at the low threshold with the pump off: stays off.
    let mut ctl = MicroController::new(config.clone()).unwrap();
    let mut act = Actuators::new();
    let at_low = Sensors::attach(&Probe { temperature: 52.0, ph: 7.0 });
    ctl.update(&at_low, &mut act, 300);
    assert!(!act.pump.is_active());

    // Exactly at the high threshold with the pump on: switches off.
    let mut ctl = MicroController::new(config.clone()).unwrap();
    let mut act = Actuators::new();
    act.pump.activate();
    let at_high = Sensors::attach(&Probe { temperature: 58.0, ph: 7.0 });
    ctl.update(&at_high, &mut act, 300);
    assert!(!act.pump.is_active());
    assert_eq!(ctl.time_to_target_s(), Some(300));

    // pH exactly at either band edge opens nothing.
    for ph in [config.ph_min, config.ph_max] {
        let mut ctl = MicroController::new(config.clone()).unwrap();
        let mut act = Actuators::new();
        let edge = Sensors::attach(&Probe { temperature: 55.0, ph });
        ctl.update(&edge, &mut act, 300);
        assert!(!act.base_valve.is_active());
        assert!(!act.acid_valve.is_active());
    }
}
