use bd_project::schema::*;
use bd_project::{ProjectError, load_json, load_scenario, load_yaml, save_json, save_yaml, validate_scenario};
use chrono::NaiveDate;

fn warm_start() -> Scenario {
    let mut scenario = Scenario {
        name: "Warm start".to_string(),
        ..Scenario::default()
    };
    scenario.environment.time_step_min = 10;
    scenario.environment.horizon_s = 43_200;
    scenario.environment.initial_temperature_c = 45.0;
    scenario.environment.initial_ph = 8.1;
    scenario.environment.start_time = NaiveDate::from_ymd_opt(2024, 3, 1)
        .and_then(|d| d.and_hms_opt(8, 0, 0));
    scenario.digestor.acidification_per_tick = 0.05;
    scenario.controller.agitation_interval_min = 120;
    scenario
}

#[test]
fn roundtrip_yaml_scenario() {
    let scenario = warm_start();
    validate_scenario(&scenario).unwrap();

    let path = std::env::temp_dir().join("bd_project_roundtrip.yaml");
    save_yaml(&path, &scenario).unwrap();
    let loaded = load_yaml(&path).unwrap();

    assert_eq!(scenario, loaded);
}

#[test]
fn roundtrip_json_scenario() {
    let scenario = warm_start();

    let path = std::env::temp_dir().join("bd_project_roundtrip.json");
    save_json(&path, &scenario).unwrap();
    let loaded = load_scenario(&path).unwrap();

    assert_eq!(scenario, loaded);
    assert_eq!(load_json(&path).unwrap(), loaded);
}

#[test]
fn minimal_yaml_fills_defaults() {
    let yaml = r#"
version: 1
name: Cold start
environment:
  time_step_min: 5
  horizon_s: 86400
  initial_temperature_c: 20.0
  initial_ph: 7.0
"#;
    let path = std::env::temp_dir().join("bd_project_minimal.yaml");
    std::fs::write(&path, yaml).unwrap();

    let loaded = load_yaml(&path).unwrap();
    assert_eq!(loaded.digestor, bd_sim::DigestorParams::default());
    assert_eq!(loaded.controller, bd_controls::ControllerConfig::default());
    assert!(loaded.environment.start_time.is_none());
}

#[test]
fn invalid_file_is_rejected_on_load() {
    let yaml = r#"
version: 1
name: Broken
environment:
  time_step_min: -5
  horizon_s: 86400
  initial_temperature_c: 20.0
  initial_ph: 7.0
"#;
    let path = std::env::temp_dir().join("bd_project_invalid.yaml");
    std::fs::write(&path, yaml).unwrap();

    let err = load_yaml(&path).unwrap_err();
    assert!(matches!(err, ProjectError::Validation(_)));
}

#[test]
fn invalid_scenario_is_not_saved() {
    let mut scenario = warm_start();
    scenario.environment.horizon_s = 0;

    let path = std::env::temp_dir().join("bd_project_never_written.yaml");
    let _ = std::fs::remove_file(&path);
    assert!(save_yaml(&path, &scenario).is_err());
    assert!(!path.exists());
}

#[test]
fn environment_config_carries_every_field() {
    let scenario = warm_start();
    let config = scenario.environment_config();

    assert_eq!(config.time_step_min, 10);
    assert_eq!(config.horizon_s, 43_200);
    assert_eq!(config.initial_temperature_c, 45.0);
    assert_eq!(config.initial_ph, 8.1);
    assert_eq!(config.start_time, scenario.environment.start_time);
    assert_eq!(config.digestor, scenario.digestor);
    assert_eq!(config.controller, scenario.controller);
    config.validate().unwrap();
}
