use vigil_core::config::*;

#[test]
fn config_loads_from_empty_toml_with_all_defaults() {
    let config = VigilConfig::from_toml("").unwrap();

    // Decay defaults
    assert_eq!(config.decay.recommendation_threshold, 0.6);
    assert_eq!(config.decay.critical_probability, 0.85);
    assert_eq!(config.decay.horizon_days, 365);

    // Scheduler defaults
    assert_eq!(config.scheduler.max_retries, 3);
    assert_eq!(config.scheduler.backoff_base_secs, 60);
    assert_eq!(config.scheduler.backoff_factor, 2);
    assert_eq!(config.scheduler.backoff_cap_secs, 3_600);

    // Trend defaults
    assert_eq!(config.trends.default_window_days, 30);
    assert_eq!(config.trends.noise_margin, 5.0);

    // Runtime defaults
    assert_eq!(config.runtime.worker_count, 4);

    // Storage / observability defaults
    assert_eq!(config.storage.db_path, "vigil.db");
    assert_eq!(config.observability.log_level, "info");
}

#[test]
fn config_loads_partial_toml_with_overrides() {
    let toml = r#"
[scheduler]
max_retries = 5
backoff_cap_secs = 600

[scoring.weights]
sleep_quality = 2.0

[decay.logistic]
day_rate = 0.05
"#;
    let config = VigilConfig::from_toml(toml).unwrap();
    assert_eq!(config.scheduler.max_retries, 5);
    assert_eq!(config.scheduler.backoff_cap_secs, 600);
    // Non-overridden fields keep defaults
    assert_eq!(config.scheduler.backoff_base_secs, 60);
    assert_eq!(config.scoring.weights.get("sleep_quality"), Some(&2.0));
    assert_eq!(config.decay.logistic.day_rate, 0.05);
    assert_eq!(config.decay.logistic.intercept, -1.0);
}

#[test]
fn config_serde_roundtrip() {
    let config = VigilConfig::default();
    let toml_str = toml::to_string(&config).unwrap();
    let roundtripped = VigilConfig::from_toml(&toml_str).unwrap();
    assert_eq!(roundtripped.storage.db_path, config.storage.db_path);
    assert_eq!(
        roundtripped.scheduler.dispatch_timeout_ms,
        config.scheduler.dispatch_timeout_ms
    );
}

#[test]
fn config_rejects_threshold_outside_unit_interval() {
    let err = VigilConfig::from_toml("[decay]\nrecommendation_threshold = 1.5\n").unwrap_err();
    assert!(err.to_string().contains("recommendation_threshold"));
}

#[test]
fn config_rejects_zero_workers() {
    assert!(VigilConfig::from_toml("[runtime]\nworker_count = 0\n").is_err());
}

#[test]
fn config_rejects_negative_weight() {
    assert!(VigilConfig::from_toml("[scoring.weights]\nfinancial_stress = -1.0\n").is_err());
}

#[test]
fn config_rejects_malformed_toml() {
    let err = VigilConfig::from_toml("[scheduler\nmax_retries = 2").unwrap_err();
    assert!(matches!(err, vigil_core::VigilError::Config(_)));
}

#[test]
fn config_rejects_spans_beyond_ten_years() {
    for toml in [
        "[scheduler]\nassessment_lead_secs = 9223372036854775807\n",
        "[scheduler]\nbackoff_cap_secs = 315360001\n",
        "[scheduler]\nconfirmation_window_secs = 400000000\n",
        "[decay]\nlead_secs = 9223372036854775807\n",
        "[trends]\nretention_days = 3651\n",
        "[trends]\ndefault_window_days = 9223372036854775807\n",
    ] {
        let err = VigilConfig::from_toml(toml).unwrap_err();
        assert!(matches!(err, vigil_core::VigilError::Config(_)), "{toml}");
    }
    assert!(VigilConfig::from_toml("[scheduler]\nassessment_lead_secs = 315360000\n").is_ok());
}

#[test]
fn config_rejects_negative_logistic_weights() {
    let err = VigilConfig::from_toml("[decay.logistic]\nstrength_weight = -0.5\n").unwrap_err();
    assert!(err.to_string().contains("strength_weight"));
    assert!(VigilConfig::from_toml("[decay.logistic]\nimportance_weight = -1.0\n").is_err());
    assert!(VigilConfig::from_toml("[decay.logistic]\nemotional_weight = 0.0\n").is_ok());
}
