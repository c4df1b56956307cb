// ABOUTME: Tests for dinner configuration loading, defaults, and validation.
// ABOUTME: Uses temporary files to exercise JSON parsing end to end.

use std::io::Write;
use std::time::Duration;

use super::config::DinnerConfig;
use crate::error::ConfigError;

#[test]
fn test_defaults() {
    let config = DinnerConfig::default();
    assert_eq!(config.philosophers, 4);
    assert_eq!(config.dining_steps, 10);
    assert_eq!(config.max_activity(), Duration::from_millis(1000));
    assert!(config.seed.is_none());
    assert!(config.validate().is_ok());
}

#[test]
fn test_builder() {
    let config = DinnerConfig::new(7)
        .dining_steps(3)
        .time_to_waste(Duration::from_millis(25))
        .talk_probability(1.0)
        .seed(42);

    assert_eq!(config.philosophers, 7);
    assert_eq!(config.dining_steps, 3);
    assert_eq!(config.time_to_waste_ms, 25);
    assert_eq!(config.talk_probability, 1.0);
    assert_eq!(config.seed, Some(42));
}

#[test]
fn test_zero_philosophers_rejected() {
    let err = DinnerConfig::new(0).validate().unwrap_err();
    assert!(matches!(err, ConfigError::Invalid(_)));
    assert!(err.to_string().contains("positive integer"));
}

#[test]
fn test_talk_probability_out_of_range_rejected() {
    assert!(DinnerConfig::new(3).talk_probability(1.5).validate().is_err());
    assert!(DinnerConfig::new(3).talk_probability(-0.1).validate().is_err());
    assert!(DinnerConfig::new(3).talk_probability(0.0).validate().is_ok());
}

#[test]
fn test_from_file_fills_missing_fields() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, r#"{{"philosophers": 6, "seed": 9}}"#).unwrap();

    let config = DinnerConfig::from_file(file.path()).unwrap();
    assert_eq!(config.philosophers, 6);
    assert_eq!(config.seed, Some(9));
    assert_eq!(config.dining_steps, 10);
    assert_eq!(config.talk_probability, 0.5);
}

#[test]
fn test_from_file_validates() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, r#"{{"philosophers": 0}}"#).unwrap();

    let err = DinnerConfig::from_file(file.path()).unwrap_err();
    assert!(matches!(err, ConfigError::Invalid(_)));
}

#[test]
fn test_from_file_bad_json() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "philosophers = 3").unwrap();

    let err = DinnerConfig::from_file(file.path()).unwrap_err();
    assert!(matches!(err, ConfigError::Json(_)));
}

#[test]
fn test_from_file_missing() {
    let dir = tempfile::tempdir().unwrap();
    let err = DinnerConfig::from_file(dir.path().join("absent.json")).unwrap_err();
    assert!(matches!(err, ConfigError::Io(_)));
}
