use keyward_storage::RetryConfig;
use std::time::Duration;

#[test]
fn default_retry_config() {
    let config = RetryConfig::default();
    assert_eq!(config.max_retries, 3);
    assert_eq!(config.base_delay_ms, 10);
    assert_eq!(config.max_delay_ms, 100);
    assert_eq!(config.attempts(), 4);
}

#[test]
fn no_retry_means_one_attempt() {
    assert_eq!(RetryConfig::no_retry().attempts(), 1);
}

#[test]
fn delay_grows_exponentially_and_caps() {
    let config = RetryConfig::new().with_base_delay_ms(10).with_max_delay_ms(50);
    assert_eq!(config.delay_for(0), Duration::from_millis(10));
    assert_eq!(config.delay_for(1), Duration::from_millis(20));
    assert_eq!(config.delay_for(2), Duration::from_millis(40));
    assert_eq!(config.delay_for(3), Duration::from_millis(50));
    assert_eq!(config.delay_for(100), Duration::from_millis(50));
}

#[test]
fn retry_config_deserializes_with_defaults() {
    let config: RetryConfig = serde_json::from_str(r#"{"max_retries": 7}"#).unwrap();
    assert_eq!(config.max_retries, 7);
    assert_eq!(config.base_delay_ms, 10);
}
