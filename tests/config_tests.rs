mod common;

use common::base_config;
use email_dispatch::error::DispatchError;

/// Test: Only `test` and `prod` are accepted mode literals
#[test]
fn test_invalid_mode_is_rejected() {
    let config = base_config("staging");

    let err = config.validate().unwrap_err();
    assert!(matches!(err, DispatchError::Configuration(_)));
    assert!(err.to_string().contains("staging"));
}

/// Test: Test mode requires a non-empty test-recipient override
#[test]
fn test_test_mode_requires_recipient_override() {
    let config = base_config("test");

    let err = config.validate().unwrap_err();
    assert!(matches!(err, DispatchError::Configuration(_)));

    let mut config = base_config("test");
    config.only_send_to_test_emails = Some(vec![]);

    let err = config.validate().unwrap_err();
    assert!(matches!(err, DispatchError::Configuration(_)));
}

/// Test: Prod mode silently drops the test-recipient override
#[test]
fn test_prod_mode_drops_recipient_override() {
    let mut config = base_config("prod");
    config.only_send_to_test_emails = Some(vec!["qa@example.com".to_string()]);

    let effective = config.validate().unwrap();
    assert!(effective.only_send_to_test_emails.is_none());
}

/// Test: Logging and dedup features require a notification type
#[test]
fn test_logging_requires_notification_type() {
    let mut config = base_config("prod");
    config.update_historical_notification_log = true;
    config.historical_database_table = Some("notifications.history".to_string());

    let err = config.validate().unwrap_err();
    assert!(matches!(err, DispatchError::Configuration(_)));
    assert!(err.to_string().contains("notification_type"));

    let mut config = base_config("prod");
    config.historical_database_table = Some("notifications.history".to_string());

    assert!(config.validate().is_err());
}

/// Test: Dedup requires the historical table to be configured
#[test]
fn test_dedup_requires_historical_table() {
    let mut config = base_config("prod");
    config.skip_if_email_sent = true;
    config.notification_type = Some("welcome".to_string());

    let err = config.validate().unwrap_err();
    assert!(matches!(err, DispatchError::Configuration(_)));
    assert!(err.to_string().contains("historical_database_table"));
}

/// Test: The historical table name must be `<database>.<table>`
#[test]
fn test_historical_table_name_must_be_qualified() {
    for bad in ["history", "a.b.c", ".history", "notifications."] {
        let mut config = base_config("prod");
        config.update_historical_notification_log = true;
        config.notification_type = Some("welcome".to_string());
        config.historical_database_table = Some(bad.to_string());

        let err = config.validate().unwrap_err();
        assert!(
            matches!(err, DispatchError::Configuration(_)),
            "expected rejection of `{bad}`"
        );
    }
}

/// Test: A complete valid configuration passes validation unchanged
#[test]
fn test_valid_configuration_passes() {
    let mut config = base_config("prod");
    config.skip_if_email_sent = true;
    config.update_historical_notification_log = true;
    config.notification_type = Some("welcome".to_string());
    config.historical_database_table = Some("notifications.history".to_string());

    let effective = config.validate().unwrap();
    assert_eq!(effective.notification_type.as_deref(), Some("welcome"));

    let mut config = base_config("test");
    config.only_send_to_test_emails = Some(vec!["qa@example.com".to_string()]);
    assert!(config.validate().is_ok());
}
