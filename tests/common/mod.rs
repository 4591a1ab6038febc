#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use email_dispatch::clients::sendgrid::FakeMailSender;
use email_dispatch::clients::storage::InMemoryTableStore;
use email_dispatch::config::DispatchConfig;
use email_dispatch::dispatch::DispatchContext;
use email_dispatch::models::log::LogEntry;

pub const HISTORY_TABLE: &str = "notifications.history";

pub fn base_config(mode: &str) -> DispatchConfig {
    DispatchConfig {
        mode: mode.to_string(),
        email_body_template_html: "<p>Hello</p>".to_string(),
        email_subject: "Notification".to_string(),
        from_user_email: "alerts@example.com".to_string(),
        sendgrid_key: "SG.test-key".to_string(),
        notification_type: None,
        update_historical_notification_log: false,
        number_of_test_records: 1,
        do_not_send_any_emails: false,
        skip_if_email_sent: false,
        historical_database_table: None,
        bcc_emails: None,
        email_body_variables: None,
        email_subject_variables: None,
        only_send_to_test_emails: None,
        reply_to_domain: None,
        do_not_cc_anyone: false,
        log_write_max_attempts: 5,
        log_write_initial_delay_ms: 1,
        log_write_max_delay_ms: 4,
        log_write_backoff_multiplier: 2,
    }
}

pub fn row(to: &str, cc: &str, unique_id: &str) -> HashMap<String, String> {
    HashMap::from([
        ("to_user_emails".to_string(), to.to_string()),
        ("cc_user_emails".to_string(), cc.to_string()),
        ("unique_id".to_string(), unique_id.to_string()),
    ])
}

pub fn history_entry(to: &str, unique_id: &str, notification_type: &str) -> LogEntry {
    LogEntry {
        to_user_emails: to.to_string(),
        cc_user_emails: None,
        notification_type: notification_type.to_string(),
        unique_id: unique_id.to_string(),
        datetime_sent: Utc::now(),
    }
}

pub struct TestHarness {
    pub mailer: Arc<FakeMailSender>,
    pub store: Arc<InMemoryTableStore>,
    pub ctx: DispatchContext,
}

pub fn harness() -> TestHarness {
    harness_with_mailer(FakeMailSender::new())
}

pub fn harness_with_mailer(mailer: FakeMailSender) -> TestHarness {
    let mailer = Arc::new(mailer);
    let store = Arc::new(InMemoryTableStore::new());
    let ctx = DispatchContext {
        mailer: mailer.clone(),
        store: store.clone(),
    };
    TestHarness { mailer, store, ctx }
}
