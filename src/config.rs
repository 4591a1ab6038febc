use std::str::FromStr;

use dotenvy::dotenv;
use serde::Deserialize;
use tracing::warn;

use crate::error::DispatchError;
use crate::models::{mode::Mode, retry::RetryConfig};

/// One invocation's worth of dispatch configuration.
///
/// Loadable from the environment via [`DispatchConfig::load`] or built
/// directly by library callers. Validation runs before any record is
/// processed; every configuration problem is surfaced as
/// [`DispatchError::Configuration`].
#[derive(Clone, Deserialize, Debug)]
pub struct DispatchConfig {
    /// `"test"` or `"prod"`. Anything else is rejected.
    pub mode: String,
    pub email_body_template_html: String,
    pub email_subject: String,
    pub from_user_email: String,
    /// Opaque credential handed to the mail provider client.
    pub sendgrid_key: String,

    #[serde(default)]
    pub notification_type: Option<String>,
    #[serde(default)]
    pub update_historical_notification_log: bool,
    #[serde(default = "default_number_of_test_records")]
    pub number_of_test_records: usize,
    #[serde(default)]
    pub do_not_send_any_emails: bool,
    #[serde(default)]
    pub skip_if_email_sent: bool,
    /// Qualified `<database>.<table>` name of the historical log.
    #[serde(default)]
    pub historical_database_table: Option<String>,
    #[serde(default)]
    pub bcc_emails: Option<Vec<String>>,

    #[serde(default)]
    pub email_body_variables: Option<Vec<String>>,
    #[serde(default)]
    pub email_subject_variables: Option<Vec<String>>,
    #[serde(default)]
    pub only_send_to_test_emails: Option<Vec<String>>,
    #[serde(default)]
    pub reply_to_domain: Option<String>,
    #[serde(default)]
    pub do_not_cc_anyone: bool,

    #[serde(default = "default_log_write_max_attempts")]
    pub log_write_max_attempts: u32,
    #[serde(default = "default_log_write_delay_ms")]
    pub log_write_initial_delay_ms: u64,
    #[serde(default = "default_log_write_delay_ms")]
    pub log_write_max_delay_ms: u64,
    #[serde(default = "default_log_write_backoff_multiplier")]
    pub log_write_backoff_multiplier: u64,
}

fn default_number_of_test_records() -> usize {
    1
}

fn default_log_write_max_attempts() -> u32 {
    30
}

// Matches the historical 10-second append retry cadence, but bounded.
fn default_log_write_delay_ms() -> u64 {
    10_000
}

fn default_log_write_backoff_multiplier() -> u64 {
    1
}

impl DispatchConfig {
    pub fn load() -> Result<Self, DispatchError> {
        dotenv().ok();

        envy::from_env::<Self>().map_err(|e| {
            DispatchError::Configuration(format!("invalid or missing environment variable: {e}"))
        })
    }

    pub fn mode(&self) -> Result<Mode, DispatchError> {
        Mode::from_str(&self.mode)
    }

    pub fn log_write_retry_config(&self) -> RetryConfig {
        RetryConfig {
            max_attempts: self.log_write_max_attempts,
            initial_delay_ms: self.log_write_initial_delay_ms,
            max_delay_ms: self.log_write_max_delay_ms,
            backoff_multiplier: self.log_write_backoff_multiplier,
        }
    }

    /// Validates the configuration and returns the effective copy used for
    /// the rest of the invocation. In prod mode a configured test-recipient
    /// override is dropped here, with a warning.
    pub fn validate(&self) -> Result<Self, DispatchError> {
        let mode = self.mode()?;

        let logging_requested = self.update_historical_notification_log
            || self.skip_if_email_sent
            || self.historical_database_table.is_some();

        if logging_requested && self.notification_type.is_none() {
            return Err(DispatchError::Configuration(
                "`notification_type` is required when historical logging or dedup is used"
                    .to_string(),
            ));
        }

        if self.skip_if_email_sent || self.update_historical_notification_log {
            match self.historical_database_table.as_deref() {
                None => {
                    return Err(DispatchError::Configuration(
                        "`historical_database_table` is required when `skip_if_email_sent` or \
                         `update_historical_notification_log` is set"
                            .to_string(),
                    ));
                }
                Some(table) => {
                    let mut parts = table.split('.');
                    let well_formed = matches!(
                        (parts.next(), parts.next(), parts.next()),
                        (Some(database), Some(name), None) if !database.is_empty() && !name.is_empty()
                    );
                    if !well_formed {
                        return Err(DispatchError::Configuration(format!(
                            "`historical_database_table` must be `<database>.<table>`, got `{table}`"
                        )));
                    }
                }
            }
        }

        let mut effective = self.clone();

        match mode {
            Mode::Prod => {
                if effective.only_send_to_test_emails.take().is_some() {
                    warn!("Ignoring `only_send_to_test_emails` because `mode` is `prod`");
                }
            }
            Mode::Test => {
                let valid_override = effective
                    .only_send_to_test_emails
                    .as_ref()
                    .is_some_and(|emails| !emails.is_empty());
                if !valid_override {
                    return Err(DispatchError::Configuration(
                        "test mode requires `only_send_to_test_emails` with at least one address"
                            .to_string(),
                    ));
                }
            }
        }

        Ok(effective)
    }
}
