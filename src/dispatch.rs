use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::clients::{sendgrid::MailSender, storage::TableStore};
use crate::config::DispatchConfig;
use crate::dedup::filter_already_sent;
use crate::error::DispatchError;
use crate::log_writer::append_history;
use crate::models::{
    log::PendingEntry,
    message::DispatchMessage,
    mode::Mode,
    record::{RecipientRecord, RecordSet},
    report::{DispatchReport, RecordOutcome, SendStatus},
};
use crate::normalize::{NormalizedRecipients, normalize_recipients};
use crate::render::render_template;

/// Clients owned by one invocation. There is no shared global session;
/// every component receives what it needs through this context.
pub struct DispatchContext {
    pub mailer: Arc<dyn MailSender>,
    pub store: Arc<dyn TableStore>,
}

/// Runs the full pipeline: dedup filter, per-record normalization,
/// rendering and dispatch, then the historical log append.
///
/// Records are processed strictly in order. A send failure is recorded in
/// the report and never aborts the batch; configuration and render errors
/// do. The returned report carries one outcome per processed record.
pub async fn send_email_notifications(
    ctx: &DispatchContext,
    config: &DispatchConfig,
    records: RecordSet,
) -> Result<DispatchReport, DispatchError> {
    let config = config.validate()?;
    let mode = config.mode()?;

    let mut records = records;
    if let Some(notification_type) = config.notification_type.as_deref() {
        records.stamp_notification_type(notification_type);
    }

    if config.skip_if_email_sent {
        // Both values are guaranteed present by validate().
        let (Some(table), Some(notification_type)) = (
            config.historical_database_table.as_deref(),
            config.notification_type.as_deref(),
        ) else {
            return Err(DispatchError::Configuration(
                "`skip_if_email_sent` requires `historical_database_table` and `notification_type`"
                    .to_string(),
            ));
        };
        records = filter_already_sent(records, ctx.store.as_ref(), table, notification_type).await?;
    }

    if mode == Mode::Test {
        let keep = config.number_of_test_records.min(records.len());
        info!(
            requested = config.number_of_test_records,
            keep, "Test mode: truncating candidate set"
        );
        records.truncate(keep);
    }

    if records.is_empty() {
        info!("No records to dispatch");
        return Ok(DispatchReport::default());
    }

    let mut report = DispatchReport::default();
    let mut history_batch: Vec<PendingEntry> = Vec::new();

    for record in records.iter() {
        // The log always reflects the record's own recipients, even when
        // test mode redirects the actual send.
        let bcc_source = match mode {
            Mode::Prod => config.bcc_emails.as_deref(),
            Mode::Test => None,
        };
        let recipients = normalize_recipients(record, bcc_source)?;

        history_batch.push(PendingEntry {
            to_user_emails: recipients.to_joined(),
            cc_user_emails: recipients.cc_joined(),
            notification_type: record.notification_type.clone().unwrap_or_default(),
            unique_id: record.unique_id.clone(),
        });

        let html_body = render_template(
            &config.email_body_template_html,
            config.email_body_variables.as_deref(),
            record,
        )?;
        let subject = render_template(
            &config.email_subject,
            config.email_subject_variables.as_deref(),
            record,
        )?;

        let message = build_message(&config, mode, record, &recipients, subject, html_body);

        info!(
            unique_id = %record.unique_id,
            to = ?message.to,
            cc = ?message.cc,
            bcc = ?message.bcc,
            "Dispatching notification"
        );

        let status = if config.do_not_send_any_emails {
            info!(unique_id = %record.unique_id, "Dry run enabled, skipping send");
            SendStatus::DryRun
        } else {
            match ctx.mailer.send(&message).await {
                Ok(response) => {
                    debug!(
                        unique_id = %record.unique_id,
                        status_code = response.status_code,
                        "Send accepted"
                    );
                    SendStatus::Sent
                }
                Err(e) => {
                    warn!(
                        unique_id = %record.unique_id,
                        error = %e,
                        "Send failed, continuing with remaining records"
                    );
                    SendStatus::Failed(e.to_string())
                }
            }
        };

        report.outcomes.push(RecordOutcome {
            unique_id: record.unique_id.clone(),
            to_user_emails: message.to.join(","),
            status,
        });
    }

    if config.update_historical_notification_log {
        let Some(table) = config.historical_database_table.as_deref() else {
            return Err(DispatchError::Configuration(
                "`update_historical_notification_log` requires `historical_database_table`"
                    .to_string(),
            ));
        };
        report.log_entries_appended = append_history(
            ctx.store.as_ref(),
            table,
            history_batch,
            &config.log_write_retry_config(),
        )
        .await?;
    } else {
        debug!("Historical notification log update disabled");
    }

    info!(
        sent = report.sent_count(),
        failed = report.failed_count(),
        dry_run = report.dry_run_count(),
        logged = report.log_entries_appended,
        "Dispatch batch complete"
    );

    Ok(report)
}

fn build_message(
    config: &DispatchConfig,
    mode: Mode,
    record: &RecipientRecord,
    recipients: &NormalizedRecipients,
    subject: String,
    html_body: String,
) -> DispatchMessage {
    let (to, cc, bcc) = match mode {
        Mode::Test => (
            config.only_send_to_test_emails.clone().unwrap_or_default(),
            Vec::new(),
            Vec::new(),
        ),
        Mode::Prod => {
            let cc = if config.do_not_cc_anyone {
                Vec::new()
            } else {
                recipients.cc.clone()
            };
            (recipients.to.clone(), cc, recipients.bcc.clone())
        }
    };

    if mode == Mode::Test {
        debug!(unique_id = %record.unique_id, to = ?to, "Redirecting to test addresses");
    }

    DispatchMessage {
        from: config.from_user_email.clone(),
        to,
        cc,
        bcc,
        subject,
        html_body,
        reply_to: reply_to_address(config),
    }
}

/// Reply-to is the sender's local part on the authenticated domain, when
/// one is configured.
fn reply_to_address(config: &DispatchConfig) -> Option<String> {
    let domain = config.reply_to_domain.as_deref()?;
    let local_part = config.from_user_email.split('@').next()?;
    Some(format!("{local_part}@{domain}"))
}
