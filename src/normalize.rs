use tracing::warn;

use crate::error::DispatchError;
use crate::models::record::RecipientRecord;

/// Mutually exclusive address lists for one message. `cc` and `bcc` are
/// empty when no valid addresses remain after overlap removal.
#[derive(Debug, Clone, Default)]
pub struct NormalizedRecipients {
    pub to: Vec<String>,
    pub cc: Vec<String>,
    pub bcc: Vec<String>,
}

impl NormalizedRecipients {
    pub fn to_joined(&self) -> String {
        self.to.join(",")
    }

    pub fn cc_joined(&self) -> Option<String> {
        if self.cc.is_empty() {
            None
        } else {
            Some(self.cc.join(","))
        }
    }
}

/// Splits the record's raw comma-delimited recipient strings into
/// deduplicated `to`/`cc`/`bcc` lists.
///
/// Tokens without an `@` are dropped with a warning; matches are
/// case-sensitive. A record whose `to` field yields zero valid addresses is
/// rejected rather than producing an empty-recipient message.
pub fn normalize_recipients(
    record: &RecipientRecord,
    bcc_emails: Option<&[String]>,
) -> Result<NormalizedRecipients, DispatchError> {
    let to = valid_tokens(&record.to_user_emails, &record.unique_id, "to_user_emails");

    if to.is_empty() {
        return Err(DispatchError::InvalidRecord(format!(
            "record `{}` has no valid `to_user_emails` address",
            record.unique_id
        )));
    }

    let cc: Vec<String> = record
        .cc_user_emails
        .as_deref()
        .map(|raw| valid_tokens(raw, &record.unique_id, "cc_user_emails"))
        .unwrap_or_default()
        .into_iter()
        .filter(|address| !to.contains(address))
        .collect();

    let bcc: Vec<String> = bcc_emails
        .unwrap_or_default()
        .iter()
        .filter(|address| address.contains('@'))
        .filter(|address| !to.contains(*address) && !cc.contains(*address))
        .cloned()
        .collect();

    Ok(NormalizedRecipients { to, cc, bcc })
}

fn valid_tokens(raw: &str, unique_id: &str, field: &str) -> Vec<String> {
    let mut valid = Vec::new();

    for token in raw.split(',') {
        if token.contains('@') {
            valid.push(token.to_string());
        } else if !token.is_empty() {
            warn!(
                unique_id,
                field,
                token,
                "Dropping malformed address token"
            );
        }
    }

    valid
}
