/// A fully resolved outbound message, built per record and discarded after
/// one dispatch iteration. Never persisted.
#[derive(Debug, Clone)]
pub struct DispatchMessage {
    pub from: String,
    pub to: Vec<String>,
    pub cc: Vec<String>,
    pub bcc: Vec<String>,
    pub subject: String,
    pub html_body: String,
    pub reply_to: Option<String>,
}
