//! Deduplicated, idempotent bulk email dispatch.
//!
//! Given a candidate record table, templates, and a notification identity,
//! the pipeline filters out recipients already present in a historical send
//! log, renders one personalized message per record, dispatches each through
//! a [`clients::sendgrid::MailSender`], and appends the batch to the log
//! with bounded retry on write conflicts.

pub mod clients;
pub mod config;
pub mod dedup;
pub mod dispatch;
pub mod error;
pub mod log_writer;
pub mod models;
pub mod normalize;
pub mod render;
pub mod utils;

pub use config::DispatchConfig;
pub use dispatch::{DispatchContext, send_email_notifications};
pub use error::DispatchError;
pub use models::report::{DispatchReport, SendStatus};
