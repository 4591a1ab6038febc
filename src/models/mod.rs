pub mod log;
pub mod message;
pub mod mode;
pub mod record;
pub mod report;
pub mod retry;
