pub mod sendgrid;
pub mod storage;
