use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

use crate::error::DispatchError;

/// One-shot dispatch mode, selected once per invocation.
///
/// `Prod` sends to whatever each record's `to_user_emails` contains; `Test`
/// redirects every message to the configured test address list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Test,
    Prod,
}

impl FromStr for Mode {
    type Err = DispatchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "test" => Ok(Mode::Test),
            "prod" => Ok(Mode::Prod),
            other => Err(DispatchError::Configuration(format!(
                "`mode` must be `test` or `prod`, got `{other}`"
            ))),
        }
    }
}

impl Display for Mode {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Mode::Test => write!(f, "test"),
            Mode::Prod => write!(f, "prod"),
        }
    }
}
