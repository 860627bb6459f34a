use std::fmt;

/// Everything that can stop a `todo` invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliError {
    /// Bad command line; the message already says what to fix.
    Usage(String),
    Config(String),
    Io(String),
    NotFound(i64),
    /// The operation ran but the backend (or validation) refused it. The
    /// details were already printed as notices.
    Failed,
}

impl CliError {
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Usage(_) => 2,
            _ => 1,
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Usage(msg) => write!(f, "{msg}"),
            CliError::Config(msg) => write!(f, "config error: {msg}"),
            CliError::Io(msg) => write!(f, "I/O error: {msg}"),
            CliError::NotFound(id) => write!(f, "todo {id} not found"),
            CliError::Failed => f.write_str("operation failed"),
        }
    }
}

impl std::error::Error for CliError {}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        CliError::Io(err.to_string())
    }
}
