use std::fmt;

#[derive(Debug)]
pub enum ReconError {
    /// TOML parse / deserialization error.
    ConfigParse(String),
    /// Config validation error (empty mapping, bad tolerance, etc.).
    ConfigValidation(String),
    /// Missing required column in input data.
    MissingColumn { feed: String, column: String },
    /// CSV read error.
    Csv { feed: String, message: String },
    /// IO error (file read, etc.).
    Io(String),
}

impl fmt::Display for ReconError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConfigParse(msg) => write!(f, "config parse error: {msg}"),
            Self::ConfigValidation(msg) => write!(f, "config validation error: {msg}"),
            Self::MissingColumn { feed, column } => {
                write!(f, "feed '{feed}': missing column '{column}'")
            }
            Self::Csv { feed, message } => write!(f, "feed '{feed}': {message}"),
            Self::Io(msg) => write!(f, "IO error: {msg}"),
        }
    }
}

impl std::error::Error for ReconError {}
