use std::path::PathBuf;

/// Result type alias for the extraction pipeline
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for the extraction pipeline.
///
/// `Config` and `Consistency` are fatal and abort the run immediately.
/// `Undocumented` is a per-method signal: the extractor catches it, records the
/// method as undocumented and continues. `ExpiredIgnore` is promoted to fatal.
#[derive(Debug)]
pub enum Error {
    IoError(std::io::Error),
    ParseError { file: PathBuf, message: String },
    /// Missing or unresolvable configuration (scan scope, configured type names)
    Config(String),
    /// Self-contradictory declared metadata (domain name mismatch, missing
    /// parameter description, type outside the base-type boundary)
    Consistency(String),
    /// A route-mapped method without operation metadata; recorded, not fatal
    Undocumented(String),
    /// An ignore marker whose expiry date has passed
    ExpiredIgnore(String),
    /// The break-on-undocumented gate tripped after the report was printed
    UndocumentedGate(usize),
    SerializationError(String),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Error::IoError(e) => write!(f, "IO error: {}", e),
            Error::ParseError { file, message } => {
                write!(f, "parse error in {}: {}", file.display(), message)
            }
            Error::Config(msg) => write!(f, "configuration error: {}", msg),
            Error::Consistency(msg) => write!(f, "inconsistent documentation metadata: {}", msg),
            Error::Undocumented(msg) => write!(f, "undocumented method: {}", msg),
            Error::ExpiredIgnore(msg) => write!(f, "expired ignore marker: {}", msg),
            Error::UndocumentedGate(count) => write!(
                f,
                "there are {} undocumented methods, error handlers or fields, see report",
                count
            ),
            Error::SerializationError(msg) => write!(f, "serialization error: {}", msg),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::IoError(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::IoError(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::SerializationError(format!("JSON serialization error: {}", err))
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(err: serde_yaml::Error) -> Self {
        Error::SerializationError(format!("YAML serialization error: {}", err))
    }
}

impl From<syn::Error> for Error {
    fn from(err: syn::Error) -> Self {
        Error::ParseError {
            file: PathBuf::from("<unknown>"),
            message: err.to_string(),
        }
    }
}
