use std::path::PathBuf;

/// Everything that can go wrong while turning an input table into a
/// figure panel.
///
/// All variants except [`Error::LookupMiss`] abort the run. A lookup miss is
/// returned to the caller, who logs it and skips the offending record.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("input not found: {}", path.display())]
    InputNotFound { path: PathBuf },

    #[error("schema mismatch in {path}: {reason}")]
    SchemaMismatch { path: String, reason: String },

    #[error("malformed value {value:?} in {path}, line {line}, column {column:?}")]
    MalformedValue {
        path: String,
        line: usize,
        column: String,
        value: String,
    },

    #[error("no manuscript code matches {token:?}")]
    LookupMiss { token: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),
}

impl Error {
    pub(crate) fn schema<P: AsRef<str>, R: Into<String>>(path: P, reason: R) -> Error {
        Error::SchemaMismatch {
            path: path.as_ref().into(),
            reason: reason.into(),
        }
    }

    /// Map an [`std::io::Error`] raised while opening `path`, turning a
    /// missing file into [`Error::InputNotFound`]
    pub(crate) fn open<P: Into<PathBuf>>(path: P, err: std::io::Error) -> Error {
        match err.kind() {
            std::io::ErrorKind::NotFound => Error::InputNotFound { path: path.into() },
            _ => Error::Io(err),
        }
    }

    /// Fatal errors abort the run, lookup misses are reported and skipped
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Error::LookupMiss { .. })
    }
}

pub type Result<T> = std::result::Result<T, Error>;
