use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProtKmerError {
    /// Raised for internal errors in the libraries.  Should not happen.
    #[error("internal error: {message:?}")]
    Internal { message: String },

    #[error("content hasher unavailable: {message}")]
    HasherUnavailable { message: String },

    #[error("invalid k-mer size: {ksize} (must be at least 1)")]
    InvalidKsize { ksize: usize },

    #[error("invalid protein character in input: {message}")]
    InvalidProt { message: String },

    #[error("column not found in table header: {column}")]
    MissingColumn { column: String },

    #[error("malformed row on line {line}: {message}")]
    MalformedRow { line: u64, message: String },

    #[error(transparent)]
    CsvError(#[from] csv::Error),

    #[error(transparent)]
    SerdeError(#[from] serde_json::error::Error),

    #[error(transparent)]
    NifflerError(#[from] niffler::Error),

    #[error(transparent)]
    IOError(#[from] std::io::Error),
}

impl ProtKmerError {
    /// Per-record failures: the caller may skip the record and continue.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            ProtKmerError::InvalidProt { .. } | ProtKmerError::MalformedRow { .. }
        )
    }
}

#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProtKmerErrorCode {
    // no error
    NoError = 0,
    // internals
    Internal = 2,
    // configuration errors
    HasherUnavailable = 1_01,
    InvalidKsize = 1_02,
    // input errors
    InvalidProt = 11_01,
    MissingColumn = 11_02,
    MalformedRow = 11_03,
    // external errors
    Io = 100_001,
    SerdeError = 100_004,
    NifflerError = 100_005,
    CsvError = 100_006,
}

impl ProtKmerErrorCode {
    pub fn from_error(error: &ProtKmerError) -> ProtKmerErrorCode {
        match error {
            ProtKmerError::Internal { .. } => ProtKmerErrorCode::Internal,
            ProtKmerError::HasherUnavailable { .. } => ProtKmerErrorCode::HasherUnavailable,
            ProtKmerError::InvalidKsize { .. } => ProtKmerErrorCode::InvalidKsize,
            ProtKmerError::InvalidProt { .. } => ProtKmerErrorCode::InvalidProt,
            ProtKmerError::MissingColumn { .. } => ProtKmerErrorCode::MissingColumn,
            ProtKmerError::MalformedRow { .. } => ProtKmerErrorCode::MalformedRow,
            ProtKmerError::CsvError { .. } => ProtKmerErrorCode::CsvError,
            ProtKmerError::SerdeError { .. } => ProtKmerErrorCode::SerdeError,
            ProtKmerError::NifflerError { .. } => ProtKmerErrorCode::NifflerError,
            ProtKmerError::IOError { .. } => ProtKmerErrorCode::Io,
        }
    }

    /// Process exit status for the command-line driver.
    ///
    /// Codes are folded into the 1..=255 range a shell can observe.
    pub fn exit_status(self) -> i32 {
        match self {
            ProtKmerErrorCode::NoError => 0,
            ProtKmerErrorCode::HasherUnavailable | ProtKmerErrorCode::InvalidKsize => 2,
            ProtKmerErrorCode::InvalidProt
            | ProtKmerErrorCode::MissingColumn
            | ProtKmerErrorCode::MalformedRow => 3,
            ProtKmerErrorCode::Io
            | ProtKmerErrorCode::SerdeError
            | ProtKmerErrorCode::NifflerError
            | ProtKmerErrorCode::CsvError => 4,
            ProtKmerErrorCode::Internal => 1,
        }
    }
}
