use thiserror::Error;

/// Errors raised while selecting an experiment variant.
///
/// The last two variants mean the static configuration is wrong, not the
/// request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExperimentError {
    #[error("experiment '{0}' not found")]
    NotFound(String),

    #[error("experiment '{0}' variants and weights do not match")]
    VariantWeightMismatch(String),

    #[error("experiment '{0}' weight total is not 100%")]
    WeightTotalInvalid(String),
}

impl ExperimentError {
    /// True when the failure is caused by configuration rather than input.
    pub fn is_misconfiguration(&self) -> bool {
        !matches!(self, ExperimentError::NotFound(_))
    }
}

/// Errors related to slot listing and booking.
#[derive(Debug, Error)]
pub enum SlotError {
    #[error("time slot not found")]
    NotFound,

    #[error("time slot is already booked")]
    AlreadyBooked,

    #[error("page size must be less than or equal to {max_page_size}")]
    PageSizeExceeded { max_page_size: u32 },

    #[error("invalid pagination: {0}")]
    InvalidPagination(String),

    #[error("invalid email: {0}")]
    InvalidEmail(String),

    #[error("storage error: {0}")]
    Storage(String),
}

/// Errors from repository operations (used by trait definitions in switchyard-core).
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database connection error")]
    Connection,

    #[error("query error: {0}")]
    Query(String),

    #[error("transaction timed out after {0} ms")]
    Timeout(u64),
}

/// Errors loading configuration files at startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed config file '{path}': {message}")]
    Parse { path: String, message: String },

    #[error("invalid configuration: {0}")]
    Invalid(String),
}
