use thiserror::Error;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, ChartError>;

/// Errors surfaced by option builders and the geo layer resolver.
///
/// Everything here is a reported failure: there is no fatal class, and the
/// degraded-but-valid cases (skipped density groups, unmatched region names,
/// empty data after filtering) do not produce errors at all.
#[derive(Error, Debug)]
pub enum ChartError {
    /// A value could not be coerced to a number where one was required,
    /// or an input parameter was out of its valid range.
    #[error("invalid data: {0}")]
    InvalidData(String),

    /// A radar value vector does not match the indicator count.
    #[error("dimension mismatch: expected {expected} values, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    /// Neither an explicit color list nor a recognized scale name.
    #[error("invalid color spec: {0}")]
    InvalidColorSpec(String),

    /// A named column is not present in the table.
    #[error("missing column: {0}")]
    MissingColumn(String),

    /// A boundary source could not be read, fetched, or parsed.
    #[error("load error: {0}")]
    Load(String),
}

impl ChartError {
    pub(crate) fn invalid_data(msg: impl Into<String>) -> Self {
        ChartError::InvalidData(msg.into())
    }

    pub(crate) fn load(msg: impl Into<String>) -> Self {
        ChartError::Load(msg.into())
    }
}
