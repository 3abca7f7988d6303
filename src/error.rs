//! Errors raised while loading a sample sheet or resolving filenames from it.

/// Failure to interpret a sample sheet. Resolution is all-or-nothing: the
/// first offending row or lookup aborts the whole call.
#[derive(Debug, thiserror::Error)]
pub enum SampleSheetError {
    #[error("The sample sheet is missing the required column '{column}'")]
    MissingColumn { column: &'static str },

    #[error("The sample sheet has no [Data] section")]
    MissingDataSection,

    #[error("Invalid value {value:?} in column '{column}' on line {line} of the sample sheet: {reason}")]
    MalformedField {
        line: u64,
        column: &'static str,
        value: String,
        reason: &'static str,
    },

    #[error("No sample sheet row matches the sample key '{key}'")]
    UnresolvedSampleKey { key: String },

    #[error(
        "The sample key '{key}' matches rows with different FASTQ prefixes: {}",
        prefixes.join(", ")
    )]
    AmbiguousJoin { key: String, prefixes: Vec<String> },

    #[error("Error reading sample sheet CSV")]
    Csv(#[from] csv::Error),

    #[error("Error reading sample sheet")]
    Io(#[from] std::io::Error),
}

impl SampleSheetError {
    /// True for the errors caused by the contents of the sample sheet itself,
    /// as opposed to a failed lookup or an I/O problem.
    pub fn is_malformed_manifest(&self) -> bool {
        matches!(
            self,
            SampleSheetError::MissingColumn { .. }
                | SampleSheetError::MissingDataSection
                | SampleSheetError::MalformedField { .. }
        )
    }
}
