use thiserror::Error;

/// Everything that can go wrong when admitting a booking candidate. All
/// variants are recoverable and user-correctable; the add surface shows the
/// message and the user resubmits corrected input, which re-runs the full
/// validation chain.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    /// The name field was blank or whitespace-only.
    #[error("Name cannot be empty")]
    EmptyName,
    /// An admitted entry already carries the same name.
    #[error("Duplicate name is not allowed")]
    DuplicateName,
    /// One or both dates were never picked.
    #[error("Please select a valid date range")]
    MissingDateRange,
    /// The departure date precedes the arrival date.
    #[error("End date cannot be earlier than start date")]
    InvertedDateRange,
}
