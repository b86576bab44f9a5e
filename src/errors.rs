use thiserror::Error;

/// Errors reported when a position handed to the list cannot be used.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListError {
    /// The handle points at a released slot or was issued by another list.
    #[error("stale or foreign handle")]
    StaleHandle,

    #[error("end position cannot be advanced or used as an anchor")]
    PastEnd,

    #[error("no element after the given position")]
    NothingAfter,
}
