use crate::services::api::ApiError;
use thiserror::Error;

pub const MSG_MISSING_FIELDS: &str = "Please fill in all required fields.";
pub const MSG_NOTHING_TO_EXPORT: &str = "There is no storyboard to download.";
pub const MSG_NOTHING_TO_COPY: &str = "There is no text to copy.";
pub const MSG_COPY_FAILED: &str = "Failed to copy the text.";
pub const MSG_SAVE_FAILED: &str = "Failed to save the DOCX file.";
pub const MSG_RESULT_SAVE_FAILED: &str = "Failed to save the storyboard.";
pub const MSG_IN_FLIGHT: &str = "A storyboard is already being generated.";

/// Backend operation a request failure belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Generate,
    Export,
}

impl Operation {
    /// Message shown when the server did not supply one.
    pub fn fallback_message(self) -> &'static str {
        match self {
            Operation::Generate => "Failed to generate the storyboard.",
            Operation::Export => "Failed to download the DOCX file.",
        }
    }
}

/// Everything a controller operation can fail with. Each variant ends in
/// exactly one message on the error surface.
#[derive(Debug, Error)]
pub enum ControllerError {
    #[error("required fields missing")]
    MissingFields,

    #[error("{operation:?} request failed: {source}")]
    Request {
        operation: Operation,
        #[source]
        source: ApiError,
    },

    #[error("nothing to export")]
    NothingToExport,

    #[error("nothing to copy")]
    NothingToCopy,

    #[error("copy failed: {0}")]
    CopyFailed(String),

    #[error("saving the document failed: {0}")]
    SaveFailed(String),

    #[error("saving the storyboard JSON failed: {0}")]
    ResultSaveFailed(String),

    /// A generation request is still pending.
    #[error("generation already in flight")]
    InFlight,
}

impl ControllerError {
    pub fn request(operation: Operation, source: ApiError) -> Self {
        Self::Request { operation, source }
    }

    /// The text placed on the error surface.
    pub fn user_message(&self) -> String {
        match self {
            ControllerError::MissingFields => MSG_MISSING_FIELDS.to_string(),
            ControllerError::Request { operation, source } => source
                .server_message()
                .map(str::to_string)
                .unwrap_or_else(|| operation.fallback_message().to_string()),
            ControllerError::NothingToExport => MSG_NOTHING_TO_EXPORT.to_string(),
            ControllerError::NothingToCopy => MSG_NOTHING_TO_COPY.to_string(),
            ControllerError::CopyFailed(_) => MSG_COPY_FAILED.to_string(),
            ControllerError::SaveFailed(_) => MSG_SAVE_FAILED.to_string(),
            ControllerError::ResultSaveFailed(_) => MSG_RESULT_SAVE_FAILED.to_string(),
            ControllerError::InFlight => MSG_IN_FLIGHT.to_string(),
        }
    }
}
