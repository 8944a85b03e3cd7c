mod error;
mod extraction_client;
mod types;

pub use error::{ErrorKind, ExtractError};
pub use extraction_client::{ExtractionClient, EXTRACT_PATH, FILE_FIELD, HEALTH_PATH};
pub use types::{ExtractedField, ExtractionResult, RequestPhase, SelectedFile, SUPPORTED_EXTENSIONS};

#[cfg(test)]
pub(crate) mod mock_service;
