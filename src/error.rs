//! Error types for color extraction.

use thiserror::Error;
use wasm_bindgen::JsValue;

pub type Result<T> = std::result::Result<T, ExtractError>;

#[derive(Error, Debug)]
pub enum ExtractError {
    /// The bitmap is missing, has a zero dimension, or its buffer does not
    /// match its dimensions.
    #[error("Invalid input: {reason}")]
    InvalidInput { reason: String },

    /// A cancel token was observed at a yield point.
    #[error("Color extraction cancelled")]
    Cancelled,

    /// The uploaded file could not be decoded into a bitmap.
    #[error("Unable to decode image: {0}")]
    Decode(#[from] image::ImageError),

    #[error("Invalid hex color: {value:?}")]
    InvalidHex { value: String },
}

impl ExtractError {
    pub fn invalid_input(reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            reason: reason.into(),
        }
    }

    /// Only a cancelled run can simply be started again with the same input.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, ExtractError::Cancelled)
    }

    /// Text suitable for an alert in the upload page.
    pub fn user_message(&self) -> String {
        match self {
            ExtractError::InvalidInput { reason } => {
                format!("Unable to extract colors: {reason}. Please upload a different CAD image.")
            }
            ExtractError::Decode(_) => {
                "Unable to read image. Please choose a PNG, JPG or WEBP file.".to_string()
            }
            ExtractError::Cancelled => "Color extraction was cancelled.".to_string(),
            ExtractError::InvalidHex { value } => format!("{value} is not a #rrggbb color."),
        }
    }
}

impl From<ExtractError> for JsValue {
    fn from(err: ExtractError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}
