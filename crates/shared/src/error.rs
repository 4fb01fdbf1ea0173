use serde::{Deserialize, Serialize};

/// User-facing message when a calculation cannot be loaded.
pub const RESULTS_NOT_FOUND: &str = "Résultats non trouvés";
/// Fallback message when a load fails without a usable description.
pub const LOAD_FAILED: &str = "Erreur de chargement";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    NotFound,
    Validation,
    Upstream,
    Internal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    pub code: ErrorCode,
    pub message: String,
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn results_not_found() -> Self {
        Self::new(ErrorCode::NotFound, RESULTS_NOT_FOUND)
    }
}
