use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Envelope wrapped around every API response body.
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub code: u16,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            data: Some(data),
            code: 200,
            message: message.into(),
            timestamp: Utc::now(),
        }
    }

    pub fn created(data: T, message: impl Into<String>) -> Self {
        Self {
            code: 201,
            ..Self::success(data, message)
        }
    }

    pub fn error(code: u16, message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            code,
            message: message.into(),
            timestamp: Utc::now(),
        }
    }
}
