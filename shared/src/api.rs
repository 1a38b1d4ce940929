use serde::{Deserialize, Serialize};

use crate::models::CalendarEvent;

// ============================================================================
// Trigger API Types
// ============================================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct ProcessEmailsResponse {
    pub message: String,
}

impl ProcessEmailsResponse {
    pub fn success() -> Self {
        Self {
            message: "Emails processed and notifications generated successfully.".to_string(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ProcessCalendarResponse {
    pub message: String,
    pub events: Vec<CalendarEvent>,
}

impl ProcessCalendarResponse {
    pub fn success(events: Vec<CalendarEvent>) -> Self {
        Self {
            message: "Calendar events retrieved and saved successfully.".to_string(),
            events,
        }
    }
}

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
