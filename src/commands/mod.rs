//! Commands Layer
//!
//! Handlers the admin console calls when a drag ends or a widget/menu entry
//! is added, removed or re-parented. Each handler updates the in-memory state
//! optimistically, persists the batch one record at a time, then reloads
//! authoritative state from storage.

mod layout_cmd;
mod menu_cmd;


use serde::Serialize;

use crate::repository::BatchReport;

pub use layout_cmd::LayoutEditor;
pub use menu_cmd::MenuEditor;

const SAVE_FAILED: &str = "Failed to save changes";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Success,
    Error,
}

/// Toast shown to the user after a save
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
    /// Records that could not be saved
    pub failed_ids: Vec<String>,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
            failed_ids: Vec::new(),
        }
    }

    pub fn failure(failed_ids: Vec<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: SAVE_FAILED.to_string(),
            failed_ids,
        }
    }

    pub fn from_report(report: &BatchReport, success: &str) -> Self {
        if report.is_success() {
            Self::success(success)
        } else {
            log::error!(
                "{} of {} updates failed: {:?}",
                report.failed.len(),
                report.failed.len() + report.applied.len(),
                report.failed_ids()
            );
            Self::failure(report.failed_ids())
        }
    }

    pub fn is_success(&self) -> bool {
        self.level == NoticeLevel::Success
    }
}

/// Result of a finished drag
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DragOutcome {
    /// Nothing to save: self-drop, unknown item or disallowed move
    Unchanged,
    /// Another batch is still being saved; the drag was ignored
    Busy,
    /// Batch saved (or failed) and state reloaded
    Persisted(Notice),
}
