//! History frames as returned by the history relay.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// Label shown when there is no historical frame
pub const CURRENT_LABEL: &str = "Aktuální";

/// One timestamped historical snapshot
///
/// Frames arrive oldest first.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HistoryFrame {
    #[serde(rename = "dateTime")]
    pub date_time: String,
    #[serde(rename = "imageUrl", default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl HistoryFrame {
    pub fn new(date_time: impl Into<String>) -> Self {
        Self {
            date_time: date_time.into(),
            image_url: None,
        }
    }

    /// "dd.mm. HH:MM" in local time, or the raw string when it is not RFC 3339
    pub fn label(&self) -> String {
        if self.date_time.is_empty() {
            return CURRENT_LABEL.to_string();
        }
        match DateTime::parse_from_rfc3339(&self.date_time) {
            Ok(dt) => dt.with_timezone(&Local).format("%d.%m. %H:%M").to_string(),
            Err(_) => self.date_time.clone(),
        }
    }
}

/// Label for an optional frame
pub fn frame_label(frame: Option<&HistoryFrame>) -> String {
    frame
        .map(HistoryFrame::label)
        .unwrap_or_else(|| CURRENT_LABEL.to_string())
}

/// A history entry: a full object or a bare timestamp
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum HistoryItem {
    Frame(HistoryFrame),
    Timestamp(String),
}

impl From<HistoryItem> for HistoryFrame {
    fn from(item: HistoryItem) -> Self {
        match item {
            HistoryItem::Frame(frame) => frame,
            HistoryItem::Timestamp(date_time) => HistoryFrame::new(date_time),
        }
    }
}

#[derive(Debug, Deserialize)]
struct HistoryDocument {
    #[serde(default)]
    data: Option<serde_json::Value>,
}

/// Extract the frame list from a history document (`{ "data": [...] }`).
/// Anything else yields no frames.
pub fn parse_history(body: &[u8]) -> Result<Vec<HistoryFrame>, serde_json::Error> {
    let doc: HistoryDocument = serde_json::from_slice(body)?;

    match doc.data {
        Some(serde_json::Value::Array(items)) => Ok(items
            .into_iter()
            .filter_map(|item| serde_json::from_value::<HistoryItem>(item).ok())
            .map(HistoryFrame::from)
            .collect()),
        _ => Ok(Vec::new()),
    }
}
