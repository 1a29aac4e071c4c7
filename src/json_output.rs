//! JSON output for scripting
//!
//! When `--json` is enabled, the converter emits one JSON object per line to stdout and
//! suppresses all styled output.

use serde::{Deserialize, Serialize};

use crate::image_processing::ConversionReport;

#[derive(Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum JsonMessage {
    /// Run configuration
    Start {
        target: String,
        quality: u8,
        max_width: Option<u32>,
        delete_original: bool,
    },
    /// One file converted
    Converted {
        source: String,
        destination: String,
        source_bytes: u64,
        destination_bytes: u64,
        saved_percent: f64,
        width: u32,
        height: u32,
        deleted_original: bool,
    },
    /// Run finished
    Summary { converted: usize, duration_secs: f64 },
    /// Run aborted
    Error { message: String },
}

impl JsonMessage {
    /// Emit JSON message to stdout
    pub fn emit(&self) {
        if let Ok(json) = serde_json::to_string(self) {
            println!("{}", json);
        }
    }

    pub fn converted(report: &ConversionReport) -> Self {
        Self::Converted {
            source: report.source.display().to_string(),
            destination: report.destination.display().to_string(),
            source_bytes: report.source_bytes,
            destination_bytes: report.destination_bytes,
            saved_percent: (report.saved_percent() * 10.0).round() / 10.0,
            width: report.width,
            height: report.height,
            deleted_original: report.deleted_original,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_converted_message_shape() {
        let report = ConversionReport {
            source: PathBuf::from("photo.jpg"),
            destination: PathBuf::from("photo.webp"),
            source_bytes: 4000,
            destination_bytes: 1000,
            width: 1200,
            height: 600,
            has_alpha: false,
            deleted_original: true,
        };

        let value = serde_json::to_value(JsonMessage::converted(&report)).unwrap();
        assert_eq!(value["type"], "converted");
        assert_eq!(value["destination"], "photo.webp");
        assert_eq!(value["saved_percent"], 75.0);
        assert_eq!(value["deleted_original"], true);
    }

    #[test]
    fn test_summary_tag() {
        let json = serde_json::to_string(&JsonMessage::Summary {
            converted: 3,
            duration_secs: 1.5,
        })
        .unwrap();
        assert_eq!(json, r#"{"type":"summary","converted":3,"duration_secs":1.5}"#);
    }

    #[test]
    fn test_error_round_trips() {
        let message = JsonMessage::Error {
            message: "Path not found: nope".to_string(),
        };
        let json = serde_json::to_string(&message).unwrap();
        let parsed: JsonMessage = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, message);
    }
}
