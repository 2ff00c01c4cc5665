//! Core data types shared by the services.
//!
//! These types describe which profession a request is about, what the OCR
//! pipeline extracts from a license image, and the event it publishes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Message type stamped on every OCR event.
pub const OCR_MESSAGE_TYPE_IDENTIFY: &str = "identify_ocr";

/// Profession category that selects prompts and the relevant OCR fields.
///
/// This is a closed set; every `match` over it is exhaustive so a new
/// category cannot silently fall through to an empty prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlatformType {
    /// Physicians
    #[serde(rename = "apen")]
    Doctor,
    /// Nurses
    #[serde(rename = "nurse")]
    Nurse,
    /// Pharmacists
    #[serde(rename = "phar")]
    Pharmacist,
}

impl PlatformType {
    /// All categories, in declaration order.
    pub const ALL: [PlatformType; 3] = [
        PlatformType::Doctor,
        PlatformType::Nurse,
        PlatformType::Pharmacist,
    ];

    /// Wire name used in events and on the command line.
    pub fn as_str(&self) -> &'static str {
        match self {
            PlatformType::Doctor => "apen",
            PlatformType::Nurse => "nurse",
            PlatformType::Pharmacist => "phar",
        }
    }
}

impl fmt::Display for PlatformType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PlatformType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "apen" => Ok(PlatformType::Doctor),
            "nurse" => Ok(PlatformType::Nurse),
            "phar" => Ok(PlatformType::Pharmacist),
            other => Err(format!(
                "unknown platform \"{other}\" (expected apen, nurse or phar)"
            )),
        }
    }
}

/// Identity fields read from a professional license image.
///
/// Which fields are populated depends on the platform prompt. Keys the
/// model adds beyond these are ignored here but survive in [`OcrEvent`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrRawInfo {
    /// Source image URI, always set by the OCR service
    #[serde(skip_serializing_if = "Option::is_none")]
    pub identify_url: Option<String>,

    /// Holder's full name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Date of birth
    #[serde(skip_serializing_if = "Option::is_none")]
    pub birthday: Option<String>,

    /// Job title (e.g., attending physician)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,

    /// Medical department or specialty
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,

    /// Hospital, clinic or pharmacy
    #[serde(skip_serializing_if = "Option::is_none")]
    pub facility: Option<String>,

    /// License expiry date
    #[serde(skip_serializing_if = "Option::is_none")]
    pub valid_date: Option<String>,

    /// Specialist certificate expiry date
    #[serde(skip_serializing_if = "Option::is_none")]
    pub specialty_valid_date: Option<String>,
}

/// Event published after a successful raw-info scan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OcrEvent {
    /// User the license belongs to
    pub user_id: String,

    /// Patched model output, including any keys outside [`OcrRawInfo`]
    pub payload: serde_json::Value,

    /// When the event was built
    pub created_at: DateTime<Utc>,

    /// Always [`OCR_MESSAGE_TYPE_IDENTIFY`]
    #[serde(rename = "type")]
    pub message_type: String,

    /// Platform wire name
    pub source: String,
}

impl OcrEvent {
    /// Build an identify event stamped with the current time.
    pub fn identify(user_id: &str, payload: serde_json::Value, platform: PlatformType) -> Self {
        Self {
            user_id: user_id.to_string(),
            payload,
            created_at: Utc::now(),
            message_type: OCR_MESSAGE_TYPE_IDENTIFY.to_string(),
            source: platform.as_str().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_platform_round_trips_wire_names() {
        for platform in PlatformType::ALL {
            assert_eq!(platform.as_str().parse::<PlatformType>(), Ok(platform));
            let json = serde_json::to_string(&platform).unwrap();
            assert_eq!(json, format!("\"{}\"", platform.as_str()));
        }
    }

    #[test]
    fn test_unknown_platform_is_rejected() {
        let err = "dentist".parse::<PlatformType>().unwrap_err();
        assert!(err.contains("dentist"));
        assert!(serde_json::from_str::<PlatformType>("\"dentist\"").is_err());
    }

    #[test]
    fn test_from_str_and_serde_accept_the_same_names() {
        for name in ["apen", "nurse", "phar", "doctor", "pharmacist", "Nurse"] {
            let parsed = name.parse::<PlatformType>().ok();
            let deserialized = serde_json::from_str::<PlatformType>(&format!("\"{name}\"")).ok();
            assert_eq!(parsed, deserialized, "name: {name}");
        }
    }

    #[test]
    fn test_raw_info_tolerates_unknown_and_missing_keys() {
        let info: OcrRawInfo =
            serde_json::from_str(r#"{"name":"A","position":"VS","license_no":"123"}"#).unwrap();
        assert_eq!(info.name.as_deref(), Some("A"));
        assert_eq!(info.position.as_deref(), Some("VS"));
        assert!(info.birthday.is_none());
    }

    #[test]
    fn test_raw_info_skips_absent_fields() {
        let info = OcrRawInfo {
            name: Some("A".to_string()),
            ..OcrRawInfo::default()
        };
        assert_eq!(serde_json::to_string(&info).unwrap(), r#"{"name":"A"}"#);
    }

    #[test]
    fn test_identify_event_shape() {
        let event = OcrEvent::identify(
            "u1",
            serde_json::json!({ "name": "A" }),
            PlatformType::Nurse,
        );
        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["type"], OCR_MESSAGE_TYPE_IDENTIFY);
        assert_eq!(value["source"], "nurse");
        assert_eq!(value["user_id"], "u1");
        assert!(event.created_at.timestamp() > 0);
    }
}
