//! Incident domain types: validated input text, canonical fields, final record.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize, Serializer};

use crate::error::{Error, Result};

/// Wire format of `data_ocorrencia`.
pub const OCCURRED_AT_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Raw incident description. Never blank after trimming.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncidentText {
    content: String,
}

impl IncidentText {
    pub fn new(content: impl Into<String>) -> Result<Self> {
        let content = content.into();
        if content.trim().is_empty() {
            return Err(Error::InvalidInput("Incident text cannot be empty".into()));
        }
        Ok(Self { content })
    }

    pub fn as_str(&self) -> &str {
        &self.content
    }
}

/// The four output keys the backend is asked to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CanonicalField {
    #[serde(rename = "data_ocorrencia")]
    OccurredAt,
    #[serde(rename = "local")]
    Location,
    #[serde(rename = "tipo_incidente")]
    IncidentType,
    #[serde(rename = "impacto")]
    Impact,
}

impl CanonicalField {
    pub const ALL: [CanonicalField; 4] = [
        CanonicalField::OccurredAt,
        CanonicalField::Location,
        CanonicalField::IncidentType,
        CanonicalField::Impact,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            Self::OccurredAt => "data_ocorrencia",
            Self::Location => "local",
            Self::IncidentType => "tipo_incidente",
            Self::Impact => "impacto",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.key() == key)
    }
}

impl std::fmt::Display for CanonicalField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

/// Structured incident record produced by one successful extraction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IncidentInfo {
    #[serde(rename = "data_ocorrencia", serialize_with = "serialize_occurred_at")]
    pub occurred_at: Option<NaiveDateTime>,
    #[serde(rename = "local")]
    pub location: String,
    #[serde(rename = "tipo_incidente")]
    pub incident_type: String,
    #[serde(rename = "impacto")]
    pub impact: String,
}

impl IncidentInfo {
    /// `occurred_at` rendered in the wire format, if present.
    pub fn occurred_at_display(&self) -> Option<String> {
        self.occurred_at
            .map(|dt| dt.format(OCCURRED_AT_FORMAT).to_string())
    }
}

fn serialize_occurred_at<S: Serializer>(
    value: &Option<NaiveDateTime>,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    match value {
        Some(dt) => serializer.collect_str(&dt.format(OCCURRED_AT_FORMAT)),
        None => serializer.serialize_none(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn sample(occurred_at: Option<NaiveDateTime>) -> IncidentInfo {
        IncidentInfo {
            occurred_at,
            location: "São Paulo".into(),
            incident_type: "Falha no servidor".into(),
            impact: "Sistema indisponível por 2 horas".into(),
        }
    }

    #[test]
    fn test_incident_text_rejects_blank() {
        assert!(matches!(IncidentText::new(""), Err(Error::InvalidInput(_))));
        assert!(matches!(IncidentText::new("   \n\t"), Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_incident_text_keeps_content() {
        let text = IncidentText::new("Falha no servidor principal").unwrap();
        assert_eq!(text.as_str(), "Falha no servidor principal");
    }

    #[test]
    fn test_serialize_with_datetime() {
        let dt = NaiveDate::from_ymd_opt(2025, 8, 14)
            .unwrap()
            .and_hms_opt(14, 0, 0)
            .unwrap();
        let json = serde_json::to_value(sample(Some(dt))).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "data_ocorrencia": "2025-08-14 14:00",
                "local": "São Paulo",
                "tipo_incidente": "Falha no servidor",
                "impacto": "Sistema indisponível por 2 horas",
            })
        );
    }

    #[test]
    fn test_serialize_without_datetime() {
        let json = serde_json::to_value(sample(None)).unwrap();
        assert!(json["data_ocorrencia"].is_null());
    }

    #[test]
    fn test_canonical_keys_round_trip() {
        for field in CanonicalField::ALL {
            assert_eq!(CanonicalField::from_key(field.key()), Some(field));
        }
        assert_eq!(CanonicalField::from_key("location"), None);
    }
}
