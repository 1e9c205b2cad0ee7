//! Builds the final `IncidentInfo` from reconciled fields. Never fails.

use chrono::{NaiveDate, NaiveDateTime};
use incidex_core::{CanonicalField, IncidentInfo, OCCURRED_AT_FORMAT};
use serde_json::Value;
use tracing::warn;

use crate::reconcile::ReconciledFields;

const DATE_ONLY_FORMAT: &str = "%Y-%m-%d";

pub fn build(fields: &ReconciledFields) -> IncidentInfo {
    IncidentInfo {
        occurred_at: fields
            .get(CanonicalField::OccurredAt)
            .and_then(Value::as_str)
            .and_then(|raw| {
                let parsed = parse_datetime(raw);
                if parsed.is_none() && !raw.trim().is_empty() {
                    warn!("Could not parse date: {}", raw);
                }
                parsed
            }),
        location: text_field(fields, CanonicalField::Location),
        incident_type: text_field(fields, CanonicalField::IncidentType),
        impact: text_field(fields, CanonicalField::Impact),
    }
}

/// Parse `YYYY-MM-DD HH:MM`, falling back to `YYYY-MM-DD` at midnight.
pub fn parse_datetime(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    NaiveDateTime::parse_from_str(raw, OCCURRED_AT_FORMAT)
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(raw, DATE_ONLY_FORMAT)
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

fn text_field(fields: &ReconciledFields, field: CanonicalField) -> String {
    match fields.get(field) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fields(value: Value) -> ReconciledFields {
        let mut out = ReconciledFields::default();
        if let Value::Object(map) = value {
            for (key, v) in map {
                if let Some(field) = CanonicalField::from_key(&key) {
                    out.insert(field, v);
                }
            }
        }
        out
    }

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    }

    #[test]
    fn test_parse_datetime_formats() {
        assert_eq!(parse_datetime("2025-08-13 14:00"), Some(at(2025, 8, 13, 14, 0)));
        assert_eq!(parse_datetime("2025-08-13"), Some(at(2025, 8, 13, 0, 0)));
    }

    #[test]
    fn test_parse_invalid_datetime_returns_none() {
        for raw in ["invalid-date", "2025/08/13", "", "   "] {
            assert_eq!(parse_datetime(raw), None, "input: {raw:?}");
        }
    }

    #[test]
    fn test_build_incident_info() {
        let info = build(&fields(json!({
            "data_ocorrencia": "2025-08-13 14:00",
            "local": "São Paulo",
            "tipo_incidente": "Falha no servidor",
            "impacto": "Sistema indisponível",
        })));
        assert_eq!(info.occurred_at, Some(at(2025, 8, 13, 14, 0)));
        assert_eq!(info.location, "São Paulo");
        assert_eq!(info.incident_type, "Falha no servidor");
        assert_eq!(info.impact, "Sistema indisponível");
    }

    #[test]
    fn test_unparsable_date_keeps_other_fields() {
        let info = build(&fields(json!({
            "data_ocorrencia": "not-a-date",
            "local": "Recife",
            "tipo_incidente": "Queda de energia",
            "impacto": "Escritório parado",
        })));
        assert_eq!(info.occurred_at, None);
        assert_eq!(info.location, "Recife");
        assert_eq!(info.incident_type, "Queda de energia");
        assert_eq!(info.impact, "Escritório parado");
    }

    #[test]
    fn test_missing_fields_default() {
        let info = build(&ReconciledFields::default());
        assert_eq!(info.occurred_at, None);
        assert_eq!(info.location, "");
        assert_eq!(info.incident_type, "");
        assert_eq!(info.impact, "");
    }

    #[test]
    fn test_non_string_values_rendered_as_text() {
        let info = build(&fields(json!({"impacto": 5, "data_ocorrencia": 20250813})));
        assert_eq!(info.impact, "5");
        assert_eq!(info.occurred_at, None);
    }
}
