//! Response shape tests — the JSON field names and value types that
//! clients of `POST /extract` depend on.

use chrono::NaiveDate;
use incidex_core::{Error, IncidentInfo};

/// A fully resolved record serializes all four Portuguese keys as strings.
#[test]
fn test_record_shape() {
    let info = IncidentInfo {
        occurred_at: NaiveDate::from_ymd_opt(2025, 8, 13)
            .and_then(|d| d.and_hms_opt(14, 0, 0)),
        location: "São Paulo".into(),
        incident_type: "Falha no servidor".into(),
        impact: "Sistema indisponível".into(),
    };
    let json = serde_json::to_value(&info).unwrap();

    let obj = json.as_object().unwrap();
    assert_eq!(obj.len(), 4);
    assert_eq!(json["data_ocorrencia"], "2025-08-13 14:00");
    assert!(json["local"].is_string());
    assert!(json["tipo_incidente"].is_string());
    assert!(json["impacto"].is_string());
}

/// An unknown date is `null`, never an empty string; text fields stay strings.
#[test]
fn test_unresolved_record_shape() {
    let json = serde_json::to_value(IncidentInfo::default()).unwrap();

    assert!(json["data_ocorrencia"].is_null());
    assert_eq!(json["local"], "");
    assert_eq!(json["tipo_incidente"], "");
    assert_eq!(json["impacto"], "");
}

/// Error tags are part of the wire contract.
#[test]
fn test_error_type_tags() {
    assert_eq!(Error::InvalidInput("x".into()).kind(), "invalid_input");
    assert_eq!(Error::Backend("x".into()).kind(), "backend");
    assert_eq!(Error::malformed("x", "y").kind(), "malformed_response");
    assert_eq!(Error::Internal("x".into()).kind(), "internal");
}
