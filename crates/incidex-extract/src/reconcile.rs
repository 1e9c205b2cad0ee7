//! Field reconciliation — maps backend-supplied keys onto the canonical schema.
//!
//! Backend key names are not guaranteed: the model may translate, abbreviate or
//! misspell them. Each canonical field is resolved by the first strategy that
//! hits: exact key, curated synonym, fuzzy match.

use std::collections::{BTreeMap, HashSet};

use incidex_core::CanonicalField;
use serde_json::{Map, Value};
use similar::TextDiff;
use tracing::debug;

use crate::response::ParsedFields;

/// Minimum similarity ratio for a fuzzy key match.
pub const FUZZY_THRESHOLD: f32 = 0.6;

/// How a canonical field was resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Exact,
    Synonym,
    Fuzzy,
}

/// Known alternate spellings and translations, tried in listed order.
pub fn synonyms(field: CanonicalField) -> &'static [&'static str] {
    match field {
        CanonicalField::OccurredAt => &[
            "data_ocoorrencia",
            "data_ocorencia",
            "data_ocorrência",
            "data_incidente",
            "data",
            "date",
            "occurred_at",
        ],
        CanonicalField::Location => &["location", "lugar", "localizacao", "localização"],
        CanonicalField::IncidentType => &[
            "tipo_incidentde",
            "tipo_incidende",
            "tipo",
            "categoria",
            "type",
            "incident_type",
        ],
        CanonicalField::Impact => &["impact", "impactos", "consequencia", "consequência", "efeito"],
    }
}

/// Parsed fields restricted to the canonical schema.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReconciledFields {
    values: BTreeMap<CanonicalField, Value>,
}

impl ReconciledFields {
    pub fn get(&self, field: CanonicalField) -> Option<&Value> {
        self.values.get(&field)
    }

    pub fn insert(&mut self, field: CanonicalField, value: Value) {
        self.values.insert(field, value);
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Plain string-keyed view, canonical keys only.
    pub fn to_map(&self) -> Map<String, Value> {
        self.values
            .iter()
            .map(|(field, value)| (field.key().to_string(), value.clone()))
            .collect()
    }
}

/// Resolve every canonical field from `parsed`. Unresolved fields are omitted.
pub fn reconcile(parsed: &ParsedFields) -> ReconciledFields {
    let mut out = ReconciledFields::default();
    let mut claimed: HashSet<&str> = HashSet::new();
    let mut unresolved = Vec::new();

    // Exact and synonym tiers first so fuzzy matching never steals a key that
    // another field names explicitly.
    for field in CanonicalField::ALL {
        match resolve_named(field, parsed) {
            Some((key, resolution)) => {
                debug!(field = %field, key, ?resolution, "Resolved field");
                claimed.insert(key);
                out.insert(field, parsed[key].clone());
            }
            None => unresolved.push(field),
        }
    }

    for field in unresolved {
        let candidates = parsed
            .iter()
            .filter(|(key, value)| !value.is_null() && !claimed.contains(key.as_str()))
            .map(|(key, _)| key.as_str());
        if let Some(key) = best_fuzzy_match(field.key(), candidates) {
            debug!(field = %field, key, resolution = ?Resolution::Fuzzy, "Resolved field");
            claimed.insert(key);
            out.insert(field, parsed[key].clone());
        }
    }

    out
}

fn resolve_named(field: CanonicalField, parsed: &ParsedFields) -> Option<(&str, Resolution)> {
    let present = |key: &str| parsed.get(key).is_some_and(|v| !v.is_null());

    if present(field.key()) {
        return Some((field.key(), Resolution::Exact));
    }
    synonyms(field)
        .iter()
        .copied()
        .find(|syn| present(*syn))
        .map(|syn| (syn, Resolution::Synonym))
}

/// Case-insensitive similarity ratio in `[0, 1]`.
pub fn similarity(a: &str, b: &str) -> f32 {
    let a = a.to_lowercase();
    let b = b.to_lowercase();
    TextDiff::from_chars(a.as_str(), b.as_str()).ratio()
}

/// Highest-scoring candidate at or above [`FUZZY_THRESHOLD`]; `None` on ties.
pub fn best_fuzzy_match<'a>(
    target: &str,
    candidates: impl IntoIterator<Item = &'a str>,
) -> Option<&'a str> {
    let mut best: Option<(&str, f32)> = None;
    let mut tied = false;

    for candidate in candidates {
        let score = similarity(target, candidate);
        if score < FUZZY_THRESHOLD {
            continue;
        }
        match best {
            Some((_, top)) if score < top => {}
            Some((_, top)) if score == top => tied = true,
            _ => {
                best = Some((candidate, score));
                tied = false;
            }
        }
    }

    if tied {
        None
    } else {
        best.map(|(key, _)| key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parsed(value: Value) -> ParsedFields {
        match value {
            Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_synonyms_resolve() {
        let input = parsed(json!({
            "data_ocoorrencia": "2025-08-13 14:00",
            "location": "São Paulo",
            "tipo": "Falha no servidor",
            "impact": "Sistema indisponível",
        }));
        let result = reconcile(&input).to_map();
        assert_eq!(
            Value::Object(result),
            json!({
                "data_ocorrencia": "2025-08-13 14:00",
                "local": "São Paulo",
                "tipo_incidente": "Falha no servidor",
                "impacto": "Sistema indisponível",
            })
        );
    }

    #[test]
    fn test_exact_beats_synonym() {
        let input = parsed(json!({"location": "Recife", "local": "São Paulo"}));
        let result = reconcile(&input);
        assert_eq!(result.get(CanonicalField::Location), Some(&json!("São Paulo")));
    }

    #[test]
    fn test_synonym_beats_fuzzy() {
        let input = parsed(json!({"locall": "Recife", "lugar": "Olinda"}));
        let result = reconcile(&input);
        assert_eq!(result.get(CanonicalField::Location), Some(&json!("Olinda")));
    }

    #[test]
    fn test_fuzzy_match() {
        let input = parsed(json!({"tipo_de_incidente": "Queda de energia"}));
        let result = reconcile(&input);
        assert_eq!(
            result.get(CanonicalField::IncidentType),
            Some(&json!("Queda de energia"))
        );
        assert_eq!(result.len(), 1);
    }

    #[test]
    fn test_fuzzy_tie_is_unresolved() {
        let input = parsed(json!({"locall": "Recife", "locaal": "Olinda"}));
        let result = reconcile(&input);
        assert_eq!(result.get(CanonicalField::Location), None);
    }

    #[test]
    fn test_unrelated_key_dropped() {
        let input = parsed(json!({"notes": "call the vendor", "impacto": "nenhum"}));
        let result = reconcile(&input);
        assert_eq!(Value::Object(result.to_map()), json!({"impacto": "nenhum"}));
    }

    #[test]
    fn test_null_counts_as_unresolved() {
        let input = parsed(json!({"local": null, "location": "Recife", "data_ocorrencia": null}));
        let result = reconcile(&input);
        assert_eq!(result.get(CanonicalField::Location), Some(&json!("Recife")));
        assert_eq!(result.get(CanonicalField::OccurredAt), None);
    }

    #[test]
    fn test_fuzzy_does_not_reuse_claimed_key() {
        // "impacto" is claimed exactly; it must not also fuzzy-fill another field.
        let input = parsed(json!({"impacto": "lento"}));
        let result = reconcile(&input);
        assert_eq!(result.len(), 1);
    }

    #[test]
    fn test_similarity_is_case_insensitive() {
        assert_eq!(similarity("LOCAL", "local"), 1.0);
        assert!(similarity("local", "notes") < FUZZY_THRESHOLD);
    }

    #[test]
    fn test_best_fuzzy_match_threshold() {
        assert_eq!(best_fuzzy_match("impacto", ["xyz"]), None);
        assert_eq!(best_fuzzy_match("impacto", ["impactto", "xyz"]), Some("impactto"));
    }
}
