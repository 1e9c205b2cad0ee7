//! Extraction prompt template.

/// Substitution point for the normalized incident text.
pub const PLACEHOLDER: &str = "{incident_text}";

/// Template v1. Field names and the date format are part of the contract with
/// the reconciler; edit them here, never at runtime.
const DEFAULT_TEMPLATE: &str = r#"You are an incident analysis specialist. Extract the following information from the provided text and return ONLY a valid JSON with the requested fields:
- data_ocorrencia: date and time of the incident in the format "YYYY-MM-DD HH:MM" (null if not mentioned)
- local: location where the incident occurred
- tipo_incidente: category or type of the incident
- impacto: brief description of the impact caused

Example of an incident:
  2025-08-14 14:00, at the São Paulo office, there was a failure in the main server that affected the billing system for 2 hours.

Example of JSON response:
{
  "data_ocorrencia": "2025-08-14 14:00",
  "local": "São Paulo",
  "tipo_incidente": "Server failure",
  "impacto": "Billing system unavailable for 2 hours"
}

Incident text: {incident_text}
JSON response:"#;

/// Immutable prompt template with a single `{incident_text}` slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtractionPrompt {
    template: &'static str,
}

impl Default for ExtractionPrompt {
    fn default() -> Self {
        Self {
            template: DEFAULT_TEMPLATE,
        }
    }
}

impl ExtractionPrompt {
    pub fn template(&self) -> &'static str {
        self.template
    }

    /// Substitute the normalized incident text into the template.
    pub fn render(&self, incident_text: &str) -> String {
        self.template.replacen(PLACEHOLDER, incident_text, 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_placeholder() {
        assert_eq!(DEFAULT_TEMPLATE.matches(PLACEHOLDER).count(), 1);
    }

    #[test]
    fn test_render_substitutes_text() {
        let prompt = ExtractionPrompt::default().render("2025-08-13 14:00, falha no servidor.");
        assert!(prompt.contains("Incident text: 2025-08-13 14:00, falha no servidor."));
        assert!(!prompt.contains(PLACEHOLDER));
        assert!(prompt.trim_end().ends_with("JSON response:"));
    }

    #[test]
    fn test_template_names_every_canonical_field() {
        for key in ["data_ocorrencia", "local", "tipo_incidente", "impacto"] {
            assert!(DEFAULT_TEMPLATE.contains(key), "missing {key}");
        }
        assert!(DEFAULT_TEMPLATE.contains("YYYY-MM-DD HH:MM"));
    }

    #[test]
    fn test_braces_in_text_are_kept_verbatim() {
        let prompt = ExtractionPrompt::default().render("log line {incident_text} {x}");
        assert!(prompt.contains("Incident text: log line {incident_text} {x}"));
    }
}
