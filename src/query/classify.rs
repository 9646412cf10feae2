use super::types::Intent;

/// One entry of the intent table: a domain and the words that select it.
#[derive(Debug, Clone, Copy)]
pub struct IntentRule {
    pub intent: Intent,
    pub keywords: &'static [&'static str],
}

impl IntentRule {
    /// `text` must already be lower-cased.
    pub fn matches(&self, text: &str) -> bool {
        self.keywords.iter().any(|k| text.contains(k))
    }
}

/// Evaluated top to bottom, first match wins. Specific domains sit above
/// Summary so "medication status" is answered as a medication question.
pub const INTENT_RULES: &[IntentRule] = &[
    IntentRule {
        intent: Intent::Medication,
        keywords: &["medication", "medicine", "drug", "prescription", "taking"],
    },
    IntentRule {
        intent: Intent::Lab,
        keywords: &[
            "lab",
            "result",
            "test",
            "blood",
            "glucose",
            "a1c",
            "bp",
            "pressure",
            "cholesterol",
            "hemoglobin",
            "bun",
            "ldl",
            "hdl",
            "triglycerides",
            "creatinine",
            "lipid",
        ],
    },
    IntentRule {
        intent: Intent::Appointment,
        keywords: &["appointment", "visit", "scheduled", "checkup"],
    },
    IntentRule {
        intent: Intent::Summary,
        keywords: &["summary", "overview", "report", "status"],
    },
];

/// Classify a clinician query into a single intent using keyword heuristics.
pub fn classify_intent(text: &str) -> Intent {
    let lower = text.to_lowercase();

    let intent = INTENT_RULES
        .iter()
        .find(|rule| rule.matches(&lower))
        .map(|rule| rule.intent)
        .unwrap_or(Intent::Fallback);

    tracing::debug!(?intent, "Classified query");
    intent
}

/// Static help text for queries that match no intent.
pub fn fallback_help(first_name: &str) -> String {
    format!(
        "I can help you analyze {first_name}'s data. Try asking for a 'summary', \
         'medications', 'lab results', or 'appointments'."
    )
}
