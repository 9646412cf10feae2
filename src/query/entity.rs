//! Test-name resolution: maps aliases and panel words in a query onto the
//! canonical test names present in a patient's lab history.

use std::collections::BTreeSet;

/// Which lab tests a query asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TestSelection {
    /// No specific test named; use the general listing.
    All,
    /// Canonical test names to include. Never empty.
    Only(BTreeSet<String>),
}

impl TestSelection {
    pub fn includes(&self, test_name: &str) -> bool {
        match self {
            Self::All => true,
            Self::Only(names) => names.contains(test_name),
        }
    }

    pub fn is_specific(&self) -> bool {
        matches!(self, Self::Only(_))
    }
}

const BP_TRIGGERS: &[&str] = &["bp", "blood pressure", "pressure"];
const LIPID_COMPONENTS: &[&str] = &["Cholesterol", "LDL", "HDL", "Triglycerides"];
const CHOLESTEROL_COMPONENTS: &[&str] = &["Cholesterol", "LDL", "HDL"];
const COMPONENTS: &[&str] = &["LDL", "HDL", "A1c", "Glucose", "Hemoglobin", "BUN", "Creatinine"];

/// Resolve the tests a query refers to against the names actually stored.
///
/// Triggers match the lower-cased query by substring; expansion matches
/// stored names case-sensitively. The result is the union of every rule.
pub fn resolve_tests(query: &str, known: &BTreeSet<String>) -> TestSelection {
    let text = query.to_lowercase();
    let mut selected = BTreeSet::new();

    let mut take_containing = |needles: &[&str], exclude: &[&str]| {
        for name in known {
            let hit = needles.iter().any(|n| name.contains(n));
            let excluded = exclude.iter().any(|n| name.contains(n));
            if hit && !excluded {
                selected.insert(name.clone());
            }
        }
    };

    if BP_TRIGGERS.iter().any(|t| text.contains(t)) {
        take_containing(&["BP"], &[]);
    }

    if text.contains("lipid") {
        take_containing(LIPID_COMPONENTS, &[]);
    } else if text.contains("cholesterol") {
        take_containing(CHOLESTEROL_COMPONENTS, &["Triglycerides"]);
    }

    if text.contains("triglyceride") {
        take_containing(&["Triglycerides"], &[]);
    }

    for component in COMPONENTS {
        if text.contains(&component.to_lowercase()) {
            take_containing(&[component], &[]);
        }
    }

    for name in known {
        let needle = name.trim().to_lowercase();
        if !needle.is_empty() && text.contains(&needle) {
            selected.insert(name.clone());
        }
    }

    tracing::debug!(tests = ?selected, "Resolved lab test selection");

    if selected.is_empty() {
        TestSelection::All
    } else {
        TestSelection::Only(selected)
    }
}
