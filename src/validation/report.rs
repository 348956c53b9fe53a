// Tue Jan 20 2026 - Alex

use crate::ir::Definition;
use crate::validation::error::LayoutError;
use crate::validation::layout::LayoutValidator;
use indexmap::IndexMap;

/// Every layout issue of a definition set, grouped for display.
#[derive(Debug, Clone)]
pub struct LayoutReport {
    pub issues: Vec<LayoutError>,
    pub definitions_checked: usize,
    pub fields_checked: usize,
}

impl LayoutReport {
    pub fn generate(validator: &LayoutValidator, definitions: &[Definition]) -> Self {
        Self {
            issues: validator.check_all(definitions),
            definitions_checked: definitions.len(),
            fields_checked: definitions.iter().map(|d| d.fields().len()).sum(),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn by_category(&self) -> IndexMap<&'static str, Vec<&LayoutError>> {
        let mut grouped: IndexMap<&'static str, Vec<&LayoutError>> = IndexMap::new();
        for issue in &self.issues {
            grouped.entry(issue.category()).or_default().push(issue);
        }
        grouped
    }

    pub fn format_report(&self) -> String {
        let mut output = String::new();

        output.push_str("=== Layout Report ===\n");
        output.push_str(&format!("Definitions: {}\n", self.definitions_checked));
        output.push_str(&format!("Fields: {}\n", self.fields_checked));
        output.push_str(&format!("Issues: {}\n", self.issues.len()));

        for (category, issues) in self.by_category() {
            output.push_str(&format!("\n  [{}]\n", category.to_uppercase()));
            for issue in issues {
                output.push_str(&format!("    - {}\n", issue));
            }
        }

        output
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| "{}".to_string())
    }
}

impl serde::Serialize for LayoutReport {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeStruct;
        let messages: Vec<String> = self.issues.iter().map(|i| i.to_string()).collect();
        let mut state = serializer.serialize_struct("LayoutReport", 4)?;
        state.serialize_field("definitions_checked", &self.definitions_checked)?;
        state.serialize_field("fields_checked", &self.fields_checked)?;
        state.serialize_field("issue_count", &self.issues.len())?;
        state.serialize_field("issues", &messages)?;
        state.end()
    }
}
