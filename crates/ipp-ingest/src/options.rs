//! Field vocabulary of the source tables.

use serde::{Deserialize, Serialize};

/// Which record fields carry dates, notes and references, and which cell
/// values mean "unknown".
///
/// The defaults match the vocabulary of the published tables. A TOML config
/// file may override any of them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollectOptions {
    /// Preferred date field. Its value may also be a fiscal-year mapping.
    pub effective_date_field: String,
    /// Fallback date fields, tried in order when the preferred one is absent.
    pub date_fields: Vec<String>,
    /// Sub-field holding the year of a fiscal-year mapping.
    pub fiscal_year_field: String,
    pub note_fields: Vec<String>,
    pub reference_fields: Vec<String>,
    pub unknown_tokens: Vec<String>,
}

impl Default for CollectOptions {
    fn default() -> Self {
        Self {
            effective_date_field: "Date d'effet".to_string(),
            date_fields: to_strings(&[
                "Date",
                "Date d'effet",
                "Date de perception du salaire",
                "Date ISF",
            ]),
            fiscal_year_field: "Année Revenus".to_string(),
            note_fields: to_strings(&["Notes", "Notes bis"]),
            reference_fields: to_strings(&[
                "Parution au JO",
                "Références BOI",
                "Références législatives",
                "Références législatives - définition des ressources et plafonds",
                "Références législatives - revalorisation des plafonds",
                "Références législatives des règles de calcul et du paramètre Po",
                "Références législatives de tous les autres paramètres",
            ]),
            unknown_tokens: to_strings(&["-", "na", "nc"]),
        }
    }
}

impl CollectOptions {
    /// Fields that never hold parameter values.
    pub fn is_excluded_field(&self, name: &str) -> bool {
        name == self.effective_date_field
            || self.date_fields.iter().any(|field| field == name)
            || self.note_fields.iter().any(|field| field == name)
            || self.reference_fields.iter().any(|field| field == name)
    }

    pub fn is_unknown_token(&self, text: &str) -> bool {
        let trimmed = text.trim();
        self.unknown_tokens.iter().any(|token| token == trimmed)
    }
}

fn to_strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| (*value).to_string()).collect()
}
