use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Raw, string-keyed shape of the catalog data file.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CatalogFile {
    #[serde(default)]
    pub schools: Vec<SchoolEntry>,
    #[serde(default)]
    pub axes: Vec<AxisEntry>,
    #[serde(default)]
    pub categories: Vec<CategoryEntry>,
    #[serde(default)]
    pub questions: Vec<QuestionEntry>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SchoolEntry {
    pub code: String,
    pub name: String,
    pub summary: Option<String>,
    #[serde(default)]
    pub affirmations: Vec<String>,
    pub patron: Option<Patron>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Patron {
    pub name: String,
    #[serde(default)]
    pub era: String,
    #[serde(default)]
    pub why: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AxisEntry {
    pub code: String,
    pub name: String,
    #[serde(default = "default_low")]
    pub low: String,
    #[serde(default = "default_high")]
    pub high: String,
    #[serde(default = "default_multiplier")]
    pub multiplier: i32,
}

fn default_low() -> String {
    "Low".to_string()
}

fn default_high() -> String {
    "High".to_string()
}

fn default_multiplier() -> i32 {
    3
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CategoryEntry {
    pub code: String,
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct QuestionEntry {
    pub category: String,
    pub text: String,
    #[serde(default)]
    pub axis_weights: BTreeMap<String, i32>,
    #[serde(default)]
    pub options: Vec<OptionEntry>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OptionEntry {
    pub text: String,
    #[serde(default)]
    pub weights: BTreeMap<String, i32>,
}
