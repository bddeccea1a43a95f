use crate::error::{QuizError, Result};
use crate::types::catalog::{CatalogFile, Patron};
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, warn};

pub const EMBEDDED_CATALOG: &str = include_str!("../data/catalog.toml");

const DEFAULT_AFFIRMATION: &str = "See detailed theological literature";
const FALLBACK_PATRON: &str = "Various Saints";
const FALLBACK_PATRON_WHY: &str = "See theological literature.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct SchoolId(usize);

impl SchoolId {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct AxisId(usize);

impl AxisId {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone)]
pub struct School {
    pub code: String,
    pub name: String,
    pub summary: String,
    pub affirmations: Vec<String>,
    pub patron: Patron,
}

#[derive(Debug, Clone)]
pub struct Axis {
    pub code: String,
    pub name: String,
    pub low: String,
    pub high: String,
    pub multiplier: i32,
}

#[derive(Debug, Clone)]
pub struct Category {
    pub code: String,
    pub name: String,
}

#[derive(Debug, Clone)]
pub struct QuizOption {
    pub text: String,
    pub weights: Vec<(SchoolId, i32)>,
}

/// A question owns its axis weights; school weights live on each option.
#[derive(Debug, Clone)]
pub struct Question {
    pub text: String,
    pub category: usize,
    pub options: Vec<QuizOption>,
    pub axis_weights: Vec<(AxisId, i32)>,
}

/// Immutable, resolved quiz data. Codes are interned into typed ids at load
/// time so score tables can be plain vectors.
#[derive(Debug, Clone)]
pub struct Catalog {
    pub schools: Vec<School>,
    pub axes: Vec<Axis>,
    pub categories: Vec<Category>,
    pub questions: Vec<Question>,
    pub version: String,
}

pub fn read_source(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) => {
            debug!(path = %path.display(), "reading catalog file");
            Ok(std::fs::read_to_string(path)?)
        }
        None => Ok(EMBEDDED_CATALOG.to_string()),
    }
}

pub fn parse_file(source: &str) -> Result<CatalogFile> {
    toml::from_str(source).map_err(|e| QuizError::CatalogParse(e.to_string()))
}

pub fn load(path: Option<&Path>) -> Result<Catalog> {
    Catalog::from_toml_str(&read_source(path)?)
}

pub fn sha256_hex(bytes: &[u8]) -> String {
    let digest = Sha256::digest(bytes);
    format!("{digest:x}")
}

impl Catalog {
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let file = parse_file(source)?;
        Self::resolve(&file, sha256_hex(source.as_bytes()))
    }

    pub fn resolve(file: &CatalogFile, version: String) -> Result<Self> {
        let school_index = index_codes("school", file.schools.iter().map(|s| s.code.as_str()))?;
        let axis_index = index_codes("axis", file.axes.iter().map(|a| a.code.as_str()))?;
        let category_index =
            index_codes("category", file.categories.iter().map(|c| c.code.as_str()))?;

        let schools = file
            .schools
            .iter()
            .map(|entry| School {
                code: entry.code.clone(),
                name: entry.name.clone(),
                summary: entry
                    .summary
                    .clone()
                    .unwrap_or_else(|| format!("The {} position.", entry.name)),
                affirmations: if entry.affirmations.is_empty() && entry.summary.is_none() {
                    vec![DEFAULT_AFFIRMATION.to_string()]
                } else {
                    entry.affirmations.clone()
                },
                patron: entry.patron.clone().unwrap_or_else(|| Patron {
                    name: FALLBACK_PATRON.to_string(),
                    era: String::new(),
                    why: FALLBACK_PATRON_WHY.to_string(),
                }),
            })
            .collect();

        let axes = file
            .axes
            .iter()
            .map(|entry| Axis {
                code: entry.code.clone(),
                name: entry.name.clone(),
                low: entry.low.clone(),
                high: entry.high.clone(),
                multiplier: entry.multiplier,
            })
            .collect();

        let categories = file
            .categories
            .iter()
            .map(|entry| Category {
                code: entry.code.clone(),
                name: entry.name.clone(),
            })
            .collect();

        let mut questions = Vec::with_capacity(file.questions.len());
        for (position, entry) in file.questions.iter().enumerate() {
            let category = *category_index.get(entry.category.as_str()).ok_or_else(|| {
                QuizError::CatalogParse(format!(
                    "question {} references unknown category '{}'",
                    position + 1,
                    entry.category
                ))
            })?;
            if entry.options.is_empty() {
                return Err(QuizError::CatalogParse(format!(
                    "question {} has no options",
                    position + 1
                )));
            }

            let axis_weights = entry
                .axis_weights
                .iter()
                .filter_map(|(code, delta)| match axis_index.get(code.as_str()) {
                    Some(&index) => Some((AxisId(index), *delta)),
                    None => {
                        warn!(question = position + 1, code = %code, "ignoring unknown axis code");
                        None
                    }
                })
                .collect();

            let options = entry
                .options
                .iter()
                .map(|option| QuizOption {
                    text: option.text.clone(),
                    weights: option
                        .weights
                        .iter()
                        .filter_map(|(code, delta)| match school_index.get(code.as_str()) {
                            Some(&index) => Some((SchoolId(index), *delta)),
                            None => {
                                warn!(
                                    question = position + 1,
                                    code = %code,
                                    "ignoring unknown school code"
                                );
                                None
                            }
                        })
                        .collect(),
                })
                .collect();

            questions.push(Question {
                text: entry.text.clone(),
                category,
                options,
                axis_weights,
            });
        }

        debug!(
            schools = file.schools.len(),
            axes = file.axes.len(),
            questions = questions.len(),
            "catalog resolved"
        );

        Ok(Self {
            schools,
            axes,
            categories,
            questions,
            version,
        })
    }

    #[cfg(test)]
    pub fn school_id(&self, code: &str) -> Option<SchoolId> {
        self.schools
            .iter()
            .position(|school| school.code == code)
            .map(SchoolId)
    }

    #[cfg(test)]
    pub fn axis_id(&self, code: &str) -> Option<AxisId> {
        self.axes.iter().position(|axis| axis.code == code).map(AxisId)
    }

    pub fn school(&self, id: SchoolId) -> &School {
        &self.schools[id.0]
    }

    pub fn axis(&self, id: AxisId) -> &Axis {
        &self.axes[id.0]
    }

    pub fn school_ids(&self) -> impl Iterator<Item = SchoolId> {
        (0..self.schools.len()).map(SchoolId)
    }

    pub fn axis_ids(&self) -> impl Iterator<Item = AxisId> {
        (0..self.axes.len()).map(AxisId)
    }

    pub fn question(&self, index: usize) -> Result<&Question> {
        self.questions
            .get(index)
            .ok_or_else(|| QuizError::out_of_range("question", index, self.questions.len()))
    }

    pub fn category_of(&self, question: &Question) -> &Category {
        &self.categories[question.category]
    }

    /// Question indices grouped by category, in category declaration order.
    pub fn partition(&self) -> Vec<Vec<usize>> {
        let mut groups = vec![Vec::new(); self.categories.len()];
        for (index, question) in self.questions.iter().enumerate() {
            groups[question.category].push(index);
        }
        groups
    }

    pub fn all_questions(&self) -> Vec<usize> {
        (0..self.questions.len()).collect()
    }
}

fn index_codes<'a>(
    kind: &str,
    codes: impl Iterator<Item = &'a str>,
) -> Result<HashMap<&'a str, usize>> {
    let mut index = HashMap::new();
    for (position, code) in codes.enumerate() {
        if index.insert(code, position).is_some() {
            return Err(QuizError::CatalogParse(format!(
                "duplicate {kind} code '{code}'"
            )));
        }
    }
    Ok(index)
}
