use crate::types::catalog::CatalogFile;
use crate::types::report::Finding;
use std::collections::{BTreeSet, HashSet};

/// Offline checks over the raw data file. Blocking findings are the ones
/// that stop the catalog from loading at all.
pub fn lint_findings(file: &CatalogFile) -> Vec<Finding> {
    let mut findings = Vec::new();

    let schools = declared("school", file.schools.iter().map(|s| s.code.as_str()), &mut findings);
    let axes = declared("axis", file.axes.iter().map(|a| a.code.as_str()), &mut findings);
    let categories = declared(
        "category",
        file.categories.iter().map(|c| c.code.as_str()),
        &mut findings,
    );

    let mut rewarded = HashSet::new();
    for (position, question) in file.questions.iter().enumerate() {
        let number = position + 1;

        if !categories.contains(question.category.as_str()) {
            findings.push(Finding {
                id: "catalog.unknown_category".to_string(),
                title: "Question references undeclared category".to_string(),
                body: format!(
                    "Question {number} names category '{}' which is not declared.",
                    question.category
                ),
                blocking: true,
                question: Some(number),
            });
        }

        if question.options.is_empty() {
            findings.push(Finding {
                id: "catalog.empty_options".to_string(),
                title: "Question has no options".to_string(),
                body: format!("Question {number} cannot be answered: its option list is empty."),
                blocking: true,
                question: Some(number),
            });
        }

        for code in question.axis_weights.keys() {
            if !axes.contains(code.as_str()) {
                findings.push(Finding {
                    id: "catalog.unknown_axis".to_string(),
                    title: "Axis weight references undeclared axis".to_string(),
                    body: format!(
                        "Question {number} weights axis '{code}' which is not declared; it is ignored when scoring."
                    ),
                    blocking: false,
                    question: Some(number),
                });
            }
        }

        for (option_number, option) in question.options.iter().enumerate() {
            for (code, delta) in &option.weights {
                if !schools.contains(code.as_str()) {
                    findings.push(Finding {
                        id: "catalog.unknown_school".to_string(),
                        title: "Option weight references undeclared school".to_string(),
                        body: format!(
                            "Question {number} option {} weights school '{code}' which is not declared; it is ignored when scoring.",
                            option_number + 1
                        ),
                        blocking: false,
                        question: Some(number),
                    });
                } else if *delta > 0 {
                    rewarded.insert(code.as_str());
                }
            }
        }
    }

    for school in &file.schools {
        if !rewarded.contains(school.code.as_str()) {
            findings.push(Finding {
                id: "catalog.unreachable_school".to_string(),
                title: "School can never score".to_string(),
                body: format!(
                    "No option awards positive points to '{}' ({}).",
                    school.code, school.name
                ),
                blocking: false,
                question: None,
            });
        }
    }

    for axis in &file.axes {
        if axis.multiplier <= 0 {
            findings.push(Finding {
                id: "catalog.nonpositive_multiplier".to_string(),
                title: "Axis multiplier is not positive".to_string(),
                body: format!(
                    "Axis '{}' has multiplier {}; its display bar cannot move away from the midpoint correctly.",
                    axis.code, axis.multiplier
                ),
                blocking: false,
                question: None,
            });
        }
    }

    findings
}

fn declared<'a>(
    kind: &str,
    codes: impl Iterator<Item = &'a str>,
    findings: &mut Vec<Finding>,
) -> BTreeSet<&'a str> {
    let mut seen = BTreeSet::new();
    for code in codes {
        if !seen.insert(code) {
            findings.push(Finding {
                id: format!("catalog.duplicate_{kind}"),
                title: format!("Duplicate {kind} code"),
                body: format!("The {kind} code '{code}' is declared more than once."),
                blocking: true,
                question: None,
            });
        }
    }
    seen
}
