use crate::types::report::QuizResults;

const BAR_WIDTH: usize = 20;

pub fn to_markdown(results: &QuizResults) -> String {
    let mut output = String::new();
    output.push_str("# Quiz Results\n\n");
    output.push_str(&format!(
        "Answered: {} / {}\n\n",
        results.answered, results.total
    ));

    output.push_str("## Your Top Match\n\n");
    match &results.top_match {
        Some(top) => {
            output.push_str(&format!("**{}** (score {})\n\n", top.name, top.score));
            output.push_str(&format!("{}\n\n", top.summary));
            if !top.affirmations.is_empty() {
                output.push_str("Typical affirmations:\n\n");
                for affirmation in &top.affirmations {
                    output.push_str(&format!("- {affirmation}\n"));
                }
                output.push('\n');
            }
            let patron = &top.patron;
            if patron.era.is_empty() {
                output.push_str(&format!("Patron figure: {}\n", patron.name));
            } else {
                output.push_str(&format!("Patron figure: {} ({})\n", patron.name, patron.era));
            }
            if !patron.why.is_empty() {
                output.push_str(&format!("{}\n", patron.why));
            }
            output.push('\n');
        }
        None => output.push_str("- none\n\n"),
    }

    output.push_str("## School Rankings\n\n");
    if results.ranking.is_empty() {
        output.push_str("- none\n\n");
    } else {
        output.push_str("| Rank | School | Score |\n|---:|---|---:|\n");
        for entry in &results.ranking {
            output.push_str(&format!(
                "| {} | {} | {} |\n",
                entry.rank, entry.name, entry.score
            ));
        }
        output.push('\n');
    }

    output.push_str("## Axes Profile\n\n");
    if results.axes.is_empty() {
        output.push_str("- none\n");
    } else {
        for axis in &results.axes {
            output.push_str(&format!(
                "- {}: {} `{}` {} ({:+})\n",
                axis.name,
                axis.low,
                bar(axis.normalized),
                axis.high,
                axis.raw
            ));
        }
    }

    output.push_str(&format!("\nCatalog version: {}\n", short_version(&results.catalog_version)));
    output
}

fn bar(normalized: i32) -> String {
    let filled = (normalized.clamp(0, 100) as usize * BAR_WIDTH + 50) / 100;
    format!("{}{}", "#".repeat(filled), "-".repeat(BAR_WIDTH - filled))
}

fn short_version(version: &str) -> &str {
    version.get(..12).unwrap_or(version)
}
