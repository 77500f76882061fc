//! Output formatting for stem reports and dictionary summaries (JSON, text).

use crate::models::{DictionarySummary, StemReport};
use serde::Serialize;
use std::io::{self, Write};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Write any report as pretty-printed JSON.
pub fn write_json<T: Serialize, W: Write>(value: &T, writer: &mut W) -> Result<(), OutputError> {
    let json = serde_json::to_string_pretty(value)?;
    writer.write_all(json.as_bytes())?;
    writeln!(writer)?;
    Ok(())
}

/// Format a stem report as human-readable text.
pub fn format_report(report: &StemReport) -> String {
    let mut out = format!("{}\n", report.stem);

    if report.inflections.is_empty() {
        out.push_str("  Inflections: -\n");
    } else {
        out.push_str(&format!("  Inflections: {}\n", report.inflections.join(", ")));
    }

    if report.senses.is_empty() {
        out.push_str("  Senses: -\n");
    }
    for (position, sense) in report.senses.iter().enumerate() {
        let synonyms = if sense.synonyms.is_empty() {
            "-".to_string()
        } else {
            sense.synonyms.join(", ")
        };
        out.push_str(&format!(
            "  Sense {} (group {}): {}\n",
            position, sense.group, synonyms
        ));
    }

    out
}

/// Write a stem report to stdout.
pub fn print_report(report: &StemReport) {
    print!("{}", format_report(report));
}

/// Write a summary report to stdout.
pub fn print_summary(summary: &DictionarySummary) {
    println!("=== Dictionary Summary ===");
    println!("Stems: {}", summary.stem_count);
    println!("Inflections: {}", summary.inflection_count);
    println!("Synonym groups: {}", summary.group_count);
    println!("Tree height: {}", summary.tree_height);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{GroupId, SenseReport};

    fn sample() -> StemReport {
        StemReport {
            stem: "happy".to_string(),
            inflections: vec!["happier".to_string(), "happiest".to_string()],
            senses: vec![
                SenseReport {
                    group: GroupId(0),
                    synonyms: vec!["glad".to_string(), "joyful".to_string()],
                },
                SenseReport {
                    group: GroupId(3),
                    synonyms: vec![],
                },
            ],
        }
    }

    #[test]
    fn test_format_report() {
        let text = format_report(&sample());
        assert_eq!(
            text,
            "happy\n\
             \x20 Inflections: happier, happiest\n\
             \x20 Sense 0 (group 0): glad, joyful\n\
             \x20 Sense 1 (group 3): -\n"
        );
    }

    #[test]
    fn test_format_bare_stem() {
        let report = StemReport {
            stem: "lone".to_string(),
            inflections: vec![],
            senses: vec![],
        };
        assert_eq!(
            format_report(&report),
            "lone\n  Inflections: -\n  Senses: -\n"
        );
    }

    #[test]
    fn test_write_json() {
        let mut buf = Vec::new();
        write_json(&sample(), &mut buf).unwrap();

        let value: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(value["stem"], "happy");
        assert_eq!(value["senses"][0]["group"], 0);
        assert_eq!(value["senses"][0]["synonyms"][1], "joyful");
    }
}
