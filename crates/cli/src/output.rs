//! Rendering recommendations for the terminal or a file.

use anyhow::Result;
use clap::ValueEnum;
use colored::Colorize;
use pipeline::{PipelineReport, Recommendation};
use std::io::Write;

/// How recommendations are written out
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// `"user"<TAB>[["item", score], ...]`, one user per line
    Jsonl,
    /// `user<TAB>item:score,item:score,...`
    Text,
    /// Colored ranked listing for humans
    Pretty,
}

/// Write every recommendation in the requested format
pub fn write_recommendations(
    out: &mut dyn Write,
    recommendations: &[Recommendation],
    format: OutputFormat,
) -> Result<()> {
    for rec in recommendations {
        match format {
            OutputFormat::Jsonl => {
                let items: Vec<(&str, f64)> = rec
                    .items
                    .iter()
                    .map(|i| (i.item_id.as_str(), i.score))
                    .collect();
                writeln!(
                    out,
                    "{}\t{}",
                    serde_json::to_string(&rec.user_id)?,
                    serde_json::to_string(&items)?
                )?;
            }
            OutputFormat::Text => {
                let items = rec
                    .items
                    .iter()
                    .map(|i| format!("{}:{:.4}", i.item_id, i.score))
                    .collect::<Vec<_>>()
                    .join(",");
                writeln!(out, "{}\t{}", rec.user_id, items)?;
            }
            OutputFormat::Pretty => {
                writeln!(out, "{}", format!("User {}", rec.user_id).bold().blue())?;
                for (rank, item) in rec.items.iter().enumerate() {
                    writeln!(
                        out,
                        "  {}. {} - Score: {:.3}",
                        (rank + 1).to_string().green(),
                        item.item_id,
                        item.score
                    )?;
                }
            }
        }
    }
    out.flush()?;
    Ok(())
}

/// Print a per-stage summary to stderr
pub fn print_report(report: &PipelineReport) {
    for stage in &report.stages {
        eprintln!(
            "{} {}: {} in, {} shuffled, {} keys, {} out",
            "•".cyan(),
            stage.stage.bold(),
            stage.input_records,
            stage.shuffled_records,
            stage.reduce_keys,
            stage.output_records
        );
        if stage.counters.is_empty() {
            continue;
        }
        for (name, count) in stage.counters.iter() {
            eprintln!("    {}: {}", name, count);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pipeline::RankedItem;

    fn sample() -> Vec<Recommendation> {
        vec![Recommendation {
            user_id: "alice".to_string(),
            items: vec![
                RankedItem { item_id: "book".to_string(), score: 4.0 },
                RankedItem { item_id: "game".to_string(), score: 3.5 },
            ],
        }]
    }

    fn render(format: OutputFormat) -> String {
        let mut buf = Vec::new();
        write_recommendations(&mut buf, &sample(), format).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_jsonl_output() {
        assert_eq!(
            render(OutputFormat::Jsonl),
            "\"alice\"\t[[\"book\",4.0],[\"game\",3.5]]\n"
        );
    }

    #[test]
    fn test_text_output() {
        assert_eq!(render(OutputFormat::Text), "alice\tbook:4.0000,game:3.5000\n");
    }

    #[test]
    fn test_pretty_output_lists_items() {
        let text = render(OutputFormat::Pretty);
        assert!(text.contains("alice"));
        assert!(text.contains("book - Score: 4.000"));
    }
}
