//! Rendering score outcomes for stdout.

use serde_json::{Value, json};
use synscore_core::ScoreRecord;

use crate::run::FileOutcome;

/// One JSON object per file: its score records, or the error and failing stage.
pub fn to_json(outcomes: &[FileOutcome]) -> Value {
    let items: Vec<Value> = outcomes
        .iter()
        .map(|outcome| {
            let file = outcome.path.display().to_string();
            match &outcome.result {
                Ok(results) => {
                    let records: Vec<ScoreRecord> = results.iter().map(ScoreRecord::from).collect();
                    json!({ "file": file, "records": records })
                }
                Err(e) => json!({
                    "file": file,
                    "stage": outcome.failed_stage(),
                    "error": format!("{e:#}"),
                }),
            }
        })
        .collect();
    Value::Array(items)
}

/// Human-readable ranking, one block per file.
pub fn to_table(outcomes: &[FileOutcome]) -> String {
    let mut out = String::new();
    for outcome in outcomes {
        out.push_str(&format!("{}\n", outcome.path.display()));
        match &outcome.result {
            Ok(results) => {
                for r in results {
                    out.push_str(&format!(
                        "  {:>2}  {:>7.2}%  {}\n",
                        r.rank + 1,
                        r.confidence * 100.0,
                        r.label
                    ));
                }
            }
            Err(e) => {
                let stage = outcome.failed_stage().unwrap_or("load");
                out.push_str(&format!("  error ({stage}): {e:#}\n"));
            }
        }
    }
    out
}
