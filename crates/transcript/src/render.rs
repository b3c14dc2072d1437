use chrono::{DateTime, Local};
use duet_core::{RunConfig, TurnRecord};

use crate::Error;
use crate::extract::extract_content;

pub(crate) const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Renders a complete transcript document.
///
/// The document opens with a title stamped `created_at`, followed by the
/// run configuration (if given) as a YAML block, then one section per
/// record.
pub fn render(
    records: &[TurnRecord],
    config: Option<&RunConfig>,
    created_at: DateTime<Local>,
) -> Result<String, Error> {
    let mut lines = vec![format!(
        "# Transcript — {}\n",
        created_at.format(TIMESTAMP_FORMAT)
    )];

    if let Some(config) = config {
        let yaml = serde_yaml::to_string(config)?;
        lines.push("## Configuration\n".to_owned());
        lines.push(format!("```yaml\n{yaml}```\n"));
    }

    lines.extend(sections(records));
    Ok(lines.join("\n"))
}

/// Renders only the record sections, for appending to a document.
pub fn render_turns(records: &[TurnRecord]) -> String {
    let mut out = String::new();
    for section in sections(records) {
        out.push('\n');
        out.push_str(&section);
    }
    out
}

fn sections(records: &[TurnRecord]) -> impl Iterator<Item = String> {
    records.iter().flat_map(|record| {
        [
            format!(
                "## {} — {}\n",
                record.label(),
                record.timestamp().format(TIMESTAMP_FORMAT)
            ),
            format!("{}\n", extract_content(record.text())),
        ]
    })
}
