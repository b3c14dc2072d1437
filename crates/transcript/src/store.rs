use std::fs::{self, OpenOptions};
use std::io::Write as _;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use duet_core::{RunConfig, Side, TurnRecord};

use crate::Error;
use crate::render::{render, render_turns};

const INVALID_CHARS: &[char] = &['<', '>', ':', '"', '/', '\\', '|', '?', '*'];
const MAX_LABEL_CHARS: usize = 200;
const FALLBACK_LABEL: &str = "transcript";

/// Makes `label` safe to use inside a file name.
pub fn sanitize_label(label: &str) -> String {
    let safe: String = label
        .chars()
        .map(|c| if c == ' ' { '_' } else { c })
        .filter(|c| !INVALID_CHARS.contains(c) && !c.is_control())
        .take(MAX_LABEL_CHARS)
        .collect();
    if safe.is_empty() {
        FALLBACK_LABEL.to_owned()
    } else {
        safe
    }
}

/// Returns the label used to name the transcript of a run.
pub fn filename_label(config: &RunConfig) -> String {
    let matchup = format!(
        "{}_vs_{}",
        config.model(Side::A),
        config.model(Side::B)
    );
    match config.experiment_name() {
        Some(name) => format!("{name}_{matchup}"),
        None => matchup,
    }
}

/// A folder holding transcript documents.
#[derive(Clone, Debug)]
pub struct TranscriptStore {
    folder: PathBuf,
}

impl TranscriptStore {
    /// Opens `folder`, creating it if needed.
    pub fn create<P: Into<PathBuf>>(folder: P) -> Result<Self, Error> {
        let folder = folder.into();
        fs::create_dir_all(&folder)?;
        Ok(Self { folder })
    }

    /// Returns the folder of this store.
    #[inline]
    pub fn folder(&self) -> &Path {
        &self.folder
    }

    /// Derives a path for a new transcript that doesn't exist yet.
    #[inline]
    pub fn make_filename(&self, label: &str) -> PathBuf {
        self.make_filename_at(label, Local::now())
    }

    /// Like [`make_filename`](Self::make_filename), with an explicit time.
    pub fn make_filename_at(&self, label: &str, now: DateTime<Local>) -> PathBuf {
        let stem = format!("{}_{}", now.format("%Y%m%d_%H%M%S"), sanitize_label(label));
        let mut path = self.folder.join(format!("{stem}.md"));
        let mut suffix = 1;
        while path.exists() {
            path = self.folder.join(format!("{stem}_{suffix}.md"));
            suffix += 1;
        }
        path
    }

    /// Writes a new transcript to `path`, replacing any existing file.
    pub fn save(
        &self,
        records: &[TurnRecord],
        config: Option<&RunConfig>,
        path: &Path,
    ) -> Result<(), Error> {
        let doc = render(records, config, Local::now())?;
        fs::write(path, doc)?;
        info!("saved {} turns to {}", records.len(), path.display());
        Ok(())
    }

    /// Appends turn sections to the transcript at `path`, or saves a new
    /// transcript if there is none.
    pub fn append(&self, records: &[TurnRecord], path: &Path) -> Result<(), Error> {
        if !path.exists() {
            return self.save(records, None, path);
        }
        let mut file = OpenOptions::new().append(true).open(path)?;
        file.write_all(render_turns(records).as_bytes())?;
        info!("appended {} turns to {}", records.len(), path.display());
        Ok(())
    }
}
