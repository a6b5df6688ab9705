//! Quiz session log
//!
//! Every finished session is appended to a single JSON array on disk. An append
//! reads the whole array, pushes one record and rewrites the file. There is no
//! locking: two processes appending at the same time can lose one record.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::ser::PrettyFormatter;
use serde_json::Value;
use tracing::{debug, warn};

use crate::quiz::Level;
use crate::{Error, Result};

pub const DEFAULT_RESULTS_FILE: &str = "dashboard_results.json";

/// One answered question
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerRecord {
    pub question: String,
    #[serde(default)]
    pub choices: Vec<String>,
    pub user_answer: String,
    pub correct_answer: String,
}

/// Outcome of one finished quiz
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub level: Level,
    pub score: u32,
    pub total: u32,
    pub answers: Vec<AnswerRecord>,
    pub timestamp: NaiveDateTime,
}

/// Aggregate figures over the log
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Summary {
    pub sessions: usize,
    pub mean_score: f64,
    pub per_level: BTreeMap<Level, LevelSummary>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LevelSummary {
    pub sessions: usize,
    pub mean_score: f64,
}

/// JSON-array session log at a fixed path
#[derive(Debug, Clone)]
pub struct ResultLog {
    path: PathBuf,
}

impl ResultLog {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one record, rewriting the whole file.
    ///
    /// Entries already in the file are kept as they are, including ones this
    /// version cannot read.
    pub fn append(&self, record: &SessionRecord) -> Result<()> {
        let mut entries = self.read_entries()?;
        entries.push(serde_json::to_value(record)?);

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let mut buf = Vec::new();
        let mut ser =
            serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
        entries.serialize(&mut ser)?;
        fs::write(&self.path, buf)?;

        debug!(path = %self.path.display(), entries = entries.len(), "session recorded");
        Ok(())
    }

    /// All readable records, oldest first.
    ///
    /// Entries that do not deserialize as a [`SessionRecord`] are skipped.
    pub fn load(&self) -> Result<Vec<SessionRecord>> {
        let entries = self.read_entries()?;
        let mut records = Vec::with_capacity(entries.len());
        for (i, entry) in entries.into_iter().enumerate() {
            match serde_json::from_value(entry) {
                Ok(record) => records.push(record),
                Err(e) => warn!(entry = i, error = %e, "skipping unreadable session entry"),
            }
        }
        Ok(records)
    }

    /// Session count and mean scores, overall and per level
    pub fn summary(&self) -> Result<Summary> {
        Ok(summarize(&self.load()?))
    }

    fn read_entries(&self) -> Result<Vec<Value>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let raw = fs::read(&self.path)?;
        if raw.iter().all(u8::is_ascii_whitespace) {
            return Ok(Vec::new());
        }
        match serde_json::from_slice(&raw)? {
            Value::Array(entries) => Ok(entries),
            _ => Err(Error::InvalidInput(format!(
                "{} does not hold a JSON array",
                self.path.display()
            ))),
        }
    }
}

/// Aggregate a list of records
#[must_use]
pub fn summarize(records: &[SessionRecord]) -> Summary {
    if records.is_empty() {
        return Summary::default();
    }

    let mut per_level: BTreeMap<Level, (usize, u64)> = BTreeMap::new();
    for record in records {
        let entry = per_level.entry(record.level).or_default();
        entry.0 += 1;
        entry.1 += u64::from(record.score);
    }

    let total: u64 = records.iter().map(|r| u64::from(r.score)).sum();
    Summary {
        sessions: records.len(),
        mean_score: total as f64 / records.len() as f64,
        per_level: per_level
            .into_iter()
            .map(|(level, (sessions, score))| {
                (
                    level,
                    LevelSummary {
                        sessions,
                        mean_score: score as f64 / sessions as f64,
                    },
                )
            })
            .collect(),
    }
}
