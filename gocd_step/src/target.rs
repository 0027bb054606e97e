use std::sync::Mutex;

use anyhow::anyhow;
use chrono::Utc;
use gocd_defs::{BuildVariables, LogEntry};

/// The build the step runs under.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Build {
    pub id: String,
}

impl Build {
    pub fn new(id: &str) -> Self {
        Build { id: id.to_string() }
    }
}

/// Host-side view of one build target: its variables and its log.
pub trait BuildTarget: Send + Sync {
    fn variables(&self) -> &BuildVariables;

    /// Opens a log tagged with `label`, carrying `payload` as raw data.
    fn new_log(&self, label: &str, payload: &str) -> Box<dyn BuildLog + '_>;
}

pub trait BuildLog {
    /// Appends a timestamped entry.
    fn append(&mut self, text: &str) -> anyhow::Result<()>;
}

/// Build target that keeps its log in memory.
#[derive(Default)]
pub struct MemoryBuildTarget {
    variables: BuildVariables,
    entries: Mutex<Vec<LogEntry>>,
}

impl MemoryBuildTarget {
    pub fn new(variables: BuildVariables) -> Self {
        MemoryBuildTarget {
            variables,
            entries: Mutex::new(Vec::new()),
        }
    }

    pub fn entries(&self) -> Vec<LogEntry> {
        match self.entries.lock() {
            Ok(entries) => entries.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl BuildTarget for MemoryBuildTarget {
    fn variables(&self) -> &BuildVariables {
        &self.variables
    }

    fn new_log(&self, label: &str, payload: &str) -> Box<dyn BuildLog + '_> {
        Box::new(MemoryLog {
            target: self,
            label: label.to_string(),
            payload: payload.to_string(),
        })
    }
}

struct MemoryLog<'a> {
    target: &'a MemoryBuildTarget,
    label: String,
    payload: String,
}

impl BuildLog for MemoryLog<'_> {
    fn append(&mut self, text: &str) -> anyhow::Result<()> {
        let mut entries = self
            .target
            .entries
            .lock()
            .map_err(|_| anyhow!("build log for {} is poisoned", self.label))?;
        entries.push(LogEntry {
            label: self.label.clone(),
            payload: self.payload.clone(),
            text: text.to_string(),
            timestamp: Utc::now(),
        });
        Ok(())
    }
}
