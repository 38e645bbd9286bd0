use crate::config::ReportFormat;
use crate::reduce::Group;
use crate::worker::WorkerStats;
use anyhow::{Context, Result};
use serde::Serialize;
use std::io::Write;

/// Totals for one run. Workers contribute their own counters on join.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct RunStats {
    pub files_dispatched: u64,
    pub entries_skipped: u64,
    #[serde(flatten)]
    pub workers: WorkerStats,
    pub groups: u64,
}

/// Ranked groups plus run totals.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Report {
    pub groups: Vec<Group>,
    pub stats: RunStats,
}

impl Report {
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn group(&self, key: &str) -> Option<&Group> {
        self.groups.iter().find(|g| g.key == key)
    }

    /// Group keys in ranked order.
    pub fn keys(&self) -> Vec<&str> {
        self.groups.iter().map(|g| g.key.as_str()).collect()
    }

    /// `<group>: <count>` followed by `- <name>, <population>` per record.
    pub fn write_text<W: Write>(&self, w: &mut W) -> Result<()> {
        for g in &self.groups {
            writeln!(w, "{}: {}", g.key, g.count)?;
            for rec in &g.records {
                writeln!(w, "- {}, {}", rec.name, rec.population)?;
            }
        }
        Ok(())
    }

    pub fn write_json<W: Write>(&self, w: &mut W, pretty: bool) -> Result<()> {
        if pretty {
            serde_json::to_writer_pretty(&mut *w, self)?;
        } else {
            serde_json::to_writer(&mut *w, self)?;
        }
        w.write_all(b"\n")?;
        Ok(())
    }

    pub fn write<W: Write>(&self, w: &mut W, format: ReportFormat) -> Result<()> {
        match format {
            ReportFormat::Text => self.write_text(w),
            ReportFormat::Json => self.write_json(w, false),
            ReportFormat::JsonPretty => self.write_json(w, true),
        }
        .context("writing report")?;
        w.flush().context("flushing report")
    }

    /// Text rendering as a `String`; handy for comparisons.
    pub fn to_text(&self) -> String {
        let mut buf = Vec::new();
        // Writing into a Vec cannot fail.
        let _ = self.write_text(&mut buf);
        String::from_utf8_lossy(&buf).into_owned()
    }
}
