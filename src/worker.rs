//! Filter workers: pull jobs off the shared queue, stream each file through a
//! [`RecordSource`], and forward rows at or above the job's threshold.

use crate::config::{RecordPolicy, WorkerOptions};
use crate::record::Record;
use crate::source::RecordSource;
use crossbeam_channel::{Receiver, Sender};
use serde::Serialize;
use std::path::PathBuf;

/// One input file plus its threshold and dedicated result channel.
/// Dropping the job closes the channel.
#[derive(Debug)]
pub struct Job {
    pub path: PathBuf,
    pub min_population: u64,
    pub results: Sender<Record>,
}

/// Counters owned by a single worker and handed back on join.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct WorkerStats {
    pub files: u64,
    pub files_unreadable: u64,
    pub rows: u64,
    pub rows_malformed: u64,
    pub records_passed: u64,
}

impl WorkerStats {
    pub fn merge(&mut self, other: WorkerStats) {
        self.files += other.files;
        self.files_unreadable += other.files_unreadable;
        self.rows += other.rows;
        self.rows_malformed += other.rows_malformed;
        self.records_passed += other.records_passed;
    }
}

/// Worker loop: blocks on the queue, returns once it is closed and drained.
pub fn run_worker(id: usize, jobs: Receiver<Job>, opts: &WorkerOptions) -> WorkerStats {
    let mut stats = WorkerStats::default();
    for job in jobs.iter() {
        tracing::debug!(worker = id, path = %job.path.display(), "job start");
        process_job(job, opts, &mut stats);
    }
    tracing::debug!(worker = id, files = stats.files, passed = stats.records_passed, "worker done");
    stats
}

/// Stream one file into its result channel. Takes the job by value so the
/// sender is dropped (channel closed) on every return path.
fn process_job(job: Job, opts: &WorkerOptions, stats: &mut WorkerStats) {
    stats.files += 1;
    let source = match RecordSource::open(&job.path, &opts.source) {
        Ok(s) => s,
        Err(e) => {
            tracing::warn!(path = %job.path.display(), error = %e, "cannot open file, skipping");
            stats.files_unreadable += 1;
            return;
        }
    };

    for row in source {
        let record = match row {
            Ok(r) => r,
            Err(e) => {
                stats.rows_malformed += 1;
                tracing::warn!("skipping row: {e}");
                if e.is_terminal() {
                    return;
                }
                if opts.record_policy == RecordPolicy::AbortJob {
                    tracing::warn!(path = %job.path.display(), "strict mode: abandoning rest of file");
                    return;
                }
                continue;
            }
        };
        stats.rows += 1;
        if record.population < job.min_population {
            continue;
        }
        if job.results.send(record).is_err() {
            tracing::warn!(path = %job.path.display(), "result receiver gone, stopping file");
            return;
        }
        stats.records_passed += 1;
    }
}
