use crate::config::{PipelineOptions, RecordPolicy, WalkErrorPolicy};
use crate::dispatch::{dispatch, DispatchError, DispatchSummary};
use crate::progress::JobProgress;
use crate::record::Record;
use crate::reduce::{reduce, GroupAggregate};
use crate::report::{Report, RunStats};
use crate::worker::{run_worker, Job, WorkerStats};
use crossbeam_channel::{bounded, Receiver};
use std::io;
use std::path::Path;
use std::thread;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    /// The walk stopped early. `partial` holds everything dispatched before it.
    #[error("traversal failed: {source}")]
    Traversal {
        #[source]
        source: DispatchError,
        partial: Box<Report>,
    },
    #[error("failed to spawn {role} thread: {source}")]
    Spawn {
        role: &'static str,
        #[source]
        source: io::Error,
    },
    #[error("{role} thread panicked")]
    Panicked { role: &'static str },
}

type Joined = (GroupAggregate, Result<DispatchSummary, DispatchError>, WorkerStats);

/// Dispatcher + fixed worker pool + reducer over one directory.
#[derive(Clone, Debug)]
pub struct Pipeline {
    pub(crate) opts: PipelineOptions,
}

impl Pipeline {
    pub fn new(root: impl AsRef<Path>, min_population: u64) -> Self {
        Self { opts: PipelineOptions::default().with_root(root).with_min_population(min_population) }
    }

    pub fn from_options(opts: PipelineOptions) -> Self {
        Self { opts }
    }

    pub fn options(&self) -> &PipelineOptions {
        &self.opts
    }

    // -------- Builder methods --------
    pub fn workers(mut self, n: usize) -> Self { self.opts = self.opts.with_workers(n); self }
    pub fn job_buffer(mut self, n: usize) -> Self { self.opts = self.opts.with_job_buffer(n); self }
    pub fn result_buffer(mut self, n: usize) -> Self { self.opts = self.opts.with_result_buffer(n); self }
    pub fn handle_buffer(mut self, n: usize) -> Self { self.opts = self.opts.with_handle_buffer(n); self }
    pub fn record_policy(mut self, policy: RecordPolicy) -> Self { self.opts = self.opts.with_record_policy(policy); self }
    pub fn walk_errors(mut self, policy: WalkErrorPolicy) -> Self { self.opts = self.opts.with_walk_errors(policy); self }
    pub fn follow_links(mut self, yes: bool) -> Self { self.opts = self.opts.with_follow_links(yes); self }
    pub fn progress(mut self, yes: bool) -> Self { self.opts = self.opts.with_progress(yes); self }
    pub fn read_buffer(mut self, bytes: usize) -> Self { self.opts = self.opts.with_read_buffer(bytes); self }
    pub fn open_retries(mut self, tries: usize, backoff_ms: u64) -> Self { self.opts = self.opts.with_open_retries(tries, backoff_ms); self }

    /// Run to completion and return the ranked report.
    ///
    /// Workers and the dispatcher run on scoped threads; the reducer runs on the
    /// calling thread. Every thread is joined before this returns.
    pub fn run(&self) -> Result<Report, PipelineError> {
        let opts = &self.opts;
        let worker_opts = opts.worker();
        let dispatch_opts = opts.dispatch();
        let progress = JobProgress::new(opts.progress, "Filtering files");

        tracing::info!(
            root = %opts.root.display(),
            min_population = opts.min_population,
            workers = opts.workers,
            "starting run"
        );

        let (agg, dispatched, worker_stats) = thread::scope(|s| -> Result<Joined, PipelineError> {
            // Channels live inside the scope so an early return closes them
            // before the scope joins the threads already started.
            let (job_tx, job_rx) = bounded::<Job>(opts.job_buffer);
            let (handle_tx, handle_rx) = bounded::<Receiver<Record>>(opts.handle_buffer);

            let mut workers = Vec::with_capacity(opts.workers);
            for id in 0..opts.workers {
                let jobs = job_rx.clone();
                let worker_opts = &worker_opts;
                let handle = thread::Builder::new()
                    .name(format!("popreduce-worker-{id}"))
                    .spawn_scoped(s, move || run_worker(id, jobs, worker_opts))
                    .map_err(|source| PipelineError::Spawn { role: "worker", source })?;
                workers.push(handle);
            }
            drop(job_rx);

            let dispatch_progress = progress.clone();
            let dispatch_opts = &dispatch_opts;
            let dispatcher = thread::Builder::new()
                .name("popreduce-dispatch".to_string())
                .spawn_scoped(s, move || {
                    dispatch(&opts.root, opts.min_population, dispatch_opts, job_tx, handle_tx, &dispatch_progress)
                })
                .map_err(|source| PipelineError::Spawn { role: "dispatcher", source })?;

            let agg = reduce(handle_rx, &progress);

            let mut stats = WorkerStats::default();
            let mut worker_panicked = false;
            for w in workers {
                match w.join() {
                    Ok(part) => stats.merge(part),
                    Err(_) => worker_panicked = true,
                }
            }
            let dispatched = dispatcher.join().map_err(|_| PipelineError::Panicked { role: "dispatcher" })?;
            if worker_panicked {
                return Err(PipelineError::Panicked { role: "worker" });
            }
            Ok((agg, dispatched, stats))
        })?;

        let stats = RunStats {
            files_dispatched: dispatched.as_ref().map_or(agg.jobs_drained(), |d| d.files_dispatched),
            entries_skipped: dispatched.as_ref().map_or(0, |d| d.entries_skipped),
            workers: worker_stats,
            groups: agg.group_count() as u64,
        };
        let report = Report { groups: agg.rank(), stats };
        progress.finish("done");

        tracing::info!(
            files = stats.files_dispatched,
            unreadable = stats.workers.files_unreadable,
            rows = stats.workers.rows,
            malformed = stats.workers.rows_malformed,
            passed = stats.workers.records_passed,
            groups = stats.groups,
            "run complete"
        );

        match dispatched {
            Ok(_) => Ok(report),
            Err(source) => Err(PipelineError::Traversal { source, partial: Box::new(report) }),
        }
    }
}
