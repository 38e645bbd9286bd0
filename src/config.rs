use std::path::{Path, PathBuf};

/// What a worker does with a row it cannot parse.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum RecordPolicy {
    /// Log the row and continue with the next one.
    #[default]
    Skip,
    /// Log the row and stop reading the file. Records already sent are kept.
    AbortJob,
}

/// What the dispatcher does when the directory walk hits an error.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum WalkErrorPolicy {
    /// Stop enumerating; jobs already dispatched still complete.
    #[default]
    Abort,
    /// Log the failing entry and keep walking.
    Continue,
}

/// Output rendering for the final report.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ReportFormat {
    #[default]
    Text,
    Json,
    JsonPretty,
}

/// User-facing options with sensible defaults and builder chaining.
#[derive(Clone, Debug)]
pub struct PipelineOptions {
    pub root: PathBuf,
    pub min_population: u64,
    pub workers: usize,               // fixed pool size
    pub job_buffer: usize,            // 0 = rendezvous handoff to workers
    pub result_buffer: usize,         // per-job result channel capacity
    pub handle_buffer: usize,         // queue of result receivers for the reducer
    pub record_policy: RecordPolicy,
    pub walk_errors: WalkErrorPolicy,
    pub follow_links: bool,
    pub progress: bool,

    // IO tuning
    pub read_buffer_bytes: usize,
    pub open_retries: usize,
    pub open_backoff_ms: u64,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            min_population: 0,
            workers: 3,
            job_buffer: 0,
            result_buffer: 50,
            handle_buffer: 500,
            record_policy: RecordPolicy::Skip,
            walk_errors: WalkErrorPolicy::Abort,
            follow_links: false,
            progress: false,

            read_buffer_bytes: 64 * 1024,
            open_retries: 4,
            open_backoff_ms: 25,
        }
    }
}

impl PipelineOptions {
    pub fn with_root(mut self, root: impl AsRef<Path>) -> Self {
        self.root = root.as_ref().to_path_buf();
        self
    }
    pub fn with_min_population(mut self, min: u64) -> Self {
        self.min_population = min;
        self
    }
    pub fn with_workers(mut self, n: usize) -> Self {
        self.workers = n.max(1);
        self
    }
    pub fn with_job_buffer(mut self, n: usize) -> Self {
        self.job_buffer = n;
        self
    }
    pub fn with_result_buffer(mut self, n: usize) -> Self {
        self.result_buffer = n.max(1);
        self
    }
    pub fn with_handle_buffer(mut self, n: usize) -> Self {
        self.handle_buffer = n;
        self
    }
    pub fn with_record_policy(mut self, policy: RecordPolicy) -> Self {
        self.record_policy = policy;
        self
    }
    pub fn with_walk_errors(mut self, policy: WalkErrorPolicy) -> Self {
        self.walk_errors = policy;
        self
    }
    pub fn with_follow_links(mut self, yes: bool) -> Self {
        self.follow_links = yes;
        self
    }
    pub fn with_progress(mut self, yes: bool) -> Self {
        self.progress = yes;
        self
    }

    // IO tuning
    pub fn with_read_buffer(mut self, bytes: usize) -> Self {
        self.read_buffer_bytes = bytes.max(8 * 1024);
        self
    }
    pub fn with_open_retries(mut self, tries: usize, backoff_ms: u64) -> Self {
        self.open_retries = tries.max(1);
        self.open_backoff_ms = backoff_ms;
        self
    }

    pub(crate) fn source(&self) -> SourceOptions {
        SourceOptions {
            read_buffer_bytes: self.read_buffer_bytes,
            open_retries: self.open_retries,
            open_backoff_ms: self.open_backoff_ms,
        }
    }

    pub(crate) fn worker(&self) -> WorkerOptions {
        WorkerOptions { source: self.source(), record_policy: self.record_policy }
    }

    pub(crate) fn dispatch(&self) -> DispatchOptions {
        DispatchOptions {
            result_buffer: self.result_buffer,
            walk_errors: self.walk_errors,
            follow_links: self.follow_links,
        }
    }
}

/// How a single input file is opened and read.
#[derive(Clone, Copy, Debug)]
pub struct SourceOptions {
    pub read_buffer_bytes: usize,
    pub open_retries: usize,
    pub open_backoff_ms: u64,
}

impl Default for SourceOptions {
    fn default() -> Self {
        PipelineOptions::default().source()
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct WorkerOptions {
    pub source: SourceOptions,
    pub record_policy: RecordPolicy,
}

#[derive(Clone, Copy, Debug)]
pub struct DispatchOptions {
    pub result_buffer: usize,
    pub walk_errors: WalkErrorPolicy,
    pub follow_links: bool,
}

impl Default for DispatchOptions {
    fn default() -> Self {
        PipelineOptions::default().dispatch()
    }
}
