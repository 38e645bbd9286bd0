mod config;
mod record;
mod util;

mod source;
mod worker;
mod dispatch;
mod reduce;

mod progress;
mod report;
mod pipeline;

pub use crate::config::{PipelineOptions, RecordPolicy, ReportFormat, SourceOptions, WalkErrorPolicy, WorkerOptions, DispatchOptions};
pub use crate::record::{Record, RecordError};
pub use crate::pipeline::{Pipeline, PipelineError};
pub use crate::report::{Report, RunStats};

// Pipeline stages, usable on their own (tests wire them by hand).
pub use crate::source::RecordSource;
pub use crate::worker::{run_worker, Job, WorkerStats};
pub use crate::dispatch::{dispatch, DispatchError, DispatchSummary};
pub use crate::reduce::{reduce, Group, GroupAggregate};
pub use crate::progress::JobProgress;

pub use crate::util::{init_tracing_once, open_with_backoff};
