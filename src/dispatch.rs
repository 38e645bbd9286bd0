use crate::config::{DispatchOptions, WalkErrorPolicy};
use crate::progress::JobProgress;
use crate::record::Record;
use crate::worker::Job;
use crossbeam_channel::{bounded, Receiver, Sender};
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("walking {}: {source}", .root.display())]
    Walk {
        root: PathBuf,
        #[source]
        source: walkdir::Error,
    },
    #[error("no worker accepted job for {}", .path.display())]
    WorkersGone { path: PathBuf },
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DispatchSummary {
    pub files_dispatched: u64,
    pub entries_skipped: u64,
}

/// Walk `root` and hand every non-directory file to the worker pool.
///
/// Each file gets its own bounded result channel. The job goes to `jobs` first,
/// then the matching receiver goes to `handles`, so the reducer sees receivers in
/// discovery order. Both senders are consumed: returning closes both queues.
pub fn dispatch(
    root: &Path,
    min_population: u64,
    opts: &DispatchOptions,
    jobs: Sender<Job>,
    handles: Sender<Receiver<Record>>,
    progress: &JobProgress,
) -> Result<DispatchSummary, DispatchError> {
    let mut summary = DispatchSummary::default();
    let walker = WalkDir::new(root)
        .follow_links(opts.follow_links)
        .sort_by_file_name();

    for entry in walker {
        let entry = match entry {
            Ok(e) => e,
            Err(source) => match opts.walk_errors {
                WalkErrorPolicy::Abort => {
                    tracing::error!(root = %root.display(), error = %source, "directory walk aborted");
                    return Err(DispatchError::Walk { root: root.to_path_buf(), source });
                }
                WalkErrorPolicy::Continue => {
                    tracing::warn!(root = %root.display(), error = %source, "skipping unreadable entry");
                    summary.entries_skipped += 1;
                    continue;
                }
            },
        };
        // Unfollowed symlinks to directories show up as links, not dirs.
        if entry.file_type().is_dir() || (entry.path_is_symlink() && entry.path().is_dir()) {
            continue;
        }

        let path = entry.into_path();
        let (tx, rx) = bounded::<Record>(opts.result_buffer);
        let job = Job { path, min_population, results: tx };
        if let Err(rejected) = jobs.send(job) {
            return Err(DispatchError::WorkersGone { path: rejected.into_inner().path });
        }
        if handles.send(rx).is_err() {
            // Reducer is gone; nothing downstream will read further results.
            tracing::warn!("reducer stopped listening, ending dispatch");
            break;
        }
        summary.files_dispatched += 1;
        progress.job_dispatched();
    }

    tracing::info!(
        root = %root.display(),
        files = summary.files_dispatched,
        skipped = summary.entries_skipped,
        "dispatch complete"
    );
    Ok(summary)
}
