use clap::error::ErrorKind;
use clap::{Parser, ValueEnum};
use popreduce::{init_tracing_once, Pipeline, PipelineError, RecordPolicy, ReportFormat, WalkErrorPolicy};
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

const EXIT_USAGE: u8 = 1;
const EXIT_BAD_NUMBER: u8 = 2;
const EXIT_TRAVERSAL: u8 = 3;
const EXIT_RUNTIME: u8 = 4;

#[derive(Parser, Debug)]
#[command(name = "popreduce", version)]
#[command(about = "Filter city population CSVs under a directory and rank states by qualifying cities")]
struct Cli {
    /// Directory of CSV files (walked recursively)
    dir: PathBuf,

    /// Minimum population for a city to be reported
    #[arg(allow_negative_numbers = true)]
    min_population: u64,

    #[arg(long, default_value_t = 3, help = "Number of worker threads")]
    workers: usize,

    #[arg(long, default_value_t = 0, help = "Job queue capacity (0 = hand off directly to an idle worker)")]
    job_buffer: usize,

    #[arg(long, default_value_t = 50, help = "Per-file result channel capacity")]
    result_buffer: usize,

    #[arg(long, default_value_t = 500, help = "Pending result channels queued for the reducer")]
    handle_buffer: usize,

    #[arg(long, value_enum, default_value_t = Format::Text)]
    format: Format,

    #[arg(long, help = "Stop reading a file at its first malformed row")]
    strict: bool,

    #[arg(long, help = "Skip unreadable directory entries instead of aborting the walk")]
    keep_going: bool,

    #[arg(long, help = "Follow symbolic links while walking")]
    follow_links: bool,

    #[arg(long, help = "Show a progress bar on stderr")]
    progress: bool,

    #[arg(long, default_value = "warn", help = "Log filter when RUST_LOG is unset (error, warn, info, debug)")]
    log_level: String,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Format {
    Text,
    Json,
    JsonPretty,
}

impl From<Format> for ReportFormat {
    fn from(f: Format) -> Self {
        match f {
            Format::Text => ReportFormat::Text,
            Format::Json => ReportFormat::Json,
            Format::JsonPretty => ReportFormat::JsonPretty,
        }
    }
}

fn exit_for_clap(e: clap::Error) -> ExitCode {
    let _ = e.print();
    match e.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => ExitCode::SUCCESS,
        ErrorKind::ValueValidation => ExitCode::from(EXIT_BAD_NUMBER),
        _ => ExitCode::from(EXIT_USAGE),
    }
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(c) => c,
        Err(e) => return exit_for_clap(e),
    };
    init_tracing_once(&cli.log_level);

    let pipeline = Pipeline::new(&cli.dir, cli.min_population)
        .workers(cli.workers)
        .job_buffer(cli.job_buffer)
        .result_buffer(cli.result_buffer)
        .handle_buffer(cli.handle_buffer)
        .record_policy(if cli.strict { RecordPolicy::AbortJob } else { RecordPolicy::Skip })
        .walk_errors(if cli.keep_going { WalkErrorPolicy::Continue } else { WalkErrorPolicy::Abort })
        .follow_links(cli.follow_links)
        .progress(cli.progress);
    let format = ReportFormat::from(cli.format);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match pipeline.run() {
        Ok(report) => match report.write(&mut out, format) {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                eprintln!("popreduce: {e:#}");
                ExitCode::from(EXIT_RUNTIME)
            }
        },
        Err(PipelineError::Traversal { source, partial }) => {
            if let Err(e) = partial.write(&mut out, format) {
                eprintln!("popreduce: {e:#}");
            }
            eprintln!("popreduce: {source}");
            ExitCode::from(EXIT_TRAVERSAL)
        }
        Err(e) => {
            eprintln!("popreduce: {e}");
            ExitCode::from(EXIT_RUNTIME)
        }
    }
}
