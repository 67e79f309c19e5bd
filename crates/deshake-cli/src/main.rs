mod config;
mod progress;
mod summary;

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{bail, Context, Result};
use clap::Parser;
use deshake_core::io::ser::SerReader;
use deshake_core::params::ParameterOverrides;
use deshake_core::pipeline::{run_job, DebugCapture, DeshakeJob, OutputTarget};
use tracing_subscriber::EnvFilter;

use crate::config::{load_config, ConfigFile, ResolvedConfig};
use crate::progress::BarReporter;

#[derive(Parser)]
#[command(
    name = "vhs-deshaker",
    about = "Remove horizontal line shake from digitized VHS video"
)]
#[command(version, allow_negative_numbers = true)]
struct Cli {
    /// Input SER file (8-bit RGB or BGR)
    #[arg(short, long, required_unless_present = "print_config")]
    input: Option<PathBuf>,

    /// Output SER file, or "stdout" to write raw frames to standard output
    #[arg(short, long, required_unless_present = "print_config")]
    output: Option<String>,

    /// Output frame rate [default: estimated from the input timestamps]
    #[arg(short = 'f', long)]
    framerate: Option<f64>,

    /// Columns searched for the border on each side [default: 2 x pure black width]
    #[arg(short = 'c', long = "colrange")]
    col_range: Option<i64>,

    /// Border width every line is moved to [default: pure black width]
    #[arg(short = 't', long)]
    target_line_start: Option<i64>,

    /// Expected pure black border width in pixels [default: 8]
    #[arg(short = 'w', long)]
    pure_black_width: Option<i64>,

    /// Highest intensity counted as pure black, 1-254 [default: 50]
    #[arg(short = 'p', long)]
    pure_black_threshold: Option<i64>,

    /// Minimum number of consistent lines to trust a border [default: 15]
    #[arg(short = 'm', long)]
    min_line_start_segment_length: Option<i64>,

    /// Vertical smoothing window in lines, forced odd [default: 51]
    #[arg(short = 'k', long)]
    line_start_smoothing_kernel_size: Option<i64>,

    /// Gradient magnitude counted as the border edge [default: 30]
    #[arg(long)]
    edge_threshold: Option<f32>,

    /// Largest border deviation still counted as the same segment, exclusive [default: 2]
    #[arg(long)]
    segment_tolerance: Option<i64>,

    /// Parameter file (TOML); command-line flags take precedence
    #[arg(long)]
    config: Option<PathBuf>,

    /// Save line-start overlays of this frame as PNGs
    #[arg(long, requires = "debug_dir")]
    debug_frame: Option<usize>,

    /// Directory for the debug overlays
    #[arg(long, requires = "debug_frame")]
    debug_dir: Option<PathBuf>,

    /// Print the resolved parameters as TOML and exit
    #[arg(long)]
    print_config: bool,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn overrides(&self) -> ParameterOverrides {
        ParameterOverrides {
            col_range: self.col_range,
            target_line_start: self.target_line_start,
            pure_black_width: self.pure_black_width,
            pure_black_threshold: self.pure_black_threshold,
            min_line_start_segment_length: self.min_line_start_segment_length,
            line_start_smoothing_kernel_size: self.line_start_smoothing_kernel_size,
            edge_threshold: self.edge_threshold,
            segment_tolerance: self.segment_tolerance,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let file = match cli.config {
        Some(ref path) => load_config(path)?,
        None => ConfigFile::default(),
    };
    let params = file
        .params
        .merged_with(&cli.overrides())
        .resolve()
        .context("Invalid parameters")?;
    let frame_rate = cli.framerate.or(file.framerate);

    if cli.print_config {
        let resolved = ResolvedConfig {
            framerate: frame_rate,
            params: &params,
        };
        print!("{}", toml::to_string_pretty(&resolved)?);
        return Ok(());
    }

    let input = cli.input.context("--input is required")?;
    let output = OutputTarget::from_arg(cli.output.as_deref().context("--output is required")?);
    if let OutputTarget::Ser(ref path) = output {
        if same_file(&input, path) {
            bail!("Input and output are the same file: {}", path.display());
        }
    }
    let quiet = output.is_stdout();

    let source = SerReader::open(&input)
        .and_then(|reader| reader.source_info(&input))
        .with_context(|| format!("Failed to open {}", input.display()))?;

    let job = DeshakeJob {
        input,
        output,
        frame_rate,
        params,
        debug: match (cli.debug_frame, cli.debug_dir) {
            (Some(frame_index), Some(dir)) => Some(DebugCapture { frame_index, dir }),
            _ => None,
        },
    };

    if !quiet {
        summary::print_job_summary(&job, &source);
        println!("Started at {}", chrono::Local::now().format("%Y-%m-%d %H:%M:%S"));
    }

    let reporter = BarReporter::new(quiet)?;
    let start = Instant::now();
    let result = run_job(&job, &reporter).context("Deshaking failed")?;
    reporter.finish();

    if !quiet {
        println!("Finished at {}", chrono::Local::now().format("%Y-%m-%d %H:%M:%S"));
        summary::print_run_summary(&result, start.elapsed());
    }

    Ok(())
}

/// Whether two paths name the same file, resolving links when both exist.
fn same_file(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}
