use crate::api::transport::{HttpTransport, MinreqTransport};
use crate::config::{Config, FileConfig};
use crate::error::GaError;
use crate::input::GoogleAnalyticsInput;
use crate::metrics::JsonLinesAccumulator;
use clap::Args;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

/// Flags for `ga-report gather`. Anything set here overrides the config file and
/// the environment.
#[derive(Debug, Default, Args)]
pub struct GatherArgs {
    /// Config file (defaults to ~/.ga-report/config.toml when present)
    #[arg(long, short = 'c')]
    pub config: Option<PathBuf>,

    /// Path to the service-account key file
    #[arg(long)]
    pub key_file: Option<String>,

    /// Reporting view to query, e.g. ga:155849743
    #[arg(long)]
    pub view_id: Option<String>,

    #[arg(long)]
    pub start_date: Option<String>,

    #[arg(long)]
    pub end_date: Option<String>,

    /// Request timeout in seconds
    #[arg(long)]
    pub timeout_secs: Option<u64>,
}

impl GatherArgs {
    fn overrides(&self) -> FileConfig {
        FileConfig {
            key_file: self.key_file.clone(),
            view_id: self.view_id.clone(),
            start_date: self.start_date.clone(),
            end_date: self.end_date.clone(),
            timeout_secs: self.timeout_secs,
            ..Default::default()
        }
    }
}

/// Handle the `ga-report gather` command. Returns the process exit code.
pub fn handle_gather(args: &GatherArgs) -> i32 {
    let stdout = std::io::stdout();
    match run_gather(args, Arc::new(MinreqTransport::new()), stdout.lock()) {
        Ok(_) => 0,
        Err(e) => {
            eprintln!("gather failed: {}", e);
            1
        }
    }
}

/// One collection cycle writing JSON lines to `out`
pub fn run_gather<W: Write>(
    args: &GatherArgs,
    transport: Arc<dyn HttpTransport>,
    out: W,
) -> Result<usize, GaError> {
    let config = Config::load(args.config.as_deref(), args.overrides())?;
    let input = GoogleAnalyticsInput::new(config);

    let mut acc = JsonLinesAccumulator::new(out);
    let count = input.gather_with(transport, &mut acc)?;
    acc.finish()?;
    Ok(count)
}
