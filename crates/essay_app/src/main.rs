mod platform;

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use essay_logging::{essay_info, essay_warn};

use platform::config::{self, WizardConfig};
use platform::logging::{self, LogDestination};

/// Terminal wizard that turns a student profile into a three-part personal statement draft.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Configuration file (RON).
    #[arg(long, default_value = config::DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// Base URL of the generation service.
    #[arg(long, env = "ESSAY_API_URL")]
    api_url: Option<String>,

    /// Directory exported documents are saved to.
    #[arg(long, env = "ESSAY_OUTPUT_DIR")]
    output_dir: Option<PathBuf>,

    /// Where log output goes.
    #[arg(long, value_enum)]
    log: Option<LogDestination>,

    /// Log at debug level.
    #[arg(short, long)]
    verbose: bool,

    /// Save the effective configuration to the config file and continue.
    #[arg(long)]
    write_config: bool,
}

impl Args {
    fn apply(&self, config: &mut WizardConfig) {
        if let Some(url) = &self.api_url {
            config.api_base_url = url.clone();
        }
        if let Some(dir) = &self.output_dir {
            config.output_dir = dir.clone();
        }
        if let Some(destination) = self.log {
            config.log_destination = destination;
        }
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let (mut config, load_error) = match config::load(&args.config) {
        Ok(config) => (config, None),
        Err(err) => (WizardConfig::default(), Some(err)),
    };
    args.apply(&mut config);

    logging::initialize(config.log_destination, args.verbose);
    if let Some(err) = load_error {
        essay_warn!("Ignoring config {:?}: {}", args.config, err);
    }
    if args.write_config {
        config::save_over_valid(&args.config, &config)
            .with_context(|| format!("not overwriting config {:?}", args.config))?;
        essay_info!("Wrote config to {:?}", args.config);
    }

    essay_info!(
        "Starting essay wizard against {} (exports to {:?})",
        config.api_base_url,
        config.output_dir
    );
    platform::app::run(&config)
}
