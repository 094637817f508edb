use anyhow::Result;
use chrono::Utc;
use clap::Parser;
use lifx_away_rs::sequencer::ShutdownSequencer;
use lifx_away_rs::settings::Settings;
use lifx_away_rs::{LifxClient, LifxOptions, logging, presence};
use tracing::{error, info};

#[derive(Parser, Debug)]
struct Params {
    /// Path to the secrets file (API key and home network SSIDs)
    #[clap(long, default_value = "secrets.json")]
    secrets: String,
    /// Path to the check-in record written by the monitored device
    #[clap(long, default_value = "check_in.json")]
    check_in: String,
    /// Log file path (if not set, logs to stdout)
    #[clap(long)]
    log_file: Option<String>,
    /// Base URL of the lighting API
    #[clap(long, env = "LIFX_API_URL")]
    api_url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let params = Params::parse();

    let _guard = match &params.log_file {
        Some(path) => logging::setup_file_logging(path)?,
        None => logging::setup_console_logging(),
    };

    // Single error boundary: every failure below lands here, gets logged
    // with its full chain, and turns into a non-zero exit for the scheduler.
    if let Err(err) = run(params).await {
        error!("{err:?}");
        return Err(err);
    }
    Ok(())
}

async fn run(params: Params) -> Result<()> {
    let settings = Settings::load(&params.secrets)?;
    let allow_list = settings.allow_list();

    let check_in = presence::read_check_in(&params.check_in)?;
    let verdict = presence::evaluate(&check_in, &allow_list, Utc::now());

    if !verdict.is_away {
        info!("Device recently checked in from home. Leaving lights alone.");
        return Ok(());
    }

    let mut options = LifxOptions::builder();
    options.api_key(settings.api_key);
    if let Some(url) = params.api_url {
        options.base_url(url);
    }
    let client = LifxClient::new(options.build()?);

    ShutdownSequencer::new(&client).run().await?;
    Ok(())
}
