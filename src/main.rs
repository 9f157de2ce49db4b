use std::{fs, path::PathBuf};

use anyhow::{bail, Context as _, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use youtube_channel_stats::{
    command::Session,
    shell,
    youtube::{YouTubeClient, API_BASE},
};

#[derive(Parser, Debug)]
#[command(about = "Track YouTube channels and compare their statistics")]
struct Args {
    /// YouTube Data API key
    #[arg(short = 'k', long, env = "YOUTUBE_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// File whose first line is the API key
    #[arg(short = 'f', long)]
    api_key_file: Option<PathBuf>,

    #[arg(long, default_value = API_BASE)]
    api_base: String,

    /// Log filter, e.g. `info` or `youtube_channel_stats=debug`
    #[arg(short, long, default_value = "warn")]
    log_level: String,
}

fn read_api_key(args: &Args) -> Result<String> {
    if let Some(key) = &args.api_key {
        return Ok(key.trim().to_string());
    }

    let Some(path) = &args.api_key_file else {
        bail!("No API key given, use --api-key, --api-key-file or YOUTUBE_API_KEY");
    };

    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read API key from {}", path.display()))?;
    let key = content.lines().next().unwrap_or_default().trim();
    if key.is_empty() {
        bail!("{} does not contain an API key", path.display());
    }

    Ok(key.to_string())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(&args.log_level)?)
        .with_writer(std::io::stderr)
        .init();

    let api_key = read_api_key(&args)?;
    let client = YouTubeClient::with_base_url(api_key, &args.api_base);
    let mut session = Session::new(client);

    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    shell::run(&mut session, stdin, &mut std::io::stdout()).await?;

    println!("Tracked {} channel(s) this session", session.channels().len());

    Ok(())
}
