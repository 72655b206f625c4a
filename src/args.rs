use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;

use crate::activity::DEFAULT_PROFILE_URL;
use crate::narrative::{DEFAULT_API_BASE, DEFAULT_MODEL};

#[derive(Parser, Debug, Clone)]
#[command(
    name = "commitday",
    about = "Chart which weekdays a GitHub user commits on, with a generated tagline",
    version,
    long_about = None
)]
pub struct Args {
    /// Address the web form listens on
    #[arg(short, long, default_value = "127.0.0.1:5000")]
    pub bind: SocketAddr,

    /// Analyze this user once and print a report instead of serving
    #[arg(short, long)]
    pub username: Option<String>,

    /// Write the chart SVG to this file (report mode only)
    #[arg(long)]
    pub chart_out: Option<PathBuf>,

    /// Skip the generated tagline (report mode only)
    #[arg(long)]
    pub no_tagline: bool,

    /// Profile page URL; `{username}` is replaced with the submitted name
    #[arg(long, default_value = DEFAULT_PROFILE_URL)]
    pub profile_url: String,

    /// Chat completions model used for the tagline
    #[arg(short, long, default_value = DEFAULT_MODEL)]
    pub model: String,

    /// Base URL of the OpenAI-compatible API
    #[arg(long, default_value = DEFAULT_API_BASE)]
    pub api_base: String,

    /// API key for the text generation service
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Timeout in seconds for outbound requests (none by default)
    #[arg(short, long)]
    pub timeout: Option<u64>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}
