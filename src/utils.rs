use time::macros::format_description;
use tracing_subscriber::{fmt::time::LocalTime, EnvFilter};

use crate::activity::check_profile_template;

/// Installs the global tracing subscriber. `RUST_LOG` wins over `verbose`.
pub fn setup_logging(verbose: bool) {
    let default_level = if verbose { "info" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let timer = LocalTime::new(format_description!(
        "[hour]:[minute]:[second].[subsecond digits:3]"
    ));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_timer(timer)
        .with_target(false)
        .try_init();
}

pub fn format_number(num: u64) -> String {
    num.to_string()
        .as_bytes()
        .rchunks(3)
        .rev()
        .map(|chunk| String::from_utf8_lossy(chunk).into_owned())
        .collect::<Vec<_>>()
        .join(",")
}

pub fn validate_args(args: &crate::args::Args) -> anyhow::Result<()> {
    if let Err(reason) = check_profile_template(&args.profile_url) {
        anyhow::bail!("--profile-url '{}' is invalid: {}", args.profile_url, reason);
    }

    if let Some(timeout) = args.timeout {
        if timeout == 0 {
            anyhow::bail!("--timeout must be greater than 0");
        }
    }

    if args.username.is_none() && (args.chart_out.is_some() || args.no_tagline) {
        anyhow::bail!("--chart-out and --no-tagline require --username");
    }

    Ok(())
}
