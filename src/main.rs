use anyhow::Result;
use clap::Parser;
use std::fs;
use tracing::{error, info};

use commitday::{print_report, server, utils, Analyzer, Args, Config};

async fn run_report(analyzer: &Analyzer, args: &Args, username: &str) -> Result<()> {
    let report = analyzer.report(username).await?;

    let tagline = if args.no_tagline {
        None
    } else {
        Some(analyzer.tagline(&report).await?)
    };

    if let Some(path) = &args.chart_out {
        fs::write(path, analyzer.render_chart(&report))?;
        info!(action = "write", component = "chart", path = ?path, "Chart written");
    }

    print_report(&report, tagline.as_deref());
    if let Some(path) = &args.chart_out {
        println!("\nChart written to {}", path.display());
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    utils::setup_logging(args.verbose);
    utils::validate_args(&args)?;

    let config = Config::from_args(&args);
    let analyzer = config.build_analyzer()?;

    match args.username.as_deref() {
        Some(username) => {
            if let Err(e) = run_report(&analyzer, &args, username).await {
                error!("Error: {}", e);
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
            Ok(())
        }
        None => server::serve(config.bind, analyzer).await,
    }
}
