use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use crate::activity::ActivityExtractor;
use crate::analysis::Analyzer;
use crate::args::Args;
use crate::calendar::CalendarParser;
use crate::chart::ChartRenderer;
use crate::narrative::ChatCompletionsClient;

const USER_AGENT: &str = concat!("commitday/", env!("CARGO_PKG_VERSION"));

/// Settings resolved once at startup and shared read-only afterwards.
#[derive(Debug, Clone)]
pub struct Config {
    pub bind: SocketAddr,
    pub profile_url: String,
    pub model: String,
    pub api_base: String,
    pub api_key: Option<String>,
    pub timeout: Option<Duration>,
}

impl Config {
    pub fn from_args(args: &Args) -> Self {
        Self {
            bind: args.bind,
            profile_url: args.profile_url.clone(),
            model: args.model.clone(),
            api_base: args.api_base.clone(),
            api_key: args.api_key.clone(),
            timeout: args.timeout.map(Duration::from_secs),
        }
    }

    pub fn http_client(&self) -> Result<reqwest::Client> {
        let mut builder = reqwest::Client::builder().user_agent(USER_AGENT);
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        builder.build().context("Failed to build HTTP client")
    }

    /// Wires the extractor, text generator and chart renderer together.
    pub fn build_analyzer(&self) -> Result<Analyzer> {
        let client = self.http_client()?;
        let parser = CalendarParser::new().context("Failed to compile calendar patterns")?;
        let extractor = ActivityExtractor::new(client.clone(), self.profile_url.clone(), parser);
        let generator = ChatCompletionsClient::new(client, self.api_key.clone())
            .api_base(self.api_base.clone())
            .model(self.model.clone());

        Ok(Analyzer::new(extractor, Arc::new(generator), ChartRenderer::new()))
    }
}
