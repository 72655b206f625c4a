use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

use crate::activity::{validate_username, ActivityExtractor};
use crate::chart::ChartRenderer;
use crate::error::Result;
use crate::narrative::{self, TextGenerator};
use crate::stats::{weekday_name, ActivityReport, Analysis};

/// Runs the fetch → aggregate → tagline → chart pipeline for one profile.
#[derive(Clone)]
pub struct Analyzer {
    extractor: ActivityExtractor,
    generator: Arc<dyn TextGenerator>,
    chart: ChartRenderer,
}

impl Analyzer {
    pub fn new(
        extractor: ActivityExtractor,
        generator: Arc<dyn TextGenerator>,
        chart: ChartRenderer,
    ) -> Self {
        Self {
            extractor,
            generator,
            chart,
        }
    }

    /// Scraping and aggregation only, no tagline or chart.
    pub async fn report(&self, username: &str) -> Result<ActivityReport> {
        self.extractor.extract(username).await
    }

    pub async fn tagline(&self, report: &ActivityReport) -> Result<String> {
        narrative::tagline(self.generator.as_ref(), &report.counts).await
    }

    pub fn render_chart(&self, report: &ActivityReport) -> String {
        self.chart.render(&report.counts)
    }

    /// The full pipeline. The first failing stage aborts the rest.
    pub async fn analyze(&self, username: &str) -> Result<Analysis> {
        let total_start_time = Instant::now();
        let username = validate_username(username)?;
        info!(action = "start", component = "analysis", username, "Starting profile analysis");

        let result = self.run(username).await;
        match &result {
            Ok(analysis) => info!(
                action = "complete",
                component = "analysis",
                username,
                most_active = weekday_name(analysis.most_active),
                least_active = weekday_name(analysis.least_active),
                duration_ms = total_start_time.elapsed().as_millis(),
                "Analysis completed successfully"
            ),
            Err(e) => warn!(
                action = "abort",
                component = "analysis",
                username,
                kind = e.kind(),
                error = %e,
                duration_ms = total_start_time.elapsed().as_millis(),
                "Analysis failed"
            ),
        }
        result
    }

    async fn run(&self, username: &str) -> Result<Analysis> {
        let report = self.report(username).await?;
        let tagline = self.tagline(&report).await?;
        let chart = self.render_chart(&report);

        Ok(Analysis {
            most_active: report.counts.most_active(),
            least_active: report.counts.least_active(),
            report,
            chart,
            tagline,
        })
    }
}
