use std::time::Instant;
use tracing::{info, warn};
use url::Url;

use crate::calendar::CalendarParser;
use crate::error::{CommitdayError, Result};
use crate::stats::{ActivityReport, DateSpan, WeekdayCounts};

pub const DEFAULT_PROFILE_URL: &str = "https://github.com/{username}";
pub const USERNAME_PLACEHOLDER: &str = "{username}";
/// Name substituted into the profile URL template when checking it at startup.
pub const SAMPLE_USERNAME: &str = "octocat";

/// Checks a submitted profile identifier and returns it trimmed.
pub fn validate_username(raw: &str) -> Result<&str> {
    let username = raw.trim();
    if username.is_empty() {
        return Err(CommitdayError::Validation(
            "Please enter a GitHub username".to_string(),
        ));
    }
    if !username
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
    {
        return Err(CommitdayError::Validation(format!(
            "'{}' is not a valid username",
            username
        )));
    }
    // dot segments would be resolved away by the URL parser
    if username == "." || username == ".." {
        return Err(CommitdayError::Validation(format!(
            "'{}' is not a valid username",
            username
        )));
    }
    Ok(username)
}

/// Fills the `{username}` placeholder of a profile URL template.
///
/// Validated names only hold characters that need no percent-encoding, so the
/// name always lands as exactly one path segment.
pub fn profile_url(template: &str, username: &str) -> Result<Url> {
    let username = validate_username(username)?;
    let raw = template.replace(USERNAME_PLACEHOLDER, username);
    Url::parse(&raw).map_err(|e| {
        CommitdayError::Validation(format!(
            "'{}' does not form a valid profile URL: {}",
            username, e
        ))
    })
}

/// Startup check of an operator-supplied profile URL template.
pub fn check_profile_template(template: &str) -> std::result::Result<Url, String> {
    if !template.contains(USERNAME_PLACEHOLDER) {
        return Err(format!("must contain {}", USERNAME_PLACEHOLDER));
    }
    Url::parse(&template.replace(USERNAME_PLACEHOLDER, SAMPLE_USERNAME))
        .map_err(|e| e.to_string())
}

/// Fetches profile pages and turns their contribution calendar into weekday totals.
#[derive(Debug, Clone)]
pub struct ActivityExtractor {
    client: reqwest::Client,
    url_template: String,
    parser: CalendarParser,
}

impl ActivityExtractor {
    pub fn new(
        client: reqwest::Client,
        url_template: impl Into<String>,
        parser: CalendarParser,
    ) -> Self {
        Self {
            client,
            url_template: url_template.into(),
            parser,
        }
    }

    /// Plain GET of the profile page. Non-success statuses are network errors.
    pub async fn fetch_page(&self, url: &Url) -> Result<String> {
        let start_time = Instant::now();
        info!(action = "start", component = "page_fetch", url = %url, "Fetching profile page");

        let network_error = |status: Option<u16>, reason: String| CommitdayError::Network {
            url: url.to_string(),
            status,
            reason,
        };

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| network_error(None, e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            warn!(
                action = "fetch",
                component = "page_fetch",
                url = %url,
                status = status.as_u16(),
                "Profile page returned an error status"
            );
            return Err(network_error(
                Some(status.as_u16()),
                format!("HTTP status {}", status),
            ));
        }

        let body = response
            .text()
            .await
            .map_err(|e| network_error(Some(status.as_u16()), e.to_string()))?;

        info!(
            action = "complete",
            component = "page_fetch",
            bytes = body.len(),
            duration_ms = start_time.elapsed().as_millis(),
            "Profile page fetched"
        );
        Ok(body)
    }

    /// Runs fetch, parse and weekday aggregation for one profile.
    pub async fn extract(&self, username: &str) -> Result<ActivityReport> {
        let username = validate_username(username)?;
        let url = profile_url(&self.url_template, username)?;
        let html = self.fetch_page(&url).await?;
        self.report_from_html(username, url.as_str(), &html)
    }

    /// Offline half of [`extract`](Self::extract): markup in, report out.
    pub fn report_from_html(
        &self,
        username: &str,
        url: &str,
        html: &str,
    ) -> Result<ActivityReport> {
        let start_time = Instant::now();
        let daily = self
            .parser
            .parse(html)?
            .ok_or_else(|| CommitdayError::MissingWidget { url: url.to_string() })?;

        let counts = WeekdayCounts::from_daily(&daily);
        let span = DateSpan::of(&daily);
        let active_days = daily.values().filter(|c| **c > 0).count();

        info!(
            action = "complete",
            component = "calendar_parse",
            username,
            cells = daily.len(),
            active_days,
            total = counts.total(),
            duration_ms = start_time.elapsed().as_millis(),
            "Calendar parsed"
        );

        Ok(ActivityReport {
            username: username.to_string(),
            span,
            active_days,
            counts,
        })
    }
}
