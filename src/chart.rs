//! Weekday bar chart rendered as an inline SVG fragment.
//!
//! The output is meant to be dropped straight into an HTML page: no XML
//! prolog, a `viewBox` so it scales with its container, and no scripts.
//! Rendering is deterministic, so identical counts give identical markup.

use std::fmt::Write as _;

use crate::stats::{weekday_name, WeekdayCounts};

/// One color per weekday position, Monday first.
pub const BAR_COLORS: [&str; 7] = [
    "#2c7bb6", "#00a6ca", "#00ccbc", "#90eb9d", "#ffff8c", "#fdae61", "#d7191c",
];

#[derive(Debug, Clone)]
pub struct ChartTheme {
    pub background_color: String,
    pub grid_color: String,
    pub axis_color: String,
    pub text_color: String,
}

impl Default for ChartTheme {
    fn default() -> Self {
        Self {
            background_color: "#ffffff".into(),
            grid_color: "#808080".into(),
            axis_color: "#444444".into(),
            text_color: "#2a3f5f".into(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ChartRenderer {
    width: u32,
    height: u32,
    title: String,
    x_label: String,
    y_label: String,
    theme: ChartTheme,
}

impl Default for ChartRenderer {
    fn default() -> Self {
        Self {
            width: 900,
            height: 500,
            title: "GitHub Commits".into(),
            x_label: "Day of Week".into(),
            y_label: "Number of Commits".into(),
            theme: ChartTheme::default(),
        }
    }
}

// Plot margins, in SVG user units.
const MARGIN_LEFT: f64 = 80.0;
const MARGIN_RIGHT: f64 = 30.0;
const MARGIN_TOP: f64 = 80.0;
const MARGIN_BOTTOM: f64 = 80.0;

impl ChartRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn render(&self, counts: &WeekdayCounts) -> String {
        let width = f64::from(self.width);
        let height = f64::from(self.height);
        let plot_w = width - MARGIN_LEFT - MARGIN_RIGHT;
        let plot_h = height - MARGIN_TOP - MARGIN_BOTTOM;
        let baseline = MARGIN_TOP + plot_h;

        // u64 keeps the headroom above a u32::MAX bar from overflowing
        let max = u64::from(counts.max_count());
        let step = tick_step(max);
        let axis_max = (max / step + 1) * step;
        let scale = plot_h / axis_max as f64;

        let mut svg = String::new();
        let _ = writeln!(
            svg,
            r#"<svg xmlns="http://www.w3.org/2000/svg" class="commit-chart" viewBox="0 0 {w} {h}" width="100%" preserveAspectRatio="xMidYMid meet" role="img" aria-label="{title}" font-family="Open Sans, Arial, sans-serif">"#,
            w = self.width,
            h = self.height,
            title = xml_escape(&self.title),
        );
        let _ = writeln!(
            svg,
            r#"  <rect width="100%" height="100%" fill="{}"/>"#,
            self.theme.background_color
        );

        // Horizontal gridlines with their tick labels
        let mut tick = 0u64;
        while tick <= axis_max {
            let y = baseline - tick as f64 * scale;
            let _ = writeln!(
                svg,
                r#"  <line x1="{x1:.1}" y1="{y:.1}" x2="{x2:.1}" y2="{y:.1}" stroke="{color}" stroke-width="0.5"/>"#,
                x1 = MARGIN_LEFT,
                x2 = MARGIN_LEFT + plot_w,
                y = y,
                color = self.theme.grid_color,
            );
            let _ = writeln!(
                svg,
                r#"  <text x="{x:.1}" y="{y:.1}" font-size="12" fill="{color}" text-anchor="end" dominant-baseline="middle">{tick}</text>"#,
                x = MARGIN_LEFT - 8.0,
                y = y,
                color = self.theme.text_color,
                tick = tick,
            );
            tick += step;
        }

        // Bars, value labels and weekday labels
        let slot = plot_w / 7.0;
        let bar_w = slot * 0.7;
        for (i, (day, count)) in counts.iter().enumerate() {
            let bar_h = f64::from(count) * scale;
            let x = MARGIN_LEFT + slot * i as f64 + (slot - bar_w) / 2.0;
            let center = x + bar_w / 2.0;
            let name = weekday_name(day);
            let _ = writeln!(
                svg,
                r#"  <rect class="bar" x="{x:.1}" y="{y:.1}" width="{w:.1}" height="{h:.1}" fill="{color}"><title>{name}: {count}</title></rect>"#,
                x = x,
                y = baseline - bar_h,
                w = bar_w,
                h = bar_h,
                color = BAR_COLORS[i],
                name = name,
                count = count,
            );
            let _ = writeln!(
                svg,
                r#"  <text class="value" x="{x:.1}" y="{y:.1}" font-size="14" fill="{color}" text-anchor="middle">{count}</text>"#,
                x = center,
                y = baseline - bar_h - 6.0,
                color = self.theme.text_color,
                count = count,
            );
            let _ = writeln!(
                svg,
                r#"  <text class="weekday" x="{x:.1}" y="{y:.1}" font-size="14" fill="{color}" text-anchor="middle">{name}</text>"#,
                x = center,
                y = baseline + 22.0,
                color = self.theme.text_color,
                name = name,
            );
        }

        // X axis line; the y axis is left frameless
        let _ = writeln!(
            svg,
            r#"  <line x1="{x1:.1}" y1="{y:.1}" x2="{x2:.1}" y2="{y:.1}" stroke="{color}" stroke-width="0.5"/>"#,
            x1 = MARGIN_LEFT,
            x2 = MARGIN_LEFT + plot_w,
            y = baseline,
            color = self.theme.axis_color,
        );

        let _ = writeln!(
            svg,
            r#"  <text class="title" x="{x:.1}" y="{y:.1}" font-size="24" fill="{color}" text-anchor="middle">{title}</text>"#,
            x = width / 2.0,
            y = MARGIN_TOP / 2.0,
            color = self.theme.text_color,
            title = xml_escape(&self.title),
        );
        let _ = writeln!(
            svg,
            r#"  <text class="axis-title" x="{x:.1}" y="{y:.1}" font-size="18" fill="{color}" text-anchor="middle">{label}</text>"#,
            x = MARGIN_LEFT + plot_w / 2.0,
            y = height - 20.0,
            color = self.theme.text_color,
            label = xml_escape(&self.x_label),
        );
        let _ = writeln!(
            svg,
            r#"  <text class="axis-title" x="{x:.1}" y="{y:.1}" font-size="18" fill="{color}" text-anchor="middle" transform="rotate(-90 {x:.1} {y:.1})">{label}</text>"#,
            x = 24.0,
            y = MARGIN_TOP + plot_h / 2.0,
            color = self.theme.text_color,
            label = xml_escape(&self.y_label),
        );

        svg.push_str("</svg>");
        svg
    }
}

/// Gridline spacing giving roughly five ticks: 1, 2 or 5 times a power of ten.
fn tick_step(max: u64) -> u64 {
    let raw = max.div_ceil(5).max(1);
    let mut magnitude = 1u64;
    while magnitude.saturating_mul(10) <= raw {
        magnitude *= 10;
    }
    [1u64, 2, 5, 10]
        .iter()
        .map(|nice| nice * magnitude)
        .find(|step| *step >= raw)
        .unwrap_or(10 * magnitude)
}

fn xml_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
