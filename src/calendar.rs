use chrono::NaiveDate;
use regex::Regex;

use crate::error::{CommitdayError, Result};
use crate::stats::DailyRecord;

/// Class carried by the calendar `<svg>` on a profile page.
pub const WIDGET_CLASS: &str = "js-calendar-graph-svg";
/// Class carried by every day-cell `<rect>` inside the widget.
pub const CELL_CLASS: &str = "ContributionCalendar-day";
/// Cell text used for days without activity.
pub const ZERO_MARKER: &str = "No contributions";

/// One day-cell of the calendar widget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarCell {
    pub date: NaiveDate,
    pub count: u32,
}

/// Locates the calendar widget in profile markup and reads its day-cells.
#[derive(Debug, Clone)]
pub struct CalendarParser {
    svg_tag: Regex,
    cell: Regex,
    class_attr: Regex,
    date_attr: Regex,
    tag: Regex,
}

impl CalendarParser {
    pub fn new() -> std::result::Result<Self, regex::Error> {
        Ok(Self {
            svg_tag: Regex::new(r"(?i)<(/?)svg\b([^>]*)>")?,
            cell: Regex::new(r#"(?is)<rect\b([^>]*?)(?:/>|>(.*?)</rect>)"#)?,
            class_attr: Regex::new(r#"(?i)(?:^|\s)class\s*=\s*["']([^"']*)["']"#)?,
            date_attr: Regex::new(r#"(?i)(?:^|\s)data-date\s*=\s*["']([^"']*)["']"#)?,
            tag: Regex::new(r"<[^>]*>")?,
        })
    }

    /// Inner markup of the first `<svg>` carrying the widget class, up to its
    /// matching `</svg>`. Nested and self-closed `<svg>` tags are balanced.
    ///
    /// A widget that is opened but never closed is a parse error.
    pub fn find_widget<'a>(&self, html: &'a str) -> Result<Option<&'a str>> {
        let mut tags = self.svg_tag.captures_iter(html);

        let start = loop {
            let Some(caps) = tags.next() else {
                return Ok(None);
            };
            let attrs = caps.get(2).map_or("", |m| m.as_str());
            let opening = caps[1].is_empty() && !is_self_closed(attrs);
            if opening && self.has_class(attrs, WIDGET_CLASS) {
                break caps.get(0).map_or(0, |m| m.end());
            }
        };

        let mut depth = 1usize;
        for caps in tags {
            let attrs = caps.get(2).map_or("", |m| m.as_str());
            if !caps[1].is_empty() {
                depth -= 1;
                if depth == 0 {
                    let end = caps.get(0).map_or(html.len(), |m| m.start());
                    return Ok(Some(&html[start..end]));
                }
            } else if !is_self_closed(attrs) {
                depth += 1;
            }
        }

        Err(CommitdayError::Parse("calendar widget is never closed".to_string()))
    }

    /// Reads every day-cell of a widget. Any malformed cell fails the whole read.
    pub fn cells(&self, widget: &str) -> Result<Vec<CalendarCell>> {
        let mut cells = Vec::new();
        for caps in self.cell.captures_iter(widget) {
            let attrs = caps.get(1).map_or("", |m| m.as_str());
            if !self.has_class(attrs, CELL_CLASS) {
                continue;
            }

            let raw_date = self
                .date_attr
                .captures(attrs)
                .and_then(|c| c.get(1))
                .map(|m| m.as_str())
                .ok_or_else(|| CommitdayError::Parse("day cell without data-date".to_string()))?;
            let date = NaiveDate::parse_from_str(raw_date, "%Y-%m-%d").map_err(|e| {
                CommitdayError::Parse(format!("invalid date '{}': {}", raw_date, e))
            })?;

            let text = caps
                .get(2)
                .map_or(String::new(), |m| self.visible_text(m.as_str()));
            let count = parse_count(&text)?;
            cells.push(CalendarCell { date, count });
        }
        Ok(cells)
    }

    /// Widget lookup plus cell reading, folded into per-date counts.
    ///
    /// Returns `Ok(None)` when the page has no calendar widget at all.
    pub fn parse(&self, html: &str) -> Result<Option<DailyRecord>> {
        let Some(widget) = self.find_widget(html)? else {
            return Ok(None);
        };
        let mut daily = DailyRecord::new();
        for cell in self.cells(widget)? {
            // later cells win
            daily.insert(cell.date, cell.count);
        }
        Ok(Some(daily))
    }

    fn has_class(&self, attrs: &str, class: &str) -> bool {
        self.class_attr
            .captures(attrs)
            .and_then(|c| c.get(1))
            .is_some_and(|m| m.as_str().split_whitespace().any(|c| c == class))
    }

    fn visible_text(&self, inner: &str) -> String {
        let stripped = self.tag.replace_all(inner, " ");
        normalize_ws(&normalize_entities(&stripped))
    }
}

fn is_self_closed(attrs: &str) -> bool {
    attrs.trim_end().ends_with('/')
}

/// Count encoded in a cell's text: zero for the marker phrase, otherwise the
/// leading integer.
pub fn parse_count(text: &str) -> Result<u32> {
    if text.contains(ZERO_MARKER) {
        return Ok(0);
    }
    let leading = text.split(' ').next().unwrap_or("");
    leading
        .replace(',', "")
        .parse::<u32>()
        .map_err(|_| CommitdayError::Parse(format!("no count in cell text '{}'", text)))
}

pub fn normalize_entities(s: &str) -> String {
    s.replace("&nbsp;", " ").replace("&amp;", "&")
}

pub fn normalize_ws(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parser() -> CalendarParser {
        CalendarParser::new().unwrap()
    }

    fn page(cells: &str) -> String {
        format!(
            r#"<html><body>
            <svg width="10" height="10" class="octicon"><path d="M0"/></svg>
            <svg width="717" height="112" class="js-calendar-graph-svg">
              <g transform="translate(10, 20)">{}</g>
            </svg></body></html>"#,
            cells
        )
    }

    #[test]
    fn reads_counts_and_zero_marker() {
        let html = page(
            r#"<rect class="ContributionCalendar-day" data-date="2024-01-01" data-level="1">3 contributions on Monday, January 1, 2024</rect>
               <rect class="ContributionCalendar-day" data-date="2024-01-02" data-level="0">No contributions on Tuesday, January 2, 2024</rect>
               <rect class="ContributionCalendar-day" data-date="2024-01-03">1 contribution on <b>Wednesday</b></rect>"#,
        );
        let daily = parser().parse(&html).unwrap().unwrap();
        let values: Vec<u32> = daily.values().copied().collect();
        assert_eq!(values, vec![3, 0, 1]);
    }

    #[test]
    fn ignores_svgs_and_rects_without_the_classes() {
        let html = page(
            r#"<rect width="11" height="11"></rect>
               <rect class="ContributionCalendar-label" data-date="2024-01-01">Mon</rect>
               <rect class="ContributionCalendar-day" data-date="2024-01-05">7 contributions</rect>"#,
        );
        let daily = parser().parse(&html).unwrap().unwrap();
        assert_eq!(daily.len(), 1);
    }

    #[test]
    fn missing_widget_is_none() {
        let html = "<html><svg class=\"octicon\"></svg></html>";
        assert!(parser().parse(html).unwrap().is_none());
    }

    #[test]
    fn nested_svg_does_not_cut_the_widget_short() {
        let html = page(
            r#"<rect class="ContributionCalendar-day" data-date="2024-01-01">3 contributions</rect>
               <svg class="legend"><rect width="10" height="10"></rect></svg>
               <svg class="spacer"/>
               <rect class="ContributionCalendar-day" data-date="2024-01-02">4 contributions</rect>"#,
        );
        let daily = parser().parse(&html).unwrap().unwrap();
        let values: Vec<u32> = daily.values().copied().collect();
        assert_eq!(values, vec![3, 4]);
    }

    #[test]
    fn self_closed_svg_before_the_widget_is_skipped() {
        let widget = page(
            r#"<rect class="ContributionCalendar-day" data-date="2024-01-05">7 contributions</rect>"#,
        );
        let html = format!(r#"<svg class="spacer"/>{}"#, widget);
        let daily = parser().parse(&html).unwrap().unwrap();
        assert_eq!(daily.len(), 1);
    }

    #[test]
    fn unclosed_widget_is_a_parse_error() {
        let html = r#"<svg class="js-calendar-graph-svg">
            <rect class="ContributionCalendar-day" data-date="2024-01-05">7 contributions</rect>"#;
        assert!(matches!(parser().parse(html), Err(CommitdayError::Parse(_))));
    }

    #[test]
    fn empty_widget_has_no_cells() {
        let daily = parser().parse(&page("")).unwrap().unwrap();
        assert!(daily.is_empty());
    }

    #[test]
    fn cell_without_date_is_a_parse_error() {
        let html = page(r#"<rect class="ContributionCalendar-day">2 contributions</rect>"#);
        let err = parser().parse(&html).unwrap_err();
        assert!(matches!(err, CommitdayError::Parse(_)));
    }

    #[test]
    fn bad_date_or_count_is_a_parse_error() {
        let bad_date =
            page(r#"<rect class="ContributionCalendar-day" data-date="2024-13-40">2 contributions</rect>"#);
        assert!(matches!(parser().parse(&bad_date), Err(CommitdayError::Parse(_))));

        let bad_count =
            page(r#"<rect class="ContributionCalendar-day" data-date="2024-01-01">many contributions</rect>"#);
        assert!(matches!(parser().parse(&bad_count), Err(CommitdayError::Parse(_))));

        let self_closing = page(r#"<rect class="ContributionCalendar-day" data-date="2024-01-01"/>"#);
        assert!(matches!(parser().parse(&self_closing), Err(CommitdayError::Parse(_))));
    }

    #[test]
    fn parse_count_handles_separators_and_entities() {
        assert_eq!(parse_count("1,204 contributions on Friday").unwrap(), 1204);
        let text = normalize_ws(&normalize_entities("No&nbsp;contributions  on Sunday"));
        assert_eq!(parse_count(&text).unwrap(), 0);
    }
}
