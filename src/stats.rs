use chrono::{Datelike, NaiveDate, Weekday};
use serde::Serialize;
use std::collections::BTreeMap;

/// Monday through Sunday, the order every weekday listing uses.
pub const WEEKDAYS: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

pub fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

/// Per-date counts scraped from the calendar widget.
pub type DailyRecord = BTreeMap<NaiveDate, u32>;

/// Totals for each of the seven weekdays. Always holds all seven.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WeekdayCounts {
    counts: [u32; 7],
}

impl WeekdayCounts {
    pub fn new(counts: [u32; 7]) -> Self {
        Self { counts }
    }

    pub fn from_daily(daily: &DailyRecord) -> Self {
        let mut totals = Self::default();
        for (date, count) in daily {
            totals.add(date.weekday(), *count);
        }
        totals
    }

    pub fn add(&mut self, day: Weekday, count: u32) {
        let slot = &mut self.counts[day.num_days_from_monday() as usize];
        *slot = slot.saturating_add(count);
    }

    pub fn get(&self, day: Weekday) -> u32 {
        self.counts[day.num_days_from_monday() as usize]
    }

    /// Weekdays with their totals, Monday first.
    pub fn iter(&self) -> impl Iterator<Item = (Weekday, u32)> + '_ {
        WEEKDAYS.iter().map(move |day| (*day, self.get(*day)))
    }

    pub fn total(&self) -> u64 {
        self.counts.iter().map(|c| u64::from(*c)).sum()
    }

    pub fn max_count(&self) -> u32 {
        self.counts.iter().copied().max().unwrap_or(0)
    }

    /// Weekday with the highest total; ties go to the earliest in the week.
    pub fn most_active(&self) -> Weekday {
        let mut best = (Weekday::Mon, self.get(Weekday::Mon));
        for (day, count) in self.iter() {
            if count > best.1 {
                best = (day, count);
            }
        }
        best.0
    }

    /// Weekday with the lowest total; ties go to the earliest in the week.
    pub fn least_active(&self) -> Weekday {
        let mut worst = (Weekday::Mon, self.get(Weekday::Mon));
        for (day, count) in self.iter() {
            if count < worst.1 {
                worst = (day, count);
            }
        }
        worst.0
    }
}

impl Serialize for WeekdayCounts {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeMap;
        let mut map = serializer.serialize_map(Some(7))?;
        for (day, count) in self.iter() {
            map.serialize_entry(weekday_name(day), &count)?;
        }
        map.end()
    }
}

/// First and last observed dates and the number of days between them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateSpan {
    pub first: NaiveDate,
    pub last: NaiveDate,
    pub days_between: i64,
}

impl DateSpan {
    pub fn of(daily: &DailyRecord) -> Option<Self> {
        let first = *daily.keys().next()?;
        let last = *daily.keys().next_back()?;
        Some(Self {
            first,
            last,
            days_between: (last - first).num_days(),
        })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ActivityReport {
    pub username: String,
    pub span: Option<DateSpan>,
    pub active_days: usize,
    pub counts: WeekdayCounts,
}

/// Everything the result view shows for one profile.
#[derive(Debug, Clone)]
pub struct Analysis {
    pub report: ActivityReport,
    pub chart: String,
    pub most_active: Weekday,
    pub least_active: Weekday,
    pub tagline: String,
}
