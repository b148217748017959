//! Date range and date template parsing and matching.
//!
//! ## Supported Syntax (first match wins)
//!
//! ### Named windows
//! - `today`
//! - `last_week`, `last_month`, `last_year` (trailing 7/30/365 days plus today)
//! - `this_month`, `this_year` (from the 1st of the period through today)
//!
//! ### Relative shorthand
//! - `-Nd`: N days ending today (`-1d` is today alone); an invalid N falls
//!   back to 7
//!
//! ### Explicit ranges (inclusive)
//! - `mm/dd/yyyy-`, `-mm/dd/yyyy`, `mm/dd/yyyy-mm/dd/yyyy`
//!
//! ### Templates
//! - `mm/dd/yyyy` where any component may be `*`
//!
//! All day boundaries are computed in a fixed reference time zone.

use chrono::{DateTime, Datelike, Duration, FixedOffset, NaiveDate, NaiveTime, Utc};

use crate::config::FilefindConfig;
use crate::error::{FilefindError, Result};

const SECONDS_PER_DAY: i64 = 86_400;
const FALLBACK_DAYS: i64 = 7;
const DATE_FORMAT: &str = "%m/%d/%Y";

/// Inclusive range of epoch seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub begin: i64,
    pub end: i64,
}

/// Month/day/year pattern; `None` components are ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateTemplate {
    pub month: Option<u32>,
    pub day: Option<u32>,
    pub year: Option<i32>,
}

/// Exactly one representation is active per filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateFilterKind {
    Range(DateRange),
    Template(DateTemplate),
}

/// A parsed date filter bound to the reference time zone.
#[derive(Debug, Clone)]
pub struct DateFilter {
    kind: DateFilterKind,
    offset: FixedOffset,
}

/// Current date and sentinel bounds used while parsing.
#[derive(Debug, Clone)]
pub struct DateContext {
    today: NaiveDate,
    offset: FixedOffset,
    floor: i64,
    ceiling: i64,
}

impl DateContext {
    /// Captures today's date in the configured reference time zone.
    pub fn capture(config: &FilefindConfig) -> Result<Self> {
        let offset = config.reference_offset()?;
        let today = Utc::now().with_timezone(&offset).date_naive();
        Ok(Self::at(today, offset, config.range_floor, config.range_ceiling))
    }

    pub fn at(today: NaiveDate, offset: FixedOffset, floor: i64, ceiling: i64) -> Self {
        Self {
            today,
            offset,
            floor,
            ceiling,
        }
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    fn day_start(&self, date: NaiveDate) -> i64 {
        date.and_time(NaiveTime::MIN).and_utc().timestamp()
            - i64::from(self.offset.local_minus_utc())
    }

    fn day_end(&self, date: NaiveDate) -> i64 {
        self.day_start(date) + SECONDS_PER_DAY - 1
    }

    fn through_today(&self, start: NaiveDate) -> DateRange {
        DateRange {
            begin: self.day_start(start),
            end: self.day_end(self.today),
        }
    }

    fn trailing(&self, days: i64) -> DateRange {
        self.through_today(self.today - Duration::days(days))
    }
}

impl DateFilter {
    pub fn parse(raw: &str, context: &DateContext) -> Result<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(FilefindError::invalid_date(raw, "requires a value"));
        }

        let kind = if let Some(range) = named_window(trimmed, context) {
            DateFilterKind::Range(range)
        } else if let Some(days) = relative_days(trimmed) {
            DateFilterKind::Range(context.trailing(days - 1))
        } else if trimmed.contains('-') {
            DateFilterKind::Range(parse_explicit_range(trimmed, raw, context)?)
        } else {
            DateFilterKind::Template(parse_template(trimmed, raw)?)
        };

        Ok(Self {
            kind,
            offset: context.offset,
        })
    }

    pub fn kind(&self) -> &DateFilterKind {
        &self.kind
    }

    /// Checks if a timestamp (in seconds) matches this filter.
    pub fn matches(&self, timestamp: i64) -> bool {
        match &self.kind {
            DateFilterKind::Range(range) => range.begin <= timestamp && timestamp <= range.end,
            DateFilterKind::Template(template) => {
                let Some(utc) = DateTime::from_timestamp(timestamp, 0) else {
                    return false;
                };
                let local = utc.with_timezone(&self.offset);
                template.month.map_or(true, |month| month == local.month())
                    && template.day.map_or(true, |day| day == local.day())
                    && template.year.map_or(true, |year| year == local.year())
            }
        }
    }
}

fn named_window(keyword: &str, context: &DateContext) -> Option<DateRange> {
    let today = context.today;
    match keyword.to_ascii_lowercase().as_str() {
        "today" => Some(context.through_today(today)),
        "last_week" => Some(context.trailing(7)),
        "last_month" => Some(context.trailing(30)),
        "last_year" => Some(context.trailing(365)),
        "this_month" => Some(context.through_today(today.with_day(1)?)),
        "this_year" => Some(context.through_today(NaiveDate::from_ymd_opt(today.year(), 1, 1)?)),
        _ => None,
    }
}

/// Recognizes `-Nd`; a malformed N yields the fallback window.
fn relative_days(raw: &str) -> Option<i64> {
    let inner = raw.strip_prefix('-')?;
    let count = inner
        .strip_suffix('d')
        .or_else(|| inner.strip_suffix('D'))?;
    if count.contains('/') {
        return None;
    }
    match count.parse::<i64>() {
        Ok(days) if days > 0 && days <= 36_500 => Some(days),
        _ => {
            tracing::warn!(
                "invalid day count in {raw:?}, using the last {FALLBACK_DAYS} days"
            );
            Some(FALLBACK_DAYS)
        }
    }
}

fn parse_explicit_range(trimmed: &str, raw: &str, context: &DateContext) -> Result<DateRange> {
    let (start_raw, end_raw) = trimmed
        .split_once('-')
        .map(|(start, end)| (start.trim(), end.trim()))
        .unwrap_or((trimmed, ""));

    if start_raw.is_empty() && end_raw.is_empty() {
        return Err(FilefindError::invalid_date(raw, "range has no bounds"));
    }
    let begin = if start_raw.is_empty() {
        context.floor
    } else {
        context.day_start(parse_date(start_raw, raw)?)
    };
    let end = if end_raw.is_empty() {
        context.ceiling
    } else {
        context.day_end(parse_date(end_raw, raw)?)
    };
    if begin > end {
        return Err(FilefindError::invalid_date(
            raw,
            "range start must be before or equal to end",
        ));
    }
    Ok(DateRange { begin, end })
}

fn parse_date(value: &str, raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value, DATE_FORMAT).map_err(|error| {
        FilefindError::invalid_date(raw, format!("{value:?} is not mm/dd/yyyy: {error}"))
    })
}

fn parse_template(trimmed: &str, raw: &str) -> Result<DateTemplate> {
    let parts = trimmed.split('/').map(str::trim).collect::<Vec<_>>();
    let [month, day, year] = parts.as_slice() else {
        return Err(FilefindError::invalid_date(
            raw,
            "expected mm/dd/yyyy with optional '*' components",
        ));
    };

    let template = DateTemplate {
        month: template_component(month, raw, "month")?,
        day: template_component(day, raw, "day")?,
        year: template_component(year, raw, "year")?,
    };
    if template.month.is_some_and(|month| !(1..=12).contains(&month)) {
        return Err(FilefindError::invalid_date(raw, "month must be 1-12"));
    }
    if template.day.is_some_and(|day| !(1..=31).contains(&day)) {
        return Err(FilefindError::invalid_date(raw, "day must be 1-31"));
    }
    Ok(template)
}

fn template_component<T: std::str::FromStr>(value: &str, raw: &str, name: &str) -> Result<Option<T>> {
    if value == "*" {
        return Ok(None);
    }
    value
        .parse()
        .map(Some)
        .map_err(|_| FilefindError::invalid_date(raw, format!("{name} {value:?} is not a number")))
}
