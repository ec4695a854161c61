//! Date and datetime normalization.
//!
//! Values are parsed with each strftime hint in turn, then free-form, and
//! rewritten as `YYYY-MM-DD` or `YYYY-MM-DDTHH:MM:SS[±HH:MM]`.

use chrono::{DateTime, Datelike, FixedOffset, Local, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use csvlite_core::errors::{ConfigError, ImportError, NormalizeError};
use csvlite_core::types::{Table, Value};

const ISO_OFFSET_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f%:z",
    "%Y-%m-%d %H:%M:%S%.f%:z",
    "%Y-%m-%dT%H:%M:%S%z",
    "%Y-%m-%d %H:%M:%S%z",
];

const ISO_NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

const FILLER_WORDS: &[&str] = &[
    "on", "of", "the", "at", "in", "year", "monday", "tuesday", "wednesday", "thursday",
    "friday", "saturday", "sunday", "mon", "tue", "tues", "wed", "thu", "thur", "thurs", "fri",
    "sat", "sun",
];

const MONTHS: &[&str] = &[
    "january", "february", "march", "april", "may", "june", "july", "august", "september",
    "october", "november", "december",
];

/// A parsed value. `offset` is only set when the input carried one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParsedDateTime {
    pub datetime: NaiveDateTime,
    pub offset: Option<FixedOffset>,
}

impl ParsedDateTime {
    fn naive(datetime: NaiveDateTime) -> Self {
        Self {
            datetime,
            offset: None,
        }
    }

    fn with_offset(dt: DateTime<FixedOffset>) -> Self {
        Self {
            datetime: dt.naive_local(),
            offset: Some(*dt.offset()),
        }
    }

    /// `YYYY-MM-DD`.
    pub fn to_date_string(&self) -> String {
        self.datetime.format("%Y-%m-%d").to_string()
    }

    /// `YYYY-MM-DDTHH:MM:SS`, plus `±HH:MM` when an offset was parsed.
    pub fn to_datetime_string(&self) -> String {
        let base = self.datetime.format("%Y-%m-%dT%H:%M:%S").to_string();
        match self.offset {
            Some(offset) => {
                let secs = offset.local_minus_utc();
                let sign = if secs < 0 { '-' } else { '+' };
                let secs = secs.abs();
                format!("{base}{sign}{:02}:{:02}", secs / 3600, (secs % 3600) / 60)
            }
            None => base,
        }
    }
}

/// Parses and rewrites designated date and datetime columns.
#[derive(Debug, Clone, Default)]
pub struct DateNormalizer {
    formats: Vec<String>,
}

impl DateNormalizer {
    pub fn new(formats: Vec<String>) -> Self {
        Self { formats }
    }

    /// Parse with each hint in order, then free-form.
    pub fn parse(&self, text: &str) -> Option<ParsedDateTime> {
        let text = text.trim();
        self.formats
            .iter()
            .find_map(|fmt| parse_with_format(text, fmt))
            .or_else(|| parse_free_form(text))
    }

    /// Rewrite `dates` as `YYYY-MM-DD` and `datetimes` as ISO datetimes in
    /// place. Every named column must exist; every non-null value must parse.
    pub fn normalize_table(
        &self,
        table: &mut Table,
        dates: &[String],
        datetimes: &[String],
    ) -> Result<(), ImportError> {
        if let Some(missing) = dates.iter().chain(datetimes).find(|c| !table.has_column(c)) {
            return Err(ConfigError::UnknownColumn {
                context: "Date",
                column: missing.clone(),
                table: table.name().to_string(),
            }
            .into());
        }

        let table_name = table.name().to_string();
        let jobs = dates
            .iter()
            .map(|c| (c, true))
            .chain(datetimes.iter().map(|c| (c, false)));
        for (name, date_only) in jobs {
            let Some(column) = table.column_mut(name) else {
                continue;
            };
            for value in column.values_mut() {
                let Some(text) = value.normalized_text() else {
                    continue;
                };
                let parsed = self.parse(&text).ok_or_else(|| NormalizeError::UnparsableDate {
                    table: table_name.clone(),
                    column: name.clone(),
                    value: text.clone(),
                })?;
                *value = Value::Text(if date_only {
                    parsed.to_date_string()
                } else {
                    parsed.to_datetime_string()
                });
            }
        }
        Ok(())
    }
}

/// As a datetime with offset, then a naive datetime, then a date.
fn parse_with_format(text: &str, fmt: &str) -> Option<ParsedDateTime> {
    if let Ok(dt) = DateTime::parse_from_str(text, fmt) {
        return Some(ParsedDateTime::with_offset(dt));
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(text, fmt) {
        return Some(ParsedDateTime::naive(dt));
    }
    NaiveDate::parse_from_str(text, fmt)
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(ParsedDateTime::naive)
}

fn parse_free_form(text: &str) -> Option<ParsedDateTime> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(ParsedDateTime::with_offset(dt));
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(text) {
        return Some(ParsedDateTime::with_offset(dt));
    }
    for fmt in ISO_OFFSET_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(text, fmt) {
            return Some(ParsedDateTime::with_offset(dt));
        }
    }
    for fmt in ISO_NAIVE_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(text, fmt) {
            return Some(ParsedDateTime::naive(dt));
        }
    }
    parse_tokens(text)
}

#[derive(Debug, Default)]
struct Parts<'a> {
    year: Option<i32>,
    month: Option<u32>,
    day: Option<u32>,
    time: Option<NaiveTime>,
    offset: Option<FixedOffset>,
    numbers: Vec<&'a str>,
}

/// Token-level parser for human-written dates such as
/// `3rd May 2017`, `10pm on April 4 1938` or `04/30/2005`.
fn parse_tokens(text: &str) -> Option<ParsedDateTime> {
    let lowered = text.to_lowercase().replace(',', " ");
    let mut parts = Parts::default();

    for token in lowered.split_whitespace() {
        if FILLER_WORDS.contains(&token) {
            continue;
        }
        if token == "am" || token == "pm" {
            if parts.time.is_none() {
                let hour = parts.numbers.pop()?;
                parts.time = NaiveTime::from_hms_opt(hour.parse().ok()?, 0, 0);
            }
            parts.time = Some(apply_meridiem(parts.time?, token)?);
        } else if let Some(offset) = parse_zone(token) {
            parts.offset = Some(offset);
        } else if let Some(time) = parse_clock(token) {
            if parts.time.replace(time).is_some() {
                return None;
            }
        } else if let Some(month) = month_from_name(token) {
            if parts.month.replace(month).is_some() {
                return None;
            }
        } else if let Some((y, m, d)) = parse_numeric_date(token) {
            if parts.year.is_some() || parts.month.is_some() || parts.day.is_some() {
                return None;
            }
            parts.year = Some(y);
            parts.month = Some(m);
            parts.day = Some(d);
        } else if let Some(day) = parse_ordinal(token) {
            if parts.day.replace(day).is_some() {
                return None;
            }
        } else if token.bytes().all(|b| b.is_ascii_digit()) {
            parts.numbers.push(token);
        } else {
            return None;
        }
    }

    for number in std::mem::take(&mut parts.numbers) {
        let value: u32 = number.parse().ok()?;
        match number.len() {
            8 if parts.year.is_none() && parts.month.is_none() && parts.day.is_none() => {
                parts.year = Some((value / 10_000) as i32);
                parts.month = Some(value / 100 % 100);
                parts.day = Some(value % 100);
            }
            4 if parts.year.is_none() => parts.year = Some(value as i32),
            1 | 2 if parts.day.is_none() => parts.day = Some(value),
            1 | 2 if parts.year.is_none() => parts.year = Some(expand_two_digit_year(value)),
            _ => return None,
        }
    }

    let date = match (parts.year, parts.month, parts.day) {
        (None, None, None) => {
            parts.time?;
            Local::now().date_naive()
        }
        (year, Some(month), day) => NaiveDate::from_ymd_opt(
            year.unwrap_or_else(|| Local::now().year()),
            month,
            day.unwrap_or(1),
        )?,
        (Some(year), None, None) => NaiveDate::from_ymd_opt(year, 1, 1)?,
        _ => return None,
    };
    let datetime = match parts.time {
        Some(time) => date.and_time(time),
        None => date.and_hms_opt(0, 0, 0)?,
    };

    Some(ParsedDateTime {
        datetime,
        offset: parts.offset,
    })
}

fn apply_meridiem(time: NaiveTime, meridiem: &str) -> Option<NaiveTime> {
    let hour = time.hour();
    let hour = match (meridiem, hour) {
        (_, 0) | (_, 13..) => return None,
        ("am", 12) => 0,
        ("am", h) => h,
        ("pm", 12) => 12,
        (_, h) => h + 12,
    };
    time.with_hour(hour)
}

/// `H:MM`, `H:MM:SS`, `H:MM:SS.fff`, `10pm`, `10:30am`.
fn parse_clock(token: &str) -> Option<NaiveTime> {
    let (body, meridiem) = match token.strip_suffix("am").or_else(|| token.strip_suffix("pm")) {
        Some(body) => (body, Some(&token[body.len()..])),
        None => (token, None),
    };
    let fields: Vec<&str> = body.split(':').collect();
    let time = match fields.as_slice() {
        [h] if meridiem.is_some() => NaiveTime::from_hms_opt(h.parse().ok()?, 0, 0)?,
        [h, m] => NaiveTime::from_hms_opt(h.parse().ok()?, parse_two_digits(m)?, 0)?,
        [h, m, s] => {
            let seconds: f64 = s.parse().ok()?;
            if !(0.0..60.0).contains(&seconds) {
                return None;
            }
            let nanos = (seconds.fract() * 1e9).round() as u32;
            NaiveTime::from_hms_nano_opt(
                h.parse().ok()?,
                parse_two_digits(m)?,
                seconds.trunc() as u32,
                nanos,
            )?
        }
        _ => return None,
    };
    match meridiem {
        Some(m) => apply_meridiem(time, m),
        None => Some(time),
    }
}

fn parse_two_digits(s: &str) -> Option<u32> {
    if s.len() == 2 {
        s.parse().ok()
    } else {
        None
    }
}

/// `utc`, `gmt`, `z`, `+05:30`, `-0800`.
fn parse_zone(token: &str) -> Option<FixedOffset> {
    if matches!(token, "utc" | "gmt" | "z") {
        return FixedOffset::east_opt(0);
    }
    let sign = match token.as_bytes().first()? {
        b'+' => 1,
        b'-' => -1,
        _ => return None,
    };
    let digits: String = token[1..].chars().filter(|c| *c != ':').collect();
    if digits.len() != 4 || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let hours: i32 = digits[..2].parse().ok()?;
    let minutes: i32 = digits[2..].parse().ok()?;
    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}

fn month_from_name(token: &str) -> Option<u32> {
    let token = token.trim_end_matches('.');
    if token.len() < 3 {
        return None;
    }
    if token == "sept" {
        return Some(9);
    }
    MONTHS
        .iter()
        .position(|m| *m == token || (token.len() == 3 && m.starts_with(token)))
        .map(|i| i as u32 + 1)
}

/// `3rd`, `21st`, `2nd`, `11th`.
fn parse_ordinal(token: &str) -> Option<u32> {
    let digits = ["st", "nd", "rd", "th"]
        .iter()
        .find_map(|suffix| token.strip_suffix(suffix))?;
    if digits.is_empty() || digits.len() > 2 {
        return None;
    }
    digits.parse().ok().filter(|d| (1..=31).contains(d))
}

/// `YYYY-MM-DD`, `MM/DD/YYYY`, `DD.MM.YY` and friends. The first field is
/// a month unless it exceeds 12.
fn parse_numeric_date(token: &str) -> Option<(i32, u32, u32)> {
    let sep = token.chars().find(|c| matches!(c, '/' | '-' | '.'))?;
    let fields: Vec<&str> = token.split(sep).collect();
    let [a, b, c] = fields.as_slice() else {
        return None;
    };
    if [a, b, c].iter().any(|f| f.is_empty() || !f.bytes().all(|x| x.is_ascii_digit())) {
        return None;
    }
    let (na, nb, nc): (u32, u32, u32) = (a.parse().ok()?, b.parse().ok()?, c.parse().ok()?);

    if a.len() == 4 {
        return Some((na as i32, nb, nc));
    }
    let year = match c.len() {
        4 => nc as i32,
        1 | 2 => expand_two_digit_year(nc),
        _ => return None,
    };
    if na > 12 {
        Some((year, nb, na))
    } else {
        Some((year, na, nb))
    }
}

/// 69-99 → 1969-1999, 00-68 → 2000-2068.
fn expand_two_digit_year(yy: u32) -> i32 {
    if yy >= 69 {
        1900 + yy as i32
    } else {
        2000 + yy as i32
    }
}
