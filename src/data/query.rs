use chrono::{DateTime, Duration, Local, NaiveDate, SecondsFormat, TimeZone, Utc};

use crate::error::TriageError;

use super::types::{DEFAULT_DAYS, MAX_DAYS, MIN_DAYS};

/// Raw values of the popup form, exactly as typed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormInput {
    pub labels: Vec<String>,
    pub days: String,
    pub since: String,
    pub group: bool,
}

/// Canonical issue query. `since`, when present, wins over `days`.
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    pub days: Option<u32>,
    pub since: Option<NaiveDate>,
    pub labels: Vec<String>,
    pub group: bool,
}

impl Default for Query {
    fn default() -> Self {
        Self {
            days: Some(DEFAULT_DAYS),
            since: None,
            labels: Vec::new(),
            group: false,
        }
    }
}

/// Parameters handed to the issue fetcher. Mirrors the persisted record.
#[derive(Debug, Clone, PartialEq)]
pub struct IssueQueryParams {
    pub days: Option<u32>,
    /// RFC 3339 timestamp, or empty.
    pub since: String,
    /// Comma-joined label names, or empty.
    pub labels: String,
    pub group: bool,
}

/// Persisted settings; every field may be missing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SettingsRecord {
    pub days: Option<u32>,
    pub since: Option<String>,
    pub labels: Option<String>,
    pub group: Option<bool>,
}

impl Query {
    /// Normalizes the form: unparsable days become absent and parsed days are
    /// clamped to the 1..=60 range, unparsable dates become absent, labels are
    /// trimmed and de-duplicated in selection order.
    pub fn build(input: &FormInput) -> Self {
        let days = input
            .days
            .trim()
            .parse::<u32>()
            .ok()
            .map(|days| days.clamp(MIN_DAYS, MAX_DAYS));

        Self {
            days,
            since: parse_date(&input.since),
            labels: normalize_labels(input.labels.iter().map(String::as_str)),
            group: input.group,
        }
    }

    pub fn from_record(record: &SettingsRecord) -> Self {
        Self {
            days: Some(record.days.unwrap_or(DEFAULT_DAYS).clamp(MIN_DAYS, MAX_DAYS)),
            since: record.since.as_deref().and_then(parse_date),
            labels: record
                .labels
                .as_deref()
                .map(|labels| normalize_labels(labels.split(',')))
                .unwrap_or_default(),
            group: record.group.unwrap_or(false),
        }
    }

    pub fn to_record(&self) -> SettingsRecord {
        let params = self.to_params();
        SettingsRecord {
            days: params.days,
            since: (!params.since.is_empty()).then_some(params.since),
            labels: Some(params.labels),
            group: Some(params.group),
        }
    }

    pub fn to_params(&self) -> IssueQueryParams {
        IssueQueryParams {
            days: self.days,
            since: self.since.and_then(local_midnight_iso).unwrap_or_default(),
            labels: self.labels.join(","),
            group: self.group,
        }
    }

    /// Values to show in the form when it is first drawn.
    pub fn to_form(&self) -> FormInput {
        FormInput {
            labels: self.labels.clone(),
            days: self.days.map(|days| days.to_string()).unwrap_or_default(),
            since: self
                .since
                .map(|date| date.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
            group: self.group,
        }
    }
}

impl IssueQueryParams {
    /// Start of the fetch window: the explicit `since` timestamp, otherwise
    /// `now` minus `days` (3 when absent).
    pub fn window_start(&self, now: DateTime<Utc>) -> Result<DateTime<Utc>, TriageError> {
        if !self.since.is_empty() {
            return DateTime::parse_from_rfc3339(&self.since)
                .map(|since| since.with_timezone(&Utc))
                .map_err(|_| TriageError::InvalidTimestamp(self.since.clone()));
        }

        let days = self.days.unwrap_or(DEFAULT_DAYS);
        now.checked_sub_signed(Duration::days(i64::from(days)))
            .ok_or_else(|| TriageError::InvalidTimestamp(format!("{} days before {}", days, now)))
    }

    pub fn label_list(&self) -> Vec<String> {
        normalize_labels(self.labels.split(','))
    }
}

/// Accepts `YYYY-MM-DD` or a full RFC 3339 timestamp.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .or_else(|| {
            DateTime::parse_from_rfc3339(value)
                .ok()
                .map(|since| since.date_naive())
        })
}

fn local_midnight_iso(date: NaiveDate) -> Option<String> {
    let midnight = date.and_hms_opt(0, 0, 0)?;
    Local
        .from_local_datetime(&midnight)
        .earliest()
        .map(|since| since.to_rfc3339_opts(SecondsFormat::Millis, false))
}

fn normalize_labels<'a>(labels: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut normalized: Vec<String> = Vec::new();
    for label in labels.map(str::trim).filter(|label| !label.is_empty()) {
        if !normalized.iter().any(|existing| existing == label) {
            normalized.push(label.to_string());
        }
    }
    normalized
}
