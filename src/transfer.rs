use crate::errors::ImportError;
use crate::models::{Hit, HitLog, ImportMode, ImportSummary};
use chrono::{NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportFile {
    pub username: String,
    pub hits: Vec<Hit>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settings: Option<Value>,
}

pub fn export_file(log: &HitLog) -> ExportFile {
    ExportFile {
        username: log.username.clone(),
        hits: log.hits.clone(),
        settings: log.settings.clone(),
    }
}

pub fn export_filename(username: &str, today: NaiveDate) -> String {
    let safe: String = username
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect();
    format!("hit-tracker-{safe}-{}.json", today.format("%Y-%m-%d"))
}

/// Parses and validates an uploaded export file.
///
/// Every hit needs a non-empty string id, a positive integer timestamp and a
/// real `YYYY-MM-DD` date, and ids must be unique within the file. The first
/// violation is reported.
pub fn parse_import(raw: &[u8]) -> Result<ExportFile, ImportError> {
    let value: Value =
        serde_json::from_slice(raw).map_err(|err| ImportError::Parse(err.to_string()))?;
    let Value::Object(mut fields) = value else {
        return Err(ImportError::Parse("expected a JSON object".to_string()));
    };

    let username = match fields.remove("username") {
        Some(Value::String(name)) if !name.trim().is_empty() => name,
        _ => return Err(ImportError::EmptyUsername),
    };
    let Some(Value::Array(raw_hits)) = fields.remove("hits") else {
        return Err(ImportError::MissingHits);
    };

    let mut seen = HashSet::with_capacity(raw_hits.len());
    let mut hits = Vec::with_capacity(raw_hits.len());
    for (index, raw_hit) in raw_hits.iter().enumerate() {
        let hit = parse_hit(raw_hit).map_err(|reason| ImportError::InvalidHit {
            index,
            reason: reason.to_string(),
        })?;
        if !seen.insert(hit.id.clone()) {
            return Err(ImportError::DuplicateId(hit.id));
        }
        hits.push(hit);
    }

    let settings = fields.remove("settings").filter(|value| !value.is_null());

    Ok(ExportFile {
        username,
        hits,
        settings,
    })
}

fn parse_hit(value: &Value) -> Result<Hit, &'static str> {
    let id = match value.get("id") {
        Some(Value::String(id)) if !id.is_empty() => id.clone(),
        _ => return Err("id must be a non-empty string"),
    };
    let timestamp = value
        .get("timestamp")
        .and_then(Value::as_i64)
        .filter(|timestamp| *timestamp > 0)
        .ok_or("timestamp must be a positive integer")?;
    if Utc.timestamp_millis_opt(timestamp).single().is_none() {
        return Err("timestamp out of range");
    }
    let date = value
        .get("date")
        .and_then(Value::as_str)
        .filter(|date| is_date_key(date))
        .ok_or("date must be a YYYY-MM-DD calendar date")?;

    Ok(Hit {
        id,
        timestamp,
        date: date.to_string(),
    })
}

pub fn is_date_key(value: &str) -> bool {
    let bytes = value.as_bytes();
    bytes.len() == 10
        && bytes[4] == b'-'
        && bytes[7] == b'-'
        && bytes
            .iter()
            .enumerate()
            .all(|(i, b)| i == 4 || i == 7 || b.is_ascii_digit())
        && NaiveDate::parse_from_str(value, "%Y-%m-%d").is_ok()
}

/// Folds an import into `log`. Merge keeps existing hits and appends the ones
/// with unseen ids; replace swaps the hit list wholesale.
pub fn apply_import(log: &mut HitLog, file: ExportFile, mode: ImportMode) -> ImportSummary {
    let imported = file.hits.len();
    let added = match mode {
        ImportMode::Merge => {
            let existing: HashSet<String> = log.hits.iter().map(|hit| hit.id.clone()).collect();
            let fresh: Vec<Hit> = file
                .hits
                .into_iter()
                .filter(|hit| !existing.contains(&hit.id))
                .collect();
            let added = fresh.len();
            log.hits.extend(fresh);
            log.hits.sort_by_key(|hit| hit.timestamp);
            added
        }
        ImportMode::Replace => {
            log.hits = file.hits;
            imported
        }
    };

    if file.settings.is_some() {
        log.settings = file.settings;
    }

    ImportSummary {
        mode,
        imported,
        added,
        total: log.hits.len(),
        timezone: None,
    }
}
