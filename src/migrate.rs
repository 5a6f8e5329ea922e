//! Versioned upgrade of the shared user record and re-bucketing of cached
//! hit dates when the active timezone changes.

use crate::models::HitLog;
use crate::timezone::bucket_date_in;
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const RECORD_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRecord {
    pub version: u32,
    pub users: BTreeMap<String, HitLog>,
}

impl Default for UserRecord {
    fn default() -> Self {
        Self {
            version: RECORD_VERSION,
            users: BTreeMap::new(),
        }
    }
}

/// Returns the record and whether it had to be upgraded to `RECORD_VERSION`.
/// A bare `username -> log` map predates the versioned layout. Newer versions
/// are refused so they are never rewritten in the older layout.
pub fn decode_record(raw: &str) -> Result<(UserRecord, bool), serde_json::Error> {
    let value: serde_json::Value = serde_json::from_str(raw)?;
    if value.get("version").is_some_and(serde_json::Value::is_u64) {
        let record: UserRecord = serde_json::from_value(value)?;
        if record.version > RECORD_VERSION {
            return Err(serde::de::Error::custom(format!(
                "record version {} is newer than supported version {RECORD_VERSION}",
                record.version
            )));
        }
        let upgraded = record.version < RECORD_VERSION;
        return Ok((
            UserRecord {
                version: RECORD_VERSION,
                users: record.users,
            },
            upgraded,
        ));
    }

    let users: BTreeMap<String, HitLog> = serde_json::from_value(value)?;
    Ok((
        UserRecord {
            version: RECORD_VERSION,
            users,
        },
        true,
    ))
}

/// Recomputes every cached date under `tz`. Returns true when anything changed.
pub fn rebucket(log: &mut HitLog, tz: Tz) -> bool {
    let mut changed = false;
    for hit in &mut log.hits {
        let date = bucket_date_in(hit.timestamp, tz);
        if hit.date != date {
            hit.date = date;
            changed = true;
        }
    }

    let zone = tz.name();
    if log.bucket_timezone.as_deref() != Some(zone) {
        log.bucket_timezone = Some(zone.to_string());
        changed = true;
    }
    changed
}
