use crate::clock::Clock;
use crate::errors::StorageError;
use crate::migrate::{self, UserRecord, decode_record};
use crate::models::{Hit, HitLog, ImportMode, ImportSummary};
use crate::storage::KeyValueStore;
use crate::timezone::{bucket_date_in, parse_timezone, resolve_timezone};
use crate::transfer::{ExportFile, apply_import};
use chrono_tz::Tz;
use serde_json::Value;
use std::sync::Arc;
use tracing::{error, info};
use uuid::Uuid;

pub const DATA_KEY: &str = "hit-tracker-data";
pub const TIMEZONE_KEY: &str = "hit-tracker-timezone";

/// Per-owner hit logs kept in one shared record, bucketed under the active
/// timezone.
pub struct EventStore {
    kv: Box<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,
    timezone: Tz,
}

impl EventStore {
    pub fn open(kv: Box<dyn KeyValueStore>, clock: Arc<dyn Clock>, default_timezone: &str) -> Self {
        let timezone = match kv.get(TIMEZONE_KEY) {
            Ok(Some(saved)) => resolve_timezone(&saved),
            Ok(None) => resolve_timezone(default_timezone),
            Err(err) => {
                error!("failed to read saved timezone: {err}");
                resolve_timezone(default_timezone)
            }
        };
        info!("active timezone is {}", timezone.name());

        Self {
            kv,
            clock,
            timezone,
        }
    }

    pub fn timezone(&self) -> Tz {
        self.timezone
    }

    pub fn now_ms(&self) -> i64 {
        self.clock.now_ms()
    }

    /// Stored logs keep their old dates until their next load.
    pub fn set_timezone(&mut self, tz: Tz) -> Result<(), StorageError> {
        self.kv.set(TIMEZONE_KEY, tz.name())?;
        if tz != self.timezone {
            info!("active timezone changed from {} to {}", self.timezone.name(), tz.name());
        }
        self.timezone = tz;
        Ok(())
    }

    /// Unknown owners and unreadable data both come back as `None`. Dates
    /// bucketed under another timezone are corrected and written back.
    pub fn load(&mut self, owner: &str) -> Option<HitLog> {
        let (mut record, upgraded) = match self.read_record() {
            Ok(loaded) => loaded,
            Err(err) => {
                error!("failed to load data for {owner}: {err}");
                return None;
            }
        };

        let log = record.users.get_mut(owner)?;
        let rebucketed = migrate::rebucket(log, self.timezone);
        let log = log.clone();

        if rebucketed || upgraded {
            match self.write_record(&record) {
                Ok(()) => info!(
                    "migrated data for {owner} to {} (record upgraded: {upgraded})",
                    self.timezone.name()
                ),
                Err(err) => error!("failed to persist migrated data for {owner}: {err}"),
            }
        }

        Some(log)
    }

    pub fn load_or_empty(&mut self, owner: &str) -> HitLog {
        self.load(owner).unwrap_or_else(|| HitLog::new(owner))
    }

    /// Replaces only `log.username`'s entry. Refuses to overwrite a record it
    /// cannot parse.
    pub fn save(&mut self, log: &HitLog) -> Result<(), StorageError> {
        let (mut record, _) = self.read_record()?;
        let mut log = log.clone();
        migrate::rebucket(&mut log, self.timezone);
        record.users.insert(log.username.clone(), log);
        self.write_record(&record)
    }

    pub fn append(&mut self, owner: &str) -> Result<Hit, StorageError> {
        let (mut record, _) = self.read_record().inspect_err(|err| {
            error!("failed to append hit for {owner}: {err}");
        })?;

        let timestamp = self.clock.now_ms();
        let hit = Hit {
            id: Uuid::new_v4().to_string(),
            timestamp,
            date: bucket_date_in(timestamp, self.timezone),
        };

        let log = record
            .users
            .entry(owner.to_string())
            .or_insert_with(|| HitLog::new(owner));
        migrate::rebucket(log, self.timezone);
        log.hits.push(hit.clone());

        self.write_record(&record)?;
        Ok(hit)
    }

    /// A known `settings.timezone` in the file becomes the active timezone,
    /// but only once the imported hits are written.
    pub fn import(
        &mut self,
        owner: &str,
        file: ExportFile,
        mode: ImportMode,
    ) -> Result<ImportSummary, StorageError> {
        let (mut record, _) = self.read_record()?;

        let imported_zone = file
            .settings
            .as_ref()
            .and_then(|settings| settings.get("timezone"))
            .and_then(Value::as_str)
            .and_then(parse_timezone);

        let log = record
            .users
            .entry(owner.to_string())
            .or_insert_with(|| HitLog::new(owner));
        let mut summary = apply_import(log, file, mode);
        migrate::rebucket(log, imported_zone.unwrap_or(self.timezone));
        self.write_record(&record)?;

        if let Some(tz) = imported_zone {
            self.set_timezone(tz)?;
        }

        summary.timezone = imported_zone.map(|tz| tz.name().to_string());
        info!(
            "imported {} hits for {owner} ({:?}, {} added, {} total)",
            summary.imported, summary.mode, summary.added, summary.total
        );
        Ok(summary)
    }

    fn read_record(&self) -> Result<(UserRecord, bool), StorageError> {
        match self.kv.get(DATA_KEY)? {
            Some(raw) => Ok(decode_record(&raw)?),
            None => Ok((UserRecord::default(), false)),
        }
    }

    fn write_record(&mut self, record: &UserRecord) -> Result<(), StorageError> {
        let payload = serde_json::to_string(record)?;
        self.kv.set(DATA_KEY, &payload)
    }
}
