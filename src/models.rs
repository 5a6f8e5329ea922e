use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hit {
    pub id: String,
    pub timestamp: i64,
    pub date: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HitLog {
    pub username: String,
    #[serde(default)]
    pub hits: Vec<Hit>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settings: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bucket_timezone: Option<String>,
}

impl HitLog {
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            hits: Vec::new(),
            settings: None,
            bucket_timezone: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImportMode {
    #[default]
    Merge,
    Replace,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportSummary {
    pub mode: ImportMode,
    pub imported: usize,
    pub added: usize,
    pub total: usize,
    pub timezone: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Statistics {
    pub total: usize,
    pub today: usize,
    pub this_week: usize,
    pub this_month: usize,
    pub current_streak: u32,
    pub longest_streak: u32,
    pub average_per_day: f64,
    pub most_active_weekday: Option<u8>,
    pub most_active_hour: Option<u8>,
    pub peak_day: Option<String>,
    pub peak_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarDay {
    pub date: String,
    pub day: u32,
    pub count: usize,
    pub intensity: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarMonth {
    pub year: i32,
    pub month: u32,
    pub max_count: usize,
    pub cells: Vec<Option<CalendarDay>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub number: usize,
    pub id: String,
    pub timestamp: i64,
    pub date: String,
    pub display: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecentLog {
    pub total: usize,
    pub entries: Vec<LogEntry>,
}

#[derive(Debug, Deserialize)]
pub struct TimezoneRequest {
    pub timezone: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SettingsResponse {
    pub timezone: String,
    pub display_name: String,
    pub offset_minutes: i32,
    pub locale: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TimezoneOption {
    pub id: String,
    pub display_name: String,
}
