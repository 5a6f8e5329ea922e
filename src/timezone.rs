use crate::locale::DisplayLocale;
use chrono::{DateTime, Datelike, Duration, NaiveDate, Offset, TimeZone, Timelike, Utc};
use chrono_tz::Tz;
use tracing::warn;

const COMMON_TIMEZONES: [&str; 28] = [
    "UTC",
    "America/New_York",
    "America/Chicago",
    "America/Denver",
    "America/Los_Angeles",
    "America/Anchorage",
    "Pacific/Honolulu",
    "America/Toronto",
    "America/Mexico_City",
    "America/Sao_Paulo",
    "Europe/London",
    "Europe/Paris",
    "Europe/Berlin",
    "Europe/Rome",
    "Europe/Madrid",
    "Europe/Moscow",
    "Africa/Cairo",
    "Africa/Johannesburg",
    "Asia/Dubai",
    "Asia/Kolkata",
    "Asia/Shanghai",
    "Asia/Tokyo",
    "Asia/Seoul",
    "Asia/Hong_Kong",
    "Asia/Singapore",
    "Australia/Sydney",
    "Australia/Melbourne",
    "Pacific/Auckland",
];

pub fn common_timezones() -> &'static [&'static str] {
    &COMMON_TIMEZONES
}

pub fn parse_timezone(name: &str) -> Option<Tz> {
    name.trim().parse::<Tz>().ok()
}

/// Unknown zone names degrade to UTC.
pub fn resolve_timezone(name: &str) -> Tz {
    match parse_timezone(name) {
        Some(tz) => tz,
        None => {
            warn!("unknown timezone {name:?}, falling back to UTC");
            Tz::UTC
        }
    }
}

pub fn instant(timestamp_ms: i64) -> DateTime<Utc> {
    Utc.timestamp_millis_opt(timestamp_ms)
        .single()
        .unwrap_or_default()
}

pub fn local_datetime(timestamp_ms: i64, tz: Tz) -> DateTime<Tz> {
    instant(timestamp_ms).with_timezone(&tz)
}

pub fn local_date(timestamp_ms: i64, tz: Tz) -> NaiveDate {
    local_datetime(timestamp_ms, tz).date_naive()
}

pub fn date_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

pub fn bucket_date_in(timestamp_ms: i64, tz: Tz) -> String {
    date_key(local_date(timestamp_ms, tz))
}

/// The calendar day a wall clock in `timezone` shows at `timestamp_ms`.
pub fn bucket_date(timestamp_ms: i64, timezone: &str) -> String {
    bucket_date_in(timestamp_ms, resolve_timezone(timezone))
}

/// First instant of `date` in `tz`. Zones that skip midnight on a DST switch
/// start the day at the first wall-clock time that exists.
pub fn local_midnight_ms(tz: Tz, date: NaiveDate) -> i64 {
    let midnight = date.and_time(chrono::NaiveTime::MIN);
    for step in 0..=12 {
        let candidate = midnight + Duration::minutes(15 * step);
        if let Some(dt) = tz.from_local_datetime(&candidate).earliest() {
            return dt.timestamp_millis();
        }
    }
    midnight.and_utc().timestamp_millis()
}

pub fn offset_minutes(tz: Tz, now_ms: i64) -> i32 {
    let utc = instant(now_ms).naive_utc();
    tz.offset_from_utc_datetime(&utc).fix().local_minus_utc() / 60
}

pub fn format_offset(offset_minutes: i32) -> String {
    if offset_minutes == 0 {
        return "UTC+0".to_string();
    }
    let sign = if offset_minutes > 0 { '+' } else { '-' };
    let hours = offset_minutes.abs() / 60;
    let minutes = offset_minutes.abs() % 60;
    if minutes == 0 {
        format!("UTC{sign}{hours}")
    } else {
        format!("UTC{sign}{hours}:{minutes:02}")
    }
}

pub fn display_name(tz: Tz, now_ms: i64) -> String {
    format!(
        "{} ({})",
        tz.name().replace('_', " "),
        format_offset(offset_minutes(tz, now_ms))
    )
}

pub fn format_display(timestamp_ms: i64, tz: Tz, locale: DisplayLocale) -> String {
    let local = local_datetime(timestamp_ms, tz);
    match locale {
        DisplayLocale::EnUs => local.format("%b %-d, %Y, %I:%M:%S %p").to_string(),
        DisplayLocale::ZhCn => local.format("%Y年%-m月%-d日 %H:%M:%S").to_string(),
        DisplayLocale::ZhTw => {
            let (pm, hour) = local.hour12();
            format!(
                "{}年{}月{}日 {}{:02}:{:02}:{:02}",
                local.year(),
                local.month(),
                local.day(),
                if pm { "下午" } else { "上午" },
                hour,
                local.minute(),
                local.second()
            )
        }
    }
}
