use crate::locale::DisplayLocale;
use crate::models::{Hit, LogEntry, RecentLog};
use crate::timezone::{bucket_date_in, format_display};
use chrono_tz::Tz;

pub const DEFAULT_LIMIT: usize = 50;

/// Newest hits first, numbered so the oldest hit is #1.
pub fn recent_hits(hits: &[Hit], tz: Tz, locale: DisplayLocale, limit: usize) -> RecentLog {
    let mut sorted: Vec<&Hit> = hits.iter().collect();
    sorted.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));

    let total = sorted.len();
    let entries = sorted
        .into_iter()
        .take(limit)
        .enumerate()
        .map(|(index, hit)| LogEntry {
            number: total - index,
            id: hit.id.clone(),
            timestamp: hit.timestamp,
            date: bucket_date_in(hit.timestamp, tz),
            display: format_display(hit.timestamp, tz, locale),
        })
        .collect();

    RecentLog { total, entries }
}
