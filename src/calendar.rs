use crate::models::{CalendarDay, CalendarMonth, Hit};
use crate::stats::daily_counts;
use crate::timezone::date_key;
use chrono::{Datelike, NaiveDate};
use chrono_tz::Tz;

/// Month grid with Sunday-first leading blanks. `None` for an invalid month.
pub fn build_calendar(hits: &[Hit], tz: Tz, year: i32, month: u32) -> Option<CalendarMonth> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };
    let days_in_month = (next - first).num_days() as u32;

    let counts = daily_counts(hits, tz);
    let days: Vec<(NaiveDate, usize)> = first
        .iter_days()
        .take(days_in_month as usize)
        .map(|date| (date, counts.get(&date).copied().unwrap_or(0)))
        .collect();
    let max_count = days.iter().map(|(_, count)| *count).max().unwrap_or(0);

    let leading = first.weekday().num_days_from_sunday() as usize;
    let mut cells = Vec::with_capacity(leading + days.len());
    cells.resize(leading, None);
    cells.extend(days.into_iter().map(|(date, count)| {
        Some(CalendarDay {
            date: date_key(date),
            day: date.day(),
            count,
            intensity: intensity(count, max_count),
        })
    }));

    Some(CalendarMonth {
        year,
        month,
        max_count,
        cells,
    })
}

pub fn intensity(count: usize, max_count: usize) -> u8 {
    if count == 0 {
        return 0;
    }
    let ratio = count as f64 / max_count.max(1) as f64;
    if ratio < 0.25 {
        1
    } else if ratio < 0.5 {
        2
    } else if ratio < 0.75 {
        3
    } else {
        4
    }
}
