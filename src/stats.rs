use crate::models::{Hit, Statistics};
use crate::timezone::{date_key, local_date, local_datetime, local_midnight_ms};
use chrono::{Datelike, Duration, NaiveDate, Timelike};
use chrono_tz::Tz;
use std::collections::BTreeMap;

const DAY_MS: i64 = 24 * 60 * 60 * 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Streaks {
    pub current: u32,
    pub longest: u32,
}

pub fn build_stats(hits: &[Hit], tz: Tz, now_ms: i64) -> Statistics {
    let today = local_date(now_ms, tz);
    let daily = daily_counts(hits, tz);

    let week_start = local_midnight_ms(tz, week_start(today));
    let month_start = local_midnight_ms(tz, today.with_day(1).unwrap_or(today));

    let today_count = daily.get(&today).copied().unwrap_or(0);
    let this_week = hits.iter().filter(|hit| hit.timestamp >= week_start).count();
    let this_month = hits.iter().filter(|hit| hit.timestamp >= month_start).count();

    let mut dates: Vec<NaiveDate> = daily.keys().copied().collect();
    dates.reverse();
    let streaks = compute_streaks(&dates, today);

    let mut weekdays = [0usize; 7];
    let mut hours = [0usize; 24];
    for hit in hits {
        let local = local_datetime(hit.timestamp, tz);
        weekdays[local.weekday().num_days_from_sunday() as usize] += 1;
        hours[local.hour() as usize] += 1;
    }

    let (peak_day, peak_count) = daily
        .iter()
        .fold((None, 0), |best, (date, &count)| {
            if count > best.1 { (Some(*date), count) } else { best }
        });

    Statistics {
        total: hits.len(),
        today: today_count,
        this_week,
        this_month,
        current_streak: streaks.current,
        longest_streak: streaks.longest,
        average_per_day: average_per_day(hits, now_ms),
        most_active_weekday: busiest(&weekdays),
        most_active_hour: busiest(&hours),
        peak_day: peak_day.map(date_key),
        peak_count,
    }
}

/// Hits per local calendar day, bucketed live from timestamps.
pub fn daily_counts(hits: &[Hit], tz: Tz) -> BTreeMap<NaiveDate, usize> {
    let mut counts = BTreeMap::new();
    for hit in hits {
        *counts.entry(local_date(hit.timestamp, tz)).or_insert(0) += 1;
    }
    counts
}

/// `dates` must be sorted newest first without duplicates. Days after `today`
/// count towards the longest run but never start the current one.
pub fn compute_streaks(dates: &[NaiveDate], today: NaiveDate) -> Streaks {
    let mut longest = 0u32;
    let mut run = 0u32;
    let mut previous: Option<NaiveDate> = None;
    for &date in dates {
        run = match previous {
            Some(prev) if prev - date == Duration::days(1) => run + 1,
            _ => 1,
        };
        longest = longest.max(run);
        previous = Some(date);
    }

    let mut current = 0u32;
    let mut past = dates.iter().copied().skip_while(|date| *date > today);
    if let Some(latest) = past.next() {
        if latest == today || latest == today - Duration::days(1) {
            current = 1;
            let mut expected = latest - Duration::days(1);
            for date in past {
                if date != expected {
                    break;
                }
                current += 1;
                expected = date - Duration::days(1);
            }
        }
    }

    Streaks { current, longest }
}

fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.weekday().num_days_from_sunday()))
}

fn average_per_day(hits: &[Hit], now_ms: i64) -> f64 {
    let Some(first) = hits.iter().map(|hit| hit.timestamp).min() else {
        return 0.0;
    };
    let elapsed = now_ms - first;
    let days = if elapsed <= 0 {
        1
    } else {
        ((elapsed + DAY_MS - 1) / DAY_MS).max(1)
    };
    let average = hits.len() as f64 / days as f64;
    (average * 10.0).round() / 10.0
}

// Ties resolve to the lowest index.
fn busiest(counts: &[usize]) -> Option<u8> {
    let mut best: Option<(usize, usize)> = None;
    for (index, &count) in counts.iter().enumerate() {
        if count > 0 && best.is_none_or(|(_, top)| count > top) {
            best = Some((index, count));
        }
    }
    best.map(|(index, _)| index as u8)
}
