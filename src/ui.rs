use crate::locale::DisplayLocale;
use crate::models::{CalendarMonth, RecentLog, Statistics};

pub struct PageView<'a> {
    pub username: &'a str,
    pub timezone: String,
    pub locale: DisplayLocale,
    pub stats: &'a Statistics,
    pub calendar: Option<&'a CalendarMonth>,
    pub recent: &'a RecentLog,
}

pub fn render_index(view: &PageView<'_>) -> String {
    let user = escape(view.username);
    INDEX_HTML
        .replace("{{USER}}", &user)
        .replace("{{TIMEZONE}}", &escape(&view.timezone))
        .replace("{{TOTAL}}", &view.stats.total.to_string())
        .replace("{{STATS}}", &render_stats(view.stats, view.locale))
        .replace("{{CALENDAR}}", &render_calendar(view.calendar))
        .replace("{{LOGS}}", &render_logs(view.recent))
}

fn render_stats(stats: &Statistics, locale: DisplayLocale) -> String {
    let cards = [
        ("Total", stats.total.to_string()),
        ("Today", stats.today.to_string()),
        ("This week", stats.this_week.to_string()),
        ("This month", stats.this_month.to_string()),
        ("Avg per day", format!("{:.1}", stats.average_per_day)),
        ("Current streak", stats.current_streak.to_string()),
        ("Longest streak", stats.longest_streak.to_string()),
        ("Peak day", stats.peak_count.to_string()),
    ];

    let mut html = String::from(r#"<section class="panel">"#);
    for (label, value) in cards {
        html.push_str(&format!(
            r#"<div class="stat"><span class="label">{label}</span><span class="value">{value}</span></div>"#
        ));
    }
    html.push_str("</section>");

    let weekday = stats
        .most_active_weekday
        .map(|index| locale.weekday_name(index).to_string())
        .unwrap_or_else(|| "N/A".to_string());
    let hour = stats
        .most_active_hour
        .map(|hour| format!("{hour}:00 - {}:00", hour + 1))
        .unwrap_or_else(|| "N/A".to_string());

    html.push_str(&format!(
        r#"<ul class="insights"><li>Most active on <strong>{weekday}</strong></li><li>Peak time: <strong>{hour}</strong></li>"#
    ));
    if let Some(day) = &stats.peak_day {
        html.push_str(&format!(
            "<li>Record day: <strong>{} hits</strong> on {day}</li>",
            stats.peak_count
        ));
    }
    html.push_str("</ul>");
    html
}

fn render_calendar(calendar: Option<&CalendarMonth>) -> String {
    let Some(calendar) = calendar else {
        return String::new();
    };

    let mut html = format!(
        r#"<section class="calendar"><h2>{}-{:02}</h2><div class="grid">"#,
        calendar.year, calendar.month
    );
    for weekday in ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"] {
        html.push_str(&format!(r#"<div class="weekday">{weekday}</div>"#));
    }
    for cell in &calendar.cells {
        match cell {
            None => html.push_str(r#"<div class="day empty"></div>"#),
            Some(day) => {
                html.push_str(&format!(
                    r#"<div class="day intensity-{}" title="{}: {}"><span>{}</span></div>"#,
                    day.intensity, day.date, day.count, day.day
                ));
            }
        }
    }
    html.push_str("</div></section>");
    html
}

fn render_logs(recent: &RecentLog) -> String {
    let mut html = String::from(r#"<section class="logs"><h2>Log"#);
    if recent.total > recent.entries.len() {
        html.push_str(&format!(
            " <small>(showing last {} of {})</small>",
            recent.entries.len(),
            recent.total
        ));
    }
    html.push_str("</h2><ol>");
    for entry in &recent.entries {
        html.push_str(&format!(
            r#"<li><span class="number">#{}</span> {}</li>"#,
            entry.number,
            escape(&entry.display)
        ));
    }
    html.push_str("</ol></section>");
    html
}

fn escape(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Hit Tracker</title>
  <style>
    :root {
      --bg: #f8f3e6;
      --ink: #2b2a28;
      --accent: #ff6b4a;
      --accent-2: #2f4858;
      --card: rgba(255, 255, 255, 0.86);
    }

    body {
      margin: 0;
      min-height: 100vh;
      background: var(--bg);
      color: var(--ink);
      font-family: "Trebuchet MS", sans-serif;
      display: grid;
      place-items: center;
      padding: 32px 18px 48px;
    }

    .app {
      width: min(860px, 100%);
      background: var(--card);
      border-radius: 28px;
      padding: 36px;
      display: grid;
      gap: 28px;
    }

    .subtitle { margin: 0; color: #5f5c57; }

    .panel {
      display: grid;
      grid-template-columns: repeat(auto-fit, minmax(160px, 1fr));
      gap: 16px;
    }

    .stat {
      background: white;
      border-radius: 18px;
      padding: 18px;
      display: grid;
      gap: 8px;
    }

    .stat .label {
      font-size: 0.85rem;
      text-transform: uppercase;
      letter-spacing: 0.12em;
      color: #8b857d;
    }

    .stat .value { font-size: 1.7rem; font-weight: 600; color: var(--accent-2); }

    button {
      border: none;
      border-radius: 999px;
      padding: 16px 28px;
      font-size: 1.1rem;
      font-weight: 600;
      cursor: pointer;
      background: var(--accent);
      color: white;
    }

    .grid { display: grid; grid-template-columns: repeat(7, 1fr); gap: 4px; }
    .weekday { text-align: center; font-size: 0.8rem; color: #8b857d; }
    .day { aspect-ratio: 1; border-radius: 8px; display: grid; place-items: center; }
    .day.empty { background: transparent; }
    .intensity-0 { background: #eee7da; }
    .intensity-1 { background: #ffd9cf; }
    .intensity-2 { background: #ffb19f; }
    .intensity-3 { background: #ff8a6f; }
    .intensity-4 { background: var(--accent); color: white; }

    .logs ol { list-style: none; padding: 0; margin: 0; display: grid; gap: 6px; }
    .logs .number { color: #8b857d; margin-right: 8px; }
  </style>
</head>
<body>
  <main class="app">
    <header>
      <h1>Hit Tracker</h1>
      <p class="subtitle">{{USER}} &middot; {{TIMEZONE}} &middot; {{TOTAL}} hits</p>
    </header>
    <form method="post" action="/users/{{USER}}/hit">
      <button type="submit">Hit</button>
    </form>
    {{STATS}}
    {{CALENDAR}}
    {{LOGS}}
  </main>
</body>
</html>
"#;
