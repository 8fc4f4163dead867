//! Index page rendering
//!
//! Renders the greeting page from a resolved request context. Page text
//! stays in English; only the `lang` attribute and the time format follow
//! the resolved locale.

use chrono::{DateTime, Datelike, Timelike, Utc};

use crate::context::RequestContext;
use crate::i18n::find_timezone;

/// Abbreviated French month names, as in `19 oct. 2026`
const FR_MONTHS: [&str; 12] = [
    "janv.", "févr.", "mars", "avr.", "mai", "juin", "juil.", "août", "sept.", "oct.", "nov.",
    "déc.",
];

/// Format a timestamp in the given zone, using the locale's medium layout
///
/// `en` gives `Oct 19, 2026, 2:05:03 PM`, `fr` gives `19 oct. 2026, 14:05:03`
/// and any other locale the numeric `19/10/2026 14:05:03`. An unknown zone
/// renders in UTC; callers pass resolved zones, so this only matters for
/// direct use.
pub fn format_datetime(time: DateTime<Utc>, timezone: &str, locale: &str) -> String {
    let tz = find_timezone(timezone).unwrap_or(chrono_tz::UTC);
    let local = time.with_timezone(&tz);
    match locale {
        "en" => local.format("%b %-d, %Y, %-I:%M:%S %p").to_string(),
        "fr" => format!(
            "{} {} {}, {:02}:{:02}:{:02}",
            local.day(),
            FR_MONTHS[local.month0() as usize],
            local.year(),
            local.hour(),
            local.minute(),
            local.second(),
        ),
        _ => local.format("%d/%m/%Y %H:%M:%S").to_string(),
    }
}

/// Render the index page
pub fn render_index(ctx: &RequestContext<'_>) -> String {
    let login_status = ctx.user.map_or_else(
        || "You are not logged in.".to_string(),
        |user| format!("You are logged in as {}.", escape_html(&user.name)),
    );
    let current_time = format_datetime(ctx.time, &ctx.timezone, &ctx.locale);

    format!(
        r#"<!DOCTYPE html>
<html lang="{locale}">
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <title>Welcome</title>
</head>
<body>
    <h1>Hello world!</h1>
    <p id="login">{login_status}</p>
    <p id="locale">Locale: {locale}</p>
    <p id="timezone">Timezone: {timezone}</p>
    <p id="time">The current time is {current_time}.</p>
</body>
</html>
"#,
        locale = escape_html(&ctx.locale),
        timezone = escape_html(&ctx.timezone),
        current_time = escape_html(&current_time),
    )
}

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
