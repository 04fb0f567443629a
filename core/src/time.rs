use chrono::{Datelike, Days, Local, Months, NaiveDate, Weekday};
use anyhow::{anyhow, Result};

/// Turns a human date into the `D/M/YYYY` text stored as a deadline.
pub fn parse_deadline(input: &str) -> Result<String> {
    let today = Local::now().date_naive();
    parse_human_date(input, today).map(format_deadline)
}

/// `D/M/YYYY` without zero padding, e.g. `3/7/2025`.
pub fn format_deadline(date: NaiveDate) -> String {
    format!("{}/{}/{}", date.day(), date.month(), date.year())
}

pub fn parse_human_date(input: &str, today: NaiveDate) -> Result<NaiveDate> {
    let input = input.trim();

    // 1. Reserved keywords
    match input.to_lowercase().as_str() {
        "today" | "tod" => return Ok(today),
        "tomorrow" | "tom" => return add_days(today, 1),
        "eow" => {
            // End of week (Sunday)
            let days_to_sunday = 6 - today.weekday().num_days_from_monday();
            return add_days(today, u64::from(days_to_sunday));
        }
        "eom" => {
            return today
                .with_day(1)
                .and_then(|d| d.checked_add_months(Months::new(1)))
                .and_then(|d| d.pred_opt())
                .ok_or_else(|| anyhow!("Date out of range"));
        }
        _ => {}
    }

    // 2. Relative format (+Nd, +Nw, +Nm)
    if let Some(rest) = input.strip_prefix('+') {
        // The unit is the last char, which need not be ASCII.
        let (num_str, unit) = match rest.char_indices().last() {
            Some((at, _)) if at > 0 => rest.split_at(at),
            _ => return Err(anyhow!("Invalid relative format")),
        };
        let count: u32 = num_str.parse().map_err(|_| anyhow!("Invalid relative format"))?;

        return match unit {
            "d" => add_days(today, u64::from(count)),
            "w" => add_days(today, u64::from(count) * 7),
            // Clamps to the last day of a shorter month (Jan 31 + 1m -> Feb 28).
            "m" => today
                .checked_add_months(Months::new(count))
                .ok_or_else(|| anyhow!("Date out of range")),
            _ => Err(anyhow!("Unknown unit in relative time: {}", unit)),
        };
    }

    // 3. Weekday format (fri, 2:fri)
    if let Some((count, day_str)) = parse_weekday_token(input) {
        if let Ok(target_weekday) = parse_weekday_str(day_str) {
            let mut days_needed = target_weekday.num_days_from_sunday() as i64
                - today.weekday().num_days_from_sunday() as i64;
            if days_needed <= 0 {
                days_needed += 7;
            }
            // count = 1 means next X (e.g. next Friday). count = 2 means the one after that.
            let days_needed = (count - 1)
                .checked_mul(7)
                .and_then(|weeks| weeks.checked_add(days_needed))
                .and_then(|days| u64::try_from(days).ok())
                .ok_or_else(|| anyhow!("Date out of range"))?;

            return add_days(today, days_needed);
        }
    }

    // 4. Fallback to explicit dates
    if let Ok(d) = NaiveDate::parse_from_str(input, "%d/%m/%Y") {
        return Ok(d);
    }
    if let Ok(d) = NaiveDate::parse_from_str(input, "%Y-%m-%d") {
        return Ok(d);
    }

    Err(anyhow!("Could not parse date: {}", input))
}

fn add_days(date: NaiveDate, days: u64) -> Result<NaiveDate> {
    date.checked_add_days(Days::new(days))
        .ok_or_else(|| anyhow!("Date out of range"))
}

fn parse_weekday_token(input: &str) -> Option<(i64, &str)> {
    if input.contains(':') {
        let parts: Vec<&str> = input.split(':').collect();
        if parts.len() == 2 {
            if let Ok(count) = parts[0].parse::<i64>() {
                if count >= 1 {
                    return Some((count, parts[1]));
                }
            }
        }
    } else {
        // Just "fri" means 1:fri
        return Some((1, input));
    }
    None
}

fn parse_weekday_str(s: &str) -> Result<Weekday> {
    match s.to_lowercase().as_str() {
        "mon" | "monday" => Ok(Weekday::Mon),
        "tue" | "tuesday" => Ok(Weekday::Tue),
        "wed" | "wednesday" => Ok(Weekday::Wed),
        "thu" | "thursday" => Ok(Weekday::Thu),
        "fri" | "friday" => Ok(Weekday::Fri),
        "sat" | "saturday" => Ok(Weekday::Sat),
        "sun" | "sunday" => Ok(Weekday::Sun),
        _ => Err(anyhow!("Invalid weekday")),
    }
}
