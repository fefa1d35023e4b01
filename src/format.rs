use chrono::{DateTime, Utc};

/// Abbreviate a rating count: `999`, `1.0k`, `2.5k`.
pub fn format_count(count: u64) -> String {
    if count >= 1000 {
        format!("{:.1}k", count as f64 / 1000.0)
    } else {
        count.to_string()
    }
}

/// Average rating with one decimal; zero means the movie has no ratings yet.
pub fn format_rating(avg: f64) -> String {
    if avg == 0.0 || !avg.is_finite() {
        "N/A".to_string()
    } else {
        format!("{:.1}", avg)
    }
}

/// Share of `count` in `total`, one decimal.
pub fn format_percent(count: u64, total: u64) -> String {
    if total == 0 {
        return "0%".to_string();
    }
    format!("{:.1}%", percent(count, total))
}

pub fn percent(count: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        count as f64 * 100.0 / total as f64
    }
}

pub fn split_genres(genres: &str) -> Vec<&str> {
    genres
        .split('|')
        .map(str::trim)
        .filter(|g| !g.is_empty() && *g != "(no genres listed)")
        .collect()
}

/// Rating timestamps come as unix seconds; anything else is shown verbatim.
pub fn format_timestamp(raw: &str) -> String {
    raw.trim()
        .parse::<i64>()
        .ok()
        .and_then(|secs| DateTime::<Utc>::from_timestamp(secs, 0))
        .map(|dt| dt.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| raw.to_string())
}

/// Truncate to `max` characters, ending in "..." when cut.
pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let kept: String = text.chars().take(max.saturating_sub(3)).collect();
    format!("{}...", kept)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn count_below_thousand_is_verbatim() {
        assert_eq!(format_count(0), "0");
        assert_eq!(format_count(999), "999");
    }

    #[test]
    fn count_abbreviates_thousands() {
        assert_eq!(format_count(1000), "1.0k");
        assert_eq!(format_count(2500), "2.5k");
        assert_eq!(format_count(81_491), "81.5k");
    }

    #[test]
    fn rating_zero_is_not_available() {
        assert_eq!(format_rating(0.0), "N/A");
    }

    #[test]
    fn rating_one_decimal() {
        assert_eq!(format_rating(4.2), "4.2");
        assert_eq!(format_rating(3.9166), "3.9");
        assert_eq!(format_rating(5.0), "5.0");
    }

    #[test]
    fn percent_of_empty_total() {
        assert_eq!(format_percent(0, 0), "0%");
        assert_eq!(format_percent(5, 0), "0%");
    }

    #[test]
    fn percent_one_decimal() {
        assert_eq!(format_percent(17, 40), "42.5%");
        assert_eq!(format_percent(1, 3), "33.3%");
        assert_eq!(format_percent(40, 40), "100.0%");
    }

    #[test]
    fn genres_split_on_pipe() {
        assert_eq!(split_genres("Action|Sci-Fi"), vec!["Action", "Sci-Fi"]);
        assert!(split_genres("").is_empty());
        assert!(split_genres("(no genres listed)").is_empty());
    }

    #[test]
    fn timestamp_from_unix_seconds() {
        assert_eq!(format_timestamp("964982703"), "2000-07-30");
    }

    #[test]
    fn timestamp_passthrough_when_not_numeric() {
        assert_eq!(format_timestamp("2021-03-04 10:00"), "2021-03-04 10:00");
    }

    #[test]
    fn truncate_adds_ellipsis() {
        assert_eq!(truncate("The Shawshank Redemption", 10), "The Sha...");
        assert_eq!(truncate("Heat", 10), "Heat");
    }
}
