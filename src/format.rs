use chrono::{DateTime, Utc};
use unicode_width::UnicodeWidthChar;

/// Human-friendly age of a review: "Just now", "5h ago", "3d ago", or a date.
pub fn relative_time(created_at: Option<DateTime<Utc>>, now: DateTime<Utc>) -> String {
    let Some(created_at) = created_at else {
        return "Recently".to_string();
    };
    let hours = (now - created_at).num_hours();
    if hours < 1 {
        "Just now".to_string()
    } else if hours < 24 {
        format!("{}h ago", hours)
    } else if hours < 168 {
        format!("{}d ago", hours / 24)
    } else {
        created_at.format("%Y-%m-%d").to_string()
    }
}

/// Up to two uppercase initials, e.g. "Sarah Johnson" -> "SJ".
pub fn initials(name: &str) -> String {
    name.split_whitespace()
        .filter_map(|word| word.chars().next())
        .flat_map(char::to_uppercase)
        .take(2)
        .collect()
}

pub fn review_count(n: usize) -> String {
    format!("{} review{}", n, if n == 1 { "" } else { "s" })
}

/// Truncate to `max_width` terminal columns, adding "…" if truncated.
pub fn truncate_str(s: &str, max_width: usize) -> String {
    let width: usize = s.chars().map(|c| c.width().unwrap_or(0)).sum();
    if width <= max_width {
        return s.to_string();
    }
    let budget = max_width.saturating_sub(1);
    let mut used = 0;
    let mut result = String::new();
    for c in s.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > budget {
            break;
        }
        used += w;
        result.push(c);
    }
    result.push('…');
    result
}
