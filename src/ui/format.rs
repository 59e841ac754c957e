use chrono::{NaiveDate, NaiveDateTime};

use crate::domain::entities::record::{FieldValue, Record};

pub fn format_time_ago(then: NaiveDateTime, now: NaiveDateTime) -> String {
    let minutes = (now - then).num_minutes();
    if minutes < 1 {
        return "Just now".to_string();
    }
    if minutes < 60 {
        return format!("{minutes}m ago");
    }
    let hours = minutes / 60;
    if hours < 24 {
        return format!("{hours}h ago");
    }
    format!("{}d ago", hours / 24)
}

/// Value of an `<input type="date">`; blank or malformed means no bound.
pub fn parse_date_input(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").ok()
}

/// Text shown in a table cell. Timestamps are relative to `now`.
pub fn display_cell(record: &Record, field: &str, now: NaiveDateTime) -> String {
    match record.get(field) {
        Some(FieldValue::Date(timestamp)) => format_time_ago(*timestamp, now),
        Some(value) => value.to_string(),
        None => String::new(),
    }
}

/// Background and text colour of a status badge.
pub fn status_badge_colors(status: &str) -> (&'static str, &'static str) {
    match status {
        "new" => ("#dbeafe", "#1e40af"),
        "in-progress" => ("#fef3c7", "#92400e"),
        "pending" => ("#ede9fe", "#5b21b6"),
        "resolved" => ("#dcfce7", "#166534"),
        "closed" => ("#e5e7eb", "#374151"),
        _ => ("#f3f4f6", "#4b5563"),
    }
}

pub fn priority_badge_colors(priority: &str) -> (&'static str, &'static str) {
    match priority {
        "critical" => ("#fee2e2", "#991b1b"),
        "high" => ("#ffedd5", "#9a3412"),
        "medium" => ("#fef9c3", "#854d0e"),
        "low" => ("#dcfce7", "#166534"),
        _ => ("#f3f4f6", "#4b5563"),
    }
}

/// Badge colours for fields rendered as badges; `None` for plain cells.
pub fn badge_colors(field: &str, value: &str) -> Option<(&'static str, &'static str)> {
    match field {
        "status" => Some(status_badge_colors(value)),
        "priority" => Some(priority_badge_colors(value)),
        _ => None,
    }
}

pub fn badge_style(background: &str, color: &str) -> String {
    format!(
        "display: inline-block; padding: 2px 8px; border-radius: 999px; font-size: 12px; background: {background}; color: {color};"
    )
}

pub fn root_container_style() -> &'static str {
    "height: 100vh; display: flex; flex-direction: column; overflow: hidden; padding: 0 12px; box-sizing: border-box; font-family: sans-serif;"
}

pub fn table_container_style() -> &'static str {
    "flex: 1; min-height: 0; overflow: auto; border: 1px solid #ddd; border-radius: 6px;"
}

pub fn table_header_cell_style() -> &'static str {
    "position: sticky; top: 0; z-index: 2; background: #f7f7f7; border-bottom: 1px solid #ddd; padding: 6px 8px; text-align: left; cursor: pointer; white-space: nowrap;"
}

pub fn table_cell_style(selected: bool) -> &'static str {
    if selected {
        "padding: 6px 8px; border-bottom: 1px solid #eee; background: #eef4ff;"
    } else {
        "padding: 6px 8px; border-bottom: 1px solid #eee;"
    }
}

/// Up to `width` page numbers centred on `current`, kept inside
/// `[1, total]`. Empty when there are no pages.
pub fn page_window(current: usize, total: usize, width: usize) -> Vec<usize> {
    if total == 0 || width == 0 {
        return Vec::new();
    }
    let width = width.min(total);
    let current = current.clamp(1, total);
    let start = current
        .saturating_sub(width / 2)
        .max(1)
        .min(total + 1 - width);
    (start..start + width).collect()
}
