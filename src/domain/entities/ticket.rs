use chrono::NaiveDateTime;

use crate::domain::entities::record::{FieldValue, Record};

pub const UNASSIGNED: &str = "Unassigned";
pub const ASSIGNEE_FIELD: &str = "assignee";
pub const STATUS_FIELD: &str = "status";

/// Renames backend ticket columns to the ones the list shows and derives
/// the SLA and time-logged labels.
pub fn normalize_ticket(mut record: Record, now: NaiveDateTime) -> Record {
    let submitter = record
        .text("submitter_id")
        .or_else(|| record.text("submitter"))
        .unwrap_or_else(|| "Unknown".to_string());
    if record.get("requester").is_none() {
        record.set("requester", submitter.clone());
    }
    record.set("submitter", submitter);

    if record.get(ASSIGNEE_FIELD).is_none() {
        let assignee = record
            .text("assigned_to")
            .unwrap_or_else(|| UNASSIGNED.to_string());
        record.set(ASSIGNEE_FIELD, assignee);
    }

    if record.get("company").is_none() {
        let company = record
            .text("company_id")
            .unwrap_or_else(|| "Unknown".to_string());
        record.set("company", company);
    }

    let sla = match record.get("sla_due_date") {
        Some(FieldValue::Date(due)) => sla_remaining(*due, now),
        _ => "N/A".to_string(),
    };
    if record.get("sla_remaining").is_none() {
        record.set("sla_remaining", sla);
    }

    let minutes = match record.get("time_spent_minutes") {
        Some(FieldValue::Number(minutes)) => minutes.max(0.0) as i64,
        _ => 0,
    };
    if record.get("time_logged").is_none() {
        record.set("time_logged", format_minutes(minutes));
    }

    record
}

/// `"Overdue"` once the due date has passed, whole days and hours beyond a
/// day, hours and minutes otherwise.
pub fn sla_remaining(due: NaiveDateTime, now: NaiveDateTime) -> String {
    let remaining = due - now;
    if remaining.num_milliseconds() < 0 {
        return "Overdue".to_string();
    }
    let hours = remaining.num_hours();
    let minutes = remaining.num_minutes() % 60;
    if hours > 24 {
        format!("{}d {}h", hours / 24, hours % 24)
    } else {
        format!("{hours}h {minutes}m")
    }
}

pub fn format_minutes(minutes: i64) -> String {
    if minutes < 60 {
        return format!("{minutes}m");
    }
    format!("{}h {}m", minutes / 60, minutes % 60)
}

/// Resolved and closed tickets are off the board.
pub fn is_open(record: &Record) -> bool {
    !matches!(
        record.text(STATUS_FIELD).as_deref(),
        Some("resolved") | Some("closed")
    )
}

/// Owner shown on the board; blank or missing counts as unassigned.
pub fn assignee_of(record: &Record) -> String {
    record
        .text(ASSIGNEE_FIELD)
        .filter(|name| !name.trim().is_empty())
        .unwrap_or_else(|| UNASSIGNED.to_string())
}

/// Handing a ticket to someone puts it `in-progress`; a blank name or
/// `Unassigned` returns it to the queue as `new`.
pub fn assign_ticket(record: &mut Record, assignee: &str) {
    let assignee = assignee.trim();
    if assignee.is_empty() || assignee == UNASSIGNED {
        record.set(ASSIGNEE_FIELD, UNASSIGNED);
        record.set(STATUS_FIELD, "new");
    } else {
        record.set(ASSIGNEE_FIELD, assignee);
        record.set(STATUS_FIELD, "in-progress");
    }
}
