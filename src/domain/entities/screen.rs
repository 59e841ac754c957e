use chrono::NaiveDateTime;

use crate::domain::entities::query::SortSpec;
use crate::domain::entities::record::Record;
use crate::domain::entities::ticket::normalize_ticket;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterField {
    pub field: String,
    pub label: String,
    /// Fixed choices. Empty means the choices come from the loaded records.
    pub options: Vec<String>,
}

impl FilterField {
    fn fixed(field: &str, label: &str, options: &[&str]) -> Self {
        Self {
            field: field.to_string(),
            label: label.to_string(),
            options: options.iter().map(|option| option.to_string()).collect(),
        }
    }

    fn derived(field: &str, label: &str) -> Self {
        Self::fixed(field, label, &[])
    }
}

/// Static per-screen configuration handed to a list controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListConfig {
    pub search_fields: Vec<String>,
    pub filter_fields: Vec<FilterField>,
    pub date_field: String,
    pub default_sort: SortSpec,
    pub page_size: usize,
}

impl ListConfig {
    pub fn new(search_fields: &[&str], page_size: usize) -> Self {
        Self {
            search_fields: search_fields.iter().map(|f| f.to_string()).collect(),
            filter_fields: Vec::new(),
            date_field: "created_at".to_string(),
            default_sort: SortSpec::default(),
            page_size: page_size.max(1),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    pub field: &'static str,
    pub label: &'static str,
}

const fn column(field: &'static str, label: &'static str) -> Column {
    Column { field, label }
}

const TICKET_COLUMNS: [Column; 7] = [
    column("id", "ID"),
    column("title", "Title"),
    column("status", "Status"),
    column("priority", "Priority"),
    column("assignee", "Assignee"),
    column("company", "Company"),
    column("created_at", "Created"),
];

const ARTICLE_COLUMNS: [Column; 7] = [
    column("id", "ID"),
    column("title", "Title"),
    column("category", "Category"),
    column("author", "Author"),
    column("itil_process", "ITIL"),
    column("views", "Views"),
    column("created_at", "Created"),
];

pub const TICKET_STATUSES: [&str; 5] = ["new", "in-progress", "pending", "resolved", "closed"];
pub const TICKET_PRIORITIES: [&str; 4] = ["critical", "high", "medium", "low"];
pub const ITIL_PROCESSES: [&str; 4] = ["Incident", "Problem", "Change", "Service Request"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Screen {
    Tickets,
    Articles,
}

impl Screen {
    pub const ALL: [Screen; 2] = [Screen::Tickets, Screen::Articles];

    pub fn label(self) -> &'static str {
        match self {
            Screen::Tickets => "Tickets",
            Screen::Articles => "Knowledge Base",
        }
    }

    pub fn resource_path(self) -> &'static str {
        match self {
            Screen::Tickets => "/tickets",
            Screen::Articles => "/knowledge/articles",
        }
    }

    /// Key under which the backend wraps the list in its JSON body.
    pub fn wrapper_key(self) -> &'static str {
        match self {
            Screen::Tickets => "tickets",
            Screen::Articles => "articles",
        }
    }

    pub fn columns(self) -> &'static [Column] {
        match self {
            Screen::Tickets => &TICKET_COLUMNS,
            Screen::Articles => &ARTICLE_COLUMNS,
        }
    }

    /// Filters the backend also understands as query parameters.
    pub fn server_params(self) -> &'static [&'static str] {
        match self {
            Screen::Tickets => &["status", "priority"],
            Screen::Articles => &[],
        }
    }

    /// Field broken down in the summary line above the table.
    pub fn stat_field(self) -> &'static str {
        match self {
            Screen::Tickets => "status",
            Screen::Articles => "category",
        }
    }

    pub fn list_config(self, page_size: usize) -> ListConfig {
        match self {
            Screen::Tickets => ListConfig {
                filter_fields: vec![
                    FilterField::fixed("status", "Status", &TICKET_STATUSES),
                    FilterField::fixed("priority", "Priority", &TICKET_PRIORITIES),
                    FilterField::derived("assignee", "Assignee"),
                    FilterField::derived("company", "Company"),
                ],
                ..ListConfig::new(&["title"], page_size)
            },
            Screen::Articles => ListConfig {
                filter_fields: vec![
                    FilterField::derived("category", "Category"),
                    FilterField::fixed("itil_process", "ITIL process", &ITIL_PROCESSES),
                    FilterField::derived("author", "Author"),
                ],
                ..ListConfig::new(&["title", "summary", "tags"], page_size)
            },
        }
    }

    /// Maps backend rows onto the shape the screen renders.
    pub fn normalize(self, records: Vec<Record>, now: NaiveDateTime) -> Vec<Record> {
        match self {
            Screen::Tickets => records
                .into_iter()
                .map(|record| normalize_ticket(record, now))
                .collect(),
            Screen::Articles => records,
        }
    }

    pub fn from_resource(resource: &str) -> Option<Screen> {
        Screen::ALL
            .into_iter()
            .find(|screen| screen.resource_path() == resource)
    }
}
