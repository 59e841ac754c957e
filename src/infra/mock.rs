use chrono::{Duration, NaiveDateTime};

use crate::domain::entities::record::Record;
use crate::domain::entities::screen::{Screen, ITIL_PROCESSES, TICKET_PRIORITIES, TICKET_STATUSES};

const TICKET_CATEGORIES: [&str; 5] = ["Hardware", "Software", "Network", "Email", "Security"];
const ARTICLE_CATEGORIES: [&str; 5] = ["Windows", "Network", "Office 365", "Security", "Hardware"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MockCounts {
    pub tickets: usize,
    pub articles: usize,
}

impl Default for MockCounts {
    fn default() -> Self {
        Self {
            tickets: 12,
            articles: 15,
        }
    }
}

/// Deterministic stand-in for a random draw in `[0, modulus)`.
fn spread(index: usize, salt: u64, modulus: u64) -> u64 {
    let mixed = (index as u64 + 1)
        .wrapping_mul(2_654_435_761)
        .wrapping_add(salt.wrapping_mul(40_503));
    (mixed ^ (mixed >> 13)) % modulus.max(1)
}

fn pick<'a>(items: &[&'a str], index: usize, salt: u64) -> &'a str {
    items[spread(index, salt, items.len() as u64) as usize]
}

fn minutes_ago(now: NaiveDateTime, minutes: i64) -> NaiveDateTime {
    now - Duration::minutes(minutes)
}

struct DemoTicket {
    title: &'static str,
    description: &'static str,
    status: &'static str,
    priority: &'static str,
    assignee: &'static str,
    submitter: &'static str,
    company: &'static str,
    created_minutes_ago: i64,
    updated_minutes_ago: i64,
    sla_remaining: &'static str,
    time_logged: &'static str,
    comments: i64,
    attachments: i64,
}

const DEMO_TICKETS: [DemoTicket; 8] = [
    DemoTicket {
        title: "Email server not responding",
        description: "Exchange server is not accepting connections from Outlook clients",
        status: "new",
        priority: "critical",
        assignee: "Unassigned",
        submitter: "Alice Johnson",
        company: "Acme Corp",
        created_minutes_ago: 15,
        updated_minutes_ago: 5,
        sla_remaining: "2h 15m",
        time_logged: "0m",
        comments: 0,
        attachments: 2,
    },
    DemoTicket {
        title: "User cannot access shared drive",
        description: "Permission denied error when accessing \\\\fileserver\\shared",
        status: "in-progress",
        priority: "high",
        assignee: "John Doe",
        submitter: "Bob Williams",
        company: "Tech Solutions Inc",
        created_minutes_ago: 60,
        updated_minutes_ago: 10,
        sla_remaining: "5h 30m",
        time_logged: "45m",
        comments: 3,
        attachments: 1,
    },
    DemoTicket {
        title: "Printer queue stuck",
        description: "Print jobs are not completing on HP LaserJet Pro 400",
        status: "resolved",
        priority: "medium",
        assignee: "Jane Smith",
        submitter: "Carol Davis",
        company: "Acme Corp",
        created_minutes_ago: 120,
        updated_minutes_ago: 20,
        sla_remaining: "Met",
        time_logged: "30m",
        comments: 5,
        attachments: 0,
    },
    DemoTicket {
        title: "Request for new software installation",
        description: "Need Adobe Creative Cloud installed on marketing workstation",
        status: "new",
        priority: "low",
        assignee: "Unassigned",
        submitter: "David Martinez",
        company: "Creative Agency",
        created_minutes_ago: 180,
        updated_minutes_ago: 180,
        sla_remaining: "1d 8h",
        time_logged: "0m",
        comments: 0,
        attachments: 0,
    },
    DemoTicket {
        title: "VPN connection intermittent",
        description: "Remote user experiencing disconnections every 15-20 minutes",
        status: "in-progress",
        priority: "high",
        assignee: "John Doe",
        submitter: "Eva Garcia",
        company: "Remote Services LLC",
        created_minutes_ago: 240,
        updated_minutes_ago: 30,
        sla_remaining: "4h 20m",
        time_logged: "1h 15m",
        comments: 8,
        attachments: 3,
    },
    DemoTicket {
        title: "Password reset request",
        description: "User locked out after too many failed login attempts",
        status: "resolved",
        priority: "medium",
        assignee: "Jane Smith",
        submitter: "Frank Brown",
        company: "Tech Solutions Inc",
        created_minutes_ago: 300,
        updated_minutes_ago: 60,
        sla_remaining: "Met",
        time_logged: "15m",
        comments: 2,
        attachments: 0,
    },
    DemoTicket {
        title: "Server backup failed",
        description: "Nightly backup job terminated with error code 0x80070002",
        status: "new",
        priority: "critical",
        assignee: "Unassigned",
        submitter: "System Monitor",
        company: "Internal",
        created_minutes_ago: 360,
        updated_minutes_ago: 360,
        sla_remaining: "1h 45m",
        time_logged: "0m",
        comments: 0,
        attachments: 1,
    },
    DemoTicket {
        title: "Laptop running slow",
        description: "Employee reports significant performance degradation over past week",
        status: "in-progress",
        priority: "medium",
        assignee: "John Doe",
        submitter: "Grace Lee",
        company: "Acme Corp",
        created_minutes_ago: 480,
        updated_minutes_ago: 120,
        sla_remaining: "6h 10m",
        time_logged: "2h 30m",
        comments: 6,
        attachments: 2,
    },
];

pub const FIRST_DEMO_TICKET_ID: i64 = 1001;

/// The hand-written tickets shown on the ticket screen without a backend.
pub fn demo_tickets(now: NaiveDateTime) -> Vec<Record> {
    DEMO_TICKETS
        .iter()
        .enumerate()
        .map(|(idx, demo)| {
            Record::new(FIRST_DEMO_TICKET_ID + idx as i64)
                .with("title", demo.title)
                .with("description", demo.description)
                .with("status", demo.status)
                .with("priority", demo.priority)
                .with("assignee", demo.assignee)
                .with("submitter", demo.submitter)
                .with("requester", demo.submitter)
                .with("company", demo.company)
                .with("created_at", minutes_ago(now, demo.created_minutes_ago))
                .with("updated_at", minutes_ago(now, demo.updated_minutes_ago))
                .with("sla_remaining", demo.sla_remaining)
                .with("time_logged", demo.time_logged)
                .with("comments_count", demo.comments)
                .with("attachments_count", demo.attachments)
        })
        .collect()
}

pub fn generate_tickets(count: usize, first_id: i64, now: NaiveDateTime) -> Vec<Record> {
    (0..count)
        .map(|idx| {
            let number = first_id + idx as i64;
            Record::new(number)
                .with("title", format!("Sample Ticket {number}"))
                .with(
                    "description",
                    format!("This is a sample ticket description for ticket {number}"),
                )
                .with("status", pick(&TICKET_STATUSES, idx, 1))
                .with("priority", pick(&TICKET_PRIORITIES, idx, 2))
                .with("category", pick(&TICKET_CATEGORIES, idx, 3))
                .with("assignee", format!("Tech {}", spread(idx, 4, 5) + 1))
                .with("requester", format!("User {}", spread(idx, 5, 20) + 1))
                .with("company", format!("Company {}", spread(idx, 6, 10) + 1))
                .with(
                    "created_at",
                    minutes_ago(now, spread(idx, 7, 30 * 24 * 60) as i64),
                )
                .with(
                    "updated_at",
                    minutes_ago(now, spread(idx, 8, 7 * 24 * 60) as i64),
                )
        })
        .collect()
}

pub fn generate_articles(count: usize, now: NaiveDateTime) -> Vec<Record> {
    (0..count)
        .map(|idx| {
            let number = idx as i64 + 1;
            Record::new(number)
                .with("title", format!("Knowledge Article {number}"))
                .with(
                    "content",
                    format!(
                        "## Overview\n\nThis is sample content for knowledge article {number}.\n\n## Steps\n\n1. First step\n2. Second step\n3. Third step"
                    ),
                )
                .with("summary", format!("Summary for article {number}"))
                .with("category", pick(&ARTICLE_CATEGORIES, idx, 11))
                .with("author", format!("Author {}", spread(idx, 12, 5) + 1))
                .with("itil_process", pick(&ITIL_PROCESSES, idx, 13))
                .with("tags", "sample,demo,test")
                .with(
                    "created_at",
                    minutes_ago(now, spread(idx, 14, 60 * 24 * 60) as i64),
                )
                .with(
                    "updated_at",
                    minutes_ago(now, spread(idx, 15, 30 * 24 * 60) as i64),
                )
                .with("views", spread(idx, 16, 1000) as i64)
                .with("is_favorite", (spread(idx, 17, 10) >= 8).to_string())
        })
        .collect()
}

/// Records a screen shows when no live data is available.
pub fn mock_records(screen: Screen, counts: MockCounts, now: NaiveDateTime) -> Vec<Record> {
    match screen {
        Screen::Tickets => {
            let mut records = demo_tickets(now);
            let next_id = FIRST_DEMO_TICKET_ID + records.len() as i64;
            records.extend(generate_tickets(counts.tickets, next_id, now));
            records
        }
        Screen::Articles => generate_articles(counts.articles, now),
    }
}
