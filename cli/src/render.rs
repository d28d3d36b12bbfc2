//! Table rendering for directory pages and action history.

use std::collections::BTreeSet;

use chaos_business::{ActionHistoryEntry, DirectoryRow};
use chrono::{DateTime, Local, Utc};
use tabled::settings::Style;
use tabled::{Table, Tabled};

#[derive(Tabled)]
struct UserRow {
    #[tabled(rename = "")]
    marker: &'static str,
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Email")]
    email: String,
    #[tabled(rename = "Status")]
    status: &'static str,
    #[tabled(rename = "Verified")]
    verified: &'static str,
    #[tabled(rename = "Last login")]
    last_login: String,
    #[tabled(rename = "Registered")]
    registered: String,
}

#[derive(Tabled)]
struct HistoryRow {
    #[tabled(rename = "Action")]
    action: String,
    #[tabled(rename = "When")]
    when: String,
    #[tabled(rename = "Affected")]
    affected: String,
}

fn format_time(time: &DateTime<Utc>) -> String {
    time.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string()
}

/// "Name, Position at Company", leaving out whatever is missing.
pub fn display_name(row: &DirectoryRow) -> String {
    let name = row
        .full_name
        .as_deref()
        .filter(|n| !n.trim().is_empty())
        .unwrap_or("N/A");
    let work = match (row.position.as_deref(), row.company.as_deref()) {
        (Some(position), Some(company)) => format!("{position} at {company}"),
        (Some(only), None) | (None, Some(only)) => only.to_owned(),
        (None, None) => String::new(),
    };
    if work.is_empty() {
        name.to_owned()
    } else {
        format!("{name}, {work}")
    }
}

/// Directory page as a table; selected rows are marked with `*`.
pub fn users_table(rows: &[DirectoryRow], selection: &BTreeSet<String>) -> String {
    let rows: Vec<UserRow> = rows
        .iter()
        .map(|row| UserRow {
            marker: if selection.contains(&row.id) { "*" } else { "" },
            id: row.id.clone(),
            name: display_name(row),
            email: row.email.clone(),
            status: if row.is_blocked { "Blocked" } else { "Active" },
            verified: if row.is_email_confirmed { "yes" } else { "no" },
            last_login: row
                .last_login_time
                .as_ref()
                .map(format_time)
                .unwrap_or_else(|| "never".to_owned()),
            registered: format_time(&row.registration_time),
        })
        .collect();

    let mut table = Table::new(rows);
    table.with(Style::rounded());
    table.to_string()
}

pub fn history_table(entries: &[ActionHistoryEntry]) -> String {
    let rows: Vec<HistoryRow> = entries
        .iter()
        .map(|entry| HistoryRow {
            action: entry.action.label().to_owned(),
            when: format_time(&entry.timestamp),
            affected: if entry.affected_entities.is_empty() {
                "-".to_owned()
            } else {
                entry.affected_entities.join(", ")
            },
        })
        .collect();

    let mut table = Table::new(rows);
    table.with(Style::rounded());
    table.to_string()
}

/// Number of pages for `total` rows, at least one.
pub fn page_count(total: u64, page_size: u32) -> u64 {
    total.div_ceil(u64::from(page_size.max(1))).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chaos_business::{ActionKind, parse_timestamp};

    fn row(id: &str) -> DirectoryRow {
        DirectoryRow {
            id: id.to_owned(),
            email: format!("{id}@x.com"),
            full_name: Some("Ann".to_owned()),
            is_blocked: true,
            is_email_confirmed: false,
            last_login_time: None,
            registration_time: parse_timestamp("2024-01-01T00:00:00Z").expect("valid timestamp"),
            position: Some("Engineer".to_owned()),
            company: Some("Acme".to_owned()),
        }
    }

    #[test]
    fn test_display_name() {
        assert_eq!(display_name(&row("u1")), "Ann, Engineer at Acme");

        let mut bare = row("u2");
        bare.full_name = None;
        bare.position = None;
        assert_eq!(display_name(&bare), "N/A, Acme");

        bare.company = None;
        assert_eq!(display_name(&bare), "N/A");
    }

    #[test]
    fn test_users_table_marks_selection() {
        let selection = BTreeSet::from(["u1".to_owned()]);
        let table = users_table(&[row("u1"), row("u2")], &selection);

        assert!(table.contains("u1@x.com"));
        assert!(table.contains("Blocked"));
        assert!(table.contains("never"));
        let marked = table.lines().filter(|line| line.contains('*')).count();
        assert_eq!(marked, 1);
    }

    #[test]
    fn test_history_table() {
        let entries = vec![ActionHistoryEntry {
            action: ActionKind::Block,
            timestamp: parse_timestamp("2024-01-01T00:00:00Z").expect("valid timestamp"),
            affected_entities: vec!["u2".to_owned(), "u3".to_owned()],
        }];

        let table = history_table(&entries);
        assert!(table.contains("Block"));
        assert!(table.contains("u2, u3"));
    }

    #[test]
    fn test_page_count() {
        assert_eq!(page_count(0, 10), 1);
        assert_eq!(page_count(10, 10), 1);
        assert_eq!(page_count(11, 10), 2);
        assert_eq!(page_count(5, 0), 5);
    }
}
