use std::cmp::Ordering;
use std::collections::BTreeMap;

use chrono::NaiveDate;

/// Filter value that means "no restriction on this field".
pub const ALL: &str = "all";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    pub search_term: String,
    pub filters: BTreeMap<String, String>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
}

impl Query {
    pub fn is_empty(&self) -> bool {
        self.active_count() == 0
    }

    /// Counts the search term, each field filter and each date bound.
    pub fn active_count(&self) -> usize {
        usize::from(!self.search_term.is_empty())
            + self.filters.len()
            + usize::from(self.date_from.is_some())
            + usize::from(self.date_to.is_some())
    }

    pub fn filter_value(&self, field: &str) -> &str {
        self.filters.get(field).map(String::as_str).unwrap_or(ALL)
    }
}

pub fn is_cleared_filter(value: &str) -> bool {
    value.is_empty() || value == ALL
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn toggled(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }

    pub fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    }

    pub fn marker(self) -> &'static str {
        match self {
            SortDirection::Asc => "▲",
            SortDirection::Desc => "▼",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortSpec {
    pub field: String,
    pub direction: SortDirection,
}

impl SortSpec {
    pub fn new(field: &str, direction: SortDirection) -> Self {
        Self {
            field: field.to_string(),
            direction,
        }
    }

    /// Clicking the active column flips its direction; any other column
    /// starts ascending.
    pub fn toggled_for(&self, field: &str) -> SortSpec {
        if self.field == field {
            SortSpec::new(field, self.direction.toggled())
        } else {
            SortSpec::new(field, SortDirection::Asc)
        }
    }
}

impl Default for SortSpec {
    fn default() -> Self {
        SortSpec::new("created_at", SortDirection::Desc)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageState {
    pub current_page: usize,
    pub page_size: usize,
}

impl PageState {
    pub fn new(page_size: usize) -> Self {
        Self {
            current_page: 1,
            page_size: page_size.max(1),
        }
    }

    pub fn total_pages(&self, match_count: usize) -> usize {
        match_count.div_ceil(self.page_size)
    }

    pub fn start_index(&self) -> usize {
        (self.current_page - 1).saturating_mul(self.page_size)
    }

    /// Clamps a requested page into `[1, max(total_pages, 1)]`.
    pub fn clamped(requested: i64, total_pages: usize) -> usize {
        let last = total_pages.max(1) as i64;
        requested.clamp(1, last) as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn active_count_counts_each_bound() {
        let mut query = Query::default();
        assert!(query.is_empty());

        query.search_term = "vpn".to_string();
        query.filters.insert("status".to_string(), "new".to_string());
        query.date_from = NaiveDate::from_ymd_opt(2026, 1, 1);
        query.date_to = NaiveDate::from_ymd_opt(2026, 1, 31);

        assert_eq!(query.active_count(), 4);
        assert_eq!(query.filter_value("status"), "new");
        assert_eq!(query.filter_value("priority"), ALL);
    }

    #[test]
    fn other_column_starts_ascending() {
        let sort = SortSpec::default().toggled_for("title");

        assert_eq!(sort, SortSpec::new("title", SortDirection::Asc));
        assert_eq!(sort.toggled_for("title").direction, SortDirection::Desc);
        assert_eq!(SortDirection::Desc.apply(Ordering::Less), Ordering::Greater);
    }

    #[test]
    fn start_index_follows_the_page() {
        let page = PageState {
            current_page: 3,
            page_size: 12,
        };

        assert_eq!(page.start_index(), 24);
        assert_eq!(page.total_pages(25), 3);
    }
}
