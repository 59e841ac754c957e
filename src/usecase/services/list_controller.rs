use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet, HashSet};

use chrono::NaiveDate;
use tracing::{debug, warn};

use crate::domain::entities::query::{is_cleared_filter, PageState, Query, SortSpec};
use crate::domain::entities::record::{dedupe_by_id, FieldValue, Record, RecordId};
use crate::domain::entities::screen::ListConfig;
use crate::domain::entities::selection::SelectionSet;
use crate::domain::entities::ticket::{assign_ticket, assignee_of, is_open};

/// Predicates run in a fixed order: field equality, free text, date range.
/// A field the record does not carry never matches an active predicate.
pub fn matches_query(record: &Record, query: &Query, config: &ListConfig) -> bool {
    let fields_match = query.filters.iter().all(|(field, expected)| {
        record
            .get(field)
            .map(|value| value.matches(expected))
            .unwrap_or(false)
    });
    if !fields_match {
        return false;
    }

    if !query.search_term.is_empty() {
        let term = query.search_term.to_lowercase();
        let found = config.search_fields.iter().any(|field| {
            record
                .text(field)
                .map(|value| value.to_lowercase().contains(&term))
                .unwrap_or(false)
        });
        if !found {
            return false;
        }
    }

    if query.date_from.is_some() || query.date_to.is_some() {
        let Some(date) = record.get(&config.date_field).and_then(FieldValue::as_date) else {
            return false;
        };
        if query.date_from.is_some_and(|from| date < from) {
            return false;
        }
        if query.date_to.is_some_and(|to| date > to) {
            return false;
        }
    }

    true
}

pub fn filter_records<'a>(
    records: &'a [Record],
    query: &Query,
    config: &ListConfig,
) -> Vec<&'a Record> {
    records
        .iter()
        .filter(|record| matches_query(record, query, config))
        .collect()
}

/// Missing values order after present ones in either direction; two missing
/// values tie, so an unknown sort field leaves the input order untouched.
pub fn compare_records(a: &Record, b: &Record, sort: &SortSpec) -> Ordering {
    match (a.get(&sort.field), b.get(&sort.field)) {
        (Some(left), Some(right)) => sort.direction.apply(left.compare(right)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Stable, so equal keys keep their relative order.
pub fn sort_records(records: &mut [&Record], sort: &SortSpec) {
    records.sort_by(|a, b| compare_records(a, b, sort));
}

pub fn paginate<T: Copy>(items: &[T], page: &PageState) -> Vec<T> {
    items
        .iter()
        .skip(page.start_index())
        .take(page.page_size)
        .copied()
        .collect()
}

/// Client-side search, filter, sort, pagination and bulk selection over one
/// snapshot of records. Every derived value is recomputed from `records`,
/// `query`, `sort` and `page`.
#[derive(Debug, Clone, PartialEq)]
pub struct ListController {
    config: ListConfig,
    records: Vec<Record>,
    query: Query,
    sort: SortSpec,
    page: PageState,
    selection: SelectionSet,
}

impl ListController {
    pub fn new(config: ListConfig) -> Self {
        let sort = config.default_sort.clone();
        let page = PageState::new(config.page_size);
        Self {
            config,
            records: Vec::new(),
            query: Query::default(),
            sort,
            page,
            selection: SelectionSet::default(),
        }
    }

    pub fn with_records(config: ListConfig, records: Vec<Record>) -> Self {
        let mut controller = Self::new(config);
        controller.set_records(records);
        controller
    }

    pub fn config(&self) -> &ListConfig {
        &self.config
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn query(&self) -> &Query {
        &self.query
    }

    pub fn sort(&self) -> &SortSpec {
        &self.sort
    }

    pub fn page(&self) -> PageState {
        self.page
    }

    pub fn current_page(&self) -> usize {
        self.page.current_page
    }

    pub fn selection(&self) -> &SelectionSet {
        &self.selection
    }

    /// Replaces the source set wholesale. Repeated ids keep their first
    /// record. Selections of records that are gone are dropped; the page is
    /// clamped to the new page count.
    pub fn set_records(&mut self, records: Vec<Record>) {
        let (records, dropped) = dedupe_by_id(records);
        if dropped > 0 {
            warn!(dropped, "dropped records with a repeated id");
        }
        self.records = records;
        let known: HashSet<RecordId> = self.records.iter().map(Record::id).collect();
        self.selection.retain(|id| known.contains(&id));
        self.clamp_page();
        debug!(
            records = self.records.len(),
            selected = self.selection.len(),
            page = self.page.current_page,
            "list records replaced"
        );
    }

    pub fn set_search_term(&mut self, term: impl Into<String>) {
        self.query.search_term = term.into();
        self.reset_page();
    }

    pub fn set_filter(&mut self, field: &str, value: &str) {
        if is_cleared_filter(value) {
            self.query.filters.remove(field);
        } else {
            self.query
                .filters
                .insert(field.to_string(), value.to_string());
        }
        self.reset_page();
    }

    pub fn set_date_range(&mut self, from: Option<NaiveDate>, to: Option<NaiveDate>) {
        self.query.date_from = from;
        self.query.date_to = to;
        self.reset_page();
    }

    pub fn clear_filters(&mut self) {
        self.query = Query::default();
        self.reset_page();
    }

    pub fn set_sort(&mut self, field: &str) {
        self.sort = self.sort.toggled_for(field);
    }

    pub fn set_page_size(&mut self, page_size: usize) {
        self.page = PageState::new(page_size);
    }

    pub fn go_to_page(&mut self, requested: i64) {
        self.page.current_page = PageState::clamped(requested, self.total_pages());
    }

    pub fn next_page(&mut self) {
        self.go_to_page(self.page.current_page as i64 + 1);
    }

    pub fn prev_page(&mut self) {
        self.go_to_page(self.page.current_page as i64 - 1);
    }

    pub fn has_next(&self) -> bool {
        self.page.current_page < self.total_pages()
    }

    pub fn has_prev(&self) -> bool {
        self.page.current_page > 1
    }

    /// Filtered and sorted, before pagination.
    pub fn matching(&self) -> Vec<&Record> {
        let mut matched = filter_records(&self.records, &self.query, &self.config);
        sort_records(&mut matched, &self.sort);
        matched
    }

    pub fn match_count(&self) -> usize {
        self.records
            .iter()
            .filter(|record| matches_query(record, &self.query, &self.config))
            .count()
    }

    pub fn total_pages(&self) -> usize {
        self.page.total_pages(self.match_count())
    }

    pub fn visible_page(&self) -> Vec<&Record> {
        paginate(&self.matching(), &self.page)
    }

    pub fn visible_ids(&self) -> Vec<RecordId> {
        self.visible_page().iter().map(|record| record.id()).collect()
    }

    /// Ids outside the source set are ignored. Returns whether `id` is
    /// selected afterwards.
    pub fn toggle_select(&mut self, id: RecordId) -> bool {
        if !self.records.iter().any(|record| record.id() == id) {
            return false;
        }
        self.selection.toggle(id)
    }

    pub fn all_visible_selected(&self) -> bool {
        let visible = self.visible_ids();
        !visible.is_empty() && visible.iter().all(|id| self.selection.contains(*id))
    }

    /// Selects every id on the current page, or unselects them when they
    /// are all selected already. Selections on other pages are kept.
    pub fn toggle_select_all_visible(&mut self) {
        let visible = self.visible_ids();
        if visible.is_empty() {
            return;
        }
        if visible.iter().all(|id| self.selection.contains(*id)) {
            for id in visible {
                self.selection.remove(id);
            }
        } else {
            for id in visible {
                self.selection.insert(id);
            }
        }
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    /// Selected records in source order, whether or not they match the
    /// current query.
    pub fn selected_records(&self) -> Vec<&Record> {
        self.records
            .iter()
            .filter(|record| self.selection.contains(record.id()))
            .collect()
    }

    /// Drops records from the source set. Returns how many were removed.
    pub fn remove_records(&mut self, ids: &[RecordId]) -> usize {
        let doomed: HashSet<RecordId> = ids.iter().copied().collect();
        let before = self.records.len();
        self.records.retain(|record| !doomed.contains(&record.id()));
        for id in ids {
            self.selection.remove(*id);
        }
        self.clamp_page();
        before - self.records.len()
    }

    /// Assigns the listed records to `assignee`, or unassigns them when it
    /// is blank or `Unassigned`. Returns how many records were updated.
    pub fn reassign(&mut self, ids: &[RecordId], assignee: &str) -> usize {
        let targets: HashSet<RecordId> = ids.iter().copied().collect();
        let mut updated = 0;
        for record in self
            .records
            .iter_mut()
            .filter(|record| targets.contains(&record.id()))
        {
            assign_ticket(record, assignee);
            updated += 1;
        }
        self.clamp_page();
        debug!(updated, assignee, "records reassigned");
        updated
    }

    /// Open records of the whole source set grouped by assignee, each group
    /// in source order.
    pub fn open_by_assignee(&self) -> BTreeMap<String, Vec<RecordId>> {
        let mut groups: BTreeMap<String, Vec<RecordId>> = BTreeMap::new();
        for record in self.records.iter().filter(|record| is_open(record)) {
            groups.entry(assignee_of(record)).or_default().push(record.id());
        }
        groups
    }

    pub fn active_filter_count(&self) -> usize {
        self.query.active_count()
    }

    /// Sorted distinct display values of `field` across the whole source
    /// set, for filter dropdowns.
    pub fn distinct_values(&self, field: &str) -> Vec<String> {
        self.records
            .iter()
            .filter_map(|record| record.text(field))
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Options offered for a configured filter field: its fixed choices, or
    /// the distinct values present when it has none.
    pub fn filter_options(&self, field: &str) -> Vec<String> {
        match self
            .config
            .filter_fields
            .iter()
            .find(|filter| filter.field == field)
        {
            Some(filter) if !filter.options.is_empty() => filter.options.clone(),
            _ => self.distinct_values(field),
        }
    }

    /// Per-value counts of `field` over the records matching the query.
    pub fn count_by(&self, field: &str) -> BTreeMap<String, usize> {
        let mut counts = BTreeMap::new();
        for record in filter_records(&self.records, &self.query, &self.config) {
            if let Some(value) = record.text(field) {
                *counts.entry(value).or_insert(0) += 1;
            }
        }
        counts
    }

    fn reset_page(&mut self) {
        self.page.current_page = 1;
    }

    fn clamp_page(&mut self) {
        self.page.current_page =
            PageState::clamped(self.page.current_page as i64, self.total_pages());
    }
}
