use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use chrono::Utc;
use dioxus::prelude::*;
use rfd::{FileDialog, MessageButtons, MessageDialog, MessageDialogResult, MessageLevel};
use tracing::warn;

use crate::default_db_path;
use crate::domain::entities::query::{Query, ALL};
use crate::domain::entities::record::{Record, RecordId};
use crate::domain::entities::screen::Screen;
use crate::infra::config::AppConfig;
use crate::infra::export::csv::export_records_csv;
use crate::infra::fallback::build_fallback;
use crate::infra::http::client::HttpRecordSource;
use crate::infra::sqlite::repo::{SnapshotSource, SqliteSnapshotRepo};
use crate::platform::desktop::blocking::run_blocking;
use crate::ui::format::{
    badge_colors, badge_style, display_cell, page_window, parse_date_input,
    root_container_style, table_cell_style, table_container_style, table_header_cell_style,
};
use crate::ui::state::app_state::{controller_for, AppState};
use crate::usecase::ports::snapshot::SnapshotRepository;
use crate::usecase::ports::source::{FetchRequest, RecordSource};
use crate::usecase::services::import_service::ImportService;
use crate::usecase::services::record_service::RecordService;

const PAGE_LINKS: usize = 5;

/// Long-lived collaborators of the list screens, built once per window.
pub struct AppServices {
    pub records: RecordService,
    pub imports: ImportService,
}

impl AppServices {
    pub fn build(config: &AppConfig, db_path: PathBuf) -> Result<Self> {
        let repo = SqliteSnapshotRepo {
            db_path: db_path.clone(),
        };
        let snapshots: Option<Arc<dyn SnapshotRepository>> = match repo.init() {
            Ok(()) => Some(Arc::new(repo)),
            Err(err) => {
                warn!(error = %err, "snapshot cache disabled");
                None
            }
        };

        let source: Arc<dyn RecordSource> = if config.offline {
            Arc::new(SnapshotSource {
                repo: SqliteSnapshotRepo { db_path },
            })
        } else {
            Arc::new(HttpRecordSource::new(
                &config.api_base_url,
                config.api_token.as_deref(),
                config.request_timeout(),
            )?)
        };
        let authenticated = config.offline || config.authenticated();
        let mut records = RecordService::new(source, authenticated);
        if let Some(fallback) =
            build_fallback(config.fallback, snapshots.clone(), config.mock_counts())
        {
            records = records.with_fallback(fallback);
        }
        if let Some(snapshots) = snapshots.filter(|_| !config.offline) {
            records = records.with_snapshots(snapshots);
        }

        Ok(Self {
            records,
            imports: ImportService::default(),
        })
    }
}

/// Request for a screen carrying the active filters the backend
/// understands.
pub fn fetch_request(screen: Screen, query: &Query) -> FetchRequest {
    screen
        .server_params()
        .iter()
        .fold(FetchRequest::for_screen(screen), |request, param| {
            request.with_param(param, query.filter_value(param))
        })
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DropdownId {
    Filter(usize),
}

#[derive(Clone, Debug, PartialEq)]
struct DropdownOption {
    value: String,
    label: String,
}

fn dropdown_label(options: &[DropdownOption], selected: Option<&str>) -> String {
    selected
        .and_then(|value| options.iter().find(|opt| opt.value == value))
        .map(|opt| opt.label.clone())
        .unwrap_or_else(|| "All".to_string())
}

#[component]
fn DropdownSelect(
    id: DropdownId,
    label: String,
    options: Vec<DropdownOption>,
    selected: Option<String>,
    mut open_dropdown: Signal<Option<DropdownId>>,
    mut dropdown_pos: Signal<Option<(f64, f64)>>,
    on_select: EventHandler<String>,
) -> Element {
    let is_open = open_dropdown() == Some(id);
    let selected_label = dropdown_label(&options, selected.as_deref());
    let (left, top) = dropdown_pos().unwrap_or((0.0, 0.0));

    rsx! {
        div {
            style: "position: relative; display: inline-flex; align-items: center; gap: 6px;",
            span { "{label}" }
            button {
                style: "border: 1px solid #bbb; background: #fff; padding: 4px 10px; border-radius: 6px; cursor: pointer;",
                onclick: move |event| {
                    event.stop_propagation();
                    if open_dropdown() == Some(id) {
                        open_dropdown.set(None);
                        return;
                    }
                    let point = event.client_coordinates();
                    dropdown_pos.set(Some((point.x, point.y + 24.0)));
                    open_dropdown.set(Some(id));
                },
                "{selected_label}"
            }
        }

        if is_open {
            div {
                style: "position: fixed; left: {left}px; top: {top}px; min-width: 200px; max-height: 320px; overflow-y: auto; background: #fff; border: 1px solid #bbb; border-radius: 8px; box-shadow: 0 10px 24px rgba(0,0,0,0.15); z-index: 1200;",
                onclick: move |event| event.stop_propagation(),
                {options.iter().map(|opt| {
                    let value = opt.value.clone();
                    let label = opt.label.clone();
                    let is_selected = selected.as_deref() == Some(value.as_str());
                    let background = if is_selected { "#eef4ff" } else { "transparent" };
                    rsx!(
                        div {
                            style: "padding: 8px 10px; cursor: pointer; background: {background};",
                            onclick: move |_| {
                                on_select.call(value.clone());
                                open_dropdown.set(None);
                            },
                            "{label}"
                        }
                    )
                })}
            }
        }
    }
}

#[component]
pub fn App() -> Element {
    let config = use_context::<AppConfig>();

    let AppState {
        mut screen,
        mut controller,
        mut reload_nonce,
        mut busy,
        mut status,
        mut origin,
        mut warning,
        mut snapshots,
        mut search_input,
        mut date_from_input,
        mut date_to_input,
        mut assignee_input,
        mut open_dropdown,
        dropdown_pos,
    } = AppState::new(&config);

    let config_for_build = config.clone();
    let services = use_hook(move || {
        default_db_path()
            .and_then(|db_path| AppServices::build(&config_for_build, db_path))
            .map(Arc::new)
            .map_err(|err| format!("{err:#}"))
    });
    let services = match services {
        Ok(services) => services,
        Err(err) => {
            return rsx! {
                div {
                    p { "Unable to start: {err}" }
                }
            };
        }
    };

    let services_for_load = services.clone();
    use_effect(move || {
        let current_screen = screen();
        let _ = reload_nonce();
        let request = fetch_request(current_screen, controller.peek().query());
        *busy.write() = true;
        *status.write() = format!("Loading {}", current_screen.label());

        let now = Utc::now().naive_utc();
        let load_result = run_blocking(|| services_for_load.records.load(&request, now));
        match load_result {
            Ok(outcome) => {
                let count = outcome.records.len();
                controller.write().set_records(outcome.records);
                *origin.write() = Some(outcome.origin);
                *warning.write() = outcome.warning;
                *status.write() = format!("Loaded {count} {}", current_screen.label());
            }
            Err(err) => {
                controller.write().set_records(Vec::new());
                *origin.write() = None;
                *warning.write() = None;
                *status.write() = format!("Failed to load {}: {err}", current_screen.label());
            }
        }
        let history = run_blocking(|| {
            services_for_load
                .records
                .snapshot_history(current_screen.resource_path())
        });
        snapshots.set(history);
        *busy.write() = false;
    });

    let current_screen = screen();
    let view = controller.read();
    let now = Utc::now().naive_utc();
    let columns = current_screen.columns();
    let visible: Vec<Record> = view.visible_page().into_iter().cloned().collect();
    let match_count = view.match_count();
    let total_records = view.records().len();
    let total_pages = view.total_pages();
    let current_page = view.current_page();
    let has_prev = view.has_prev();
    let has_next = view.has_next();
    let sort = view.sort().clone();
    let active_filters = view.active_filter_count();
    let selected_count = view.selection().len();
    let selected_ids: Vec<RecordId> = view.selection().iter().collect();
    let ids_for_remove = selected_ids.clone();
    let ids_for_assign = selected_ids.clone();
    let ids_for_unassign = selected_ids.clone();
    let all_selected = view.all_visible_selected();
    let stats = view.count_by(current_screen.stat_field());
    let open_board = if current_screen == Screen::Tickets {
        view.open_by_assignee()
    } else {
        Default::default()
    };
    let filter_dropdowns: Vec<(usize, String, String, Vec<DropdownOption>, String)> = view
        .config()
        .filter_fields
        .iter()
        .enumerate()
        .map(|(idx, filter)| {
            let options = std::iter::once(DropdownOption {
                value: ALL.to_string(),
                label: "All".to_string(),
            })
            .chain(
                view.filter_options(&filter.field)
                    .into_iter()
                    .map(|value| DropdownOption {
                        label: value.clone(),
                        value,
                    }),
            )
            .collect::<Vec<_>>();
            (
                idx,
                filter.field.clone(),
                filter.label.clone(),
                options,
                view.query().filter_value(&filter.field).to_string(),
            )
        })
        .collect();
    drop(view);

    let stats_line = stats
        .iter()
        .map(|(value, count)| format!("{value}: {count}"))
        .collect::<Vec<_>>()
        .join(" · ");
    let origin_label = origin().map(|o| o.label()).unwrap_or("none");
    let snapshot_count = snapshots().len();
    let last_snapshot = snapshots()
        .first()
        .map(|meta| format!(" (last {} via {})", meta.taken_at, meta.origin))
        .unwrap_or_default();
    let board_line = open_board
        .iter()
        .map(|(assignee, ids)| format!("{assignee}: {}", ids.len()))
        .collect::<Vec<_>>()
        .join(" · ");
    let show_assign = current_screen == Screen::Tickets;
    let column_span = columns.len() + 1;
    let warning_text = warning().unwrap_or_default();
    let pages = page_window(current_page, total_pages, PAGE_LINKS);
    let page_label = if total_pages == 0 {
        "No pages".to_string()
    } else {
        format!("Page {current_page} of {total_pages}")
    };

    let services_for_import = services.clone();
    let config_for_tabs = config.clone();

    rsx! {
        div {
            style: "{root_container_style()}",
            onclick: move |_| open_dropdown.set(None),
            nav {
                style: "display: flex; gap: 12px; align-items: center; flex-wrap: wrap; padding: 8px 0;",
                {Screen::ALL.into_iter().map(|tab| {
                    let config = config_for_tabs.clone();
                    let active = tab == current_screen;
                    let weight = if active { "bold" } else { "normal" };
                    let border = if active { "#2563eb" } else { "#bbb" };
                    rsx!(
                        button {
                            style: "font-weight: {weight}; border: 1px solid {border}; background: #fff; padding: 4px 12px; border-radius: 6px; cursor: pointer;",
                            disabled: busy(),
                            onclick: move |_| {
                                if screen() == tab {
                                    return;
                                }
                                controller.set(controller_for(tab, &config));
                                search_input.set(String::new());
                                date_from_input.set(String::new());
                                date_to_input.set(String::new());
                                screen.set(tab);
                            },
                            "{tab.label()}"
                        }
                    )
                })}
                button {
                    disabled: busy(),
                    onclick: move |_| {
                        *reload_nonce.write() += 1;
                    },
                    "Refresh"
                }
                button {
                    disabled: busy(),
                    onclick: move |_| {
                        if busy() {
                            return;
                        }
                        let Some(file_path) = FileDialog::new()
                            .add_filter("Excel", &["xlsx", "xls"])
                            .add_filter("CSV", &["csv"])
                            .add_filter("All files", &["*"])
                            .pick_file()
                        else {
                            return;
                        };
                        *busy.write() = true;
                        *status.write() = format!("Importing {}", file_path.display());
                        let import_result =
                            run_blocking(|| services_for_import.imports.import_file(&file_path));
                        match import_result {
                            Ok(records) => {
                                let request = FetchRequest::for_screen(screen());
                                run_blocking(|| {
                                    services_for_import.records.remember(&request, "import", &records)
                                });
                                let count = records.len();
                                controller.write().set_records(records);
                                *origin.write() = None;
                                *warning.write() = None;
                                *status.write() =
                                    format!("Imported {count} records from {}", file_path.display());
                            }
                            Err(err) => {
                                *status.write() = format!("Import failed: {err:#}");
                            }
                        }
                        *busy.write() = false;
                    },
                    "Import"
                }
                button {
                    disabled: busy(),
                    onclick: move |_| {
                        let current = screen();
                        let Some(file_path) = FileDialog::new()
                            .add_filter("CSV", &["csv"])
                            .set_file_name(format!("{}.csv", current.wrapper_key()))
                            .save_file()
                        else {
                            return;
                        };
                        let view = controller.read();
                        let records = if view.selection().is_empty() {
                            view.matching()
                        } else {
                            view.selected_records()
                        };
                        let export_result =
                            export_records_csv(&file_path, current.columns(), &records);
                        drop(records);
                        drop(view);
                        *status.write() = match export_result {
                            Ok(count) => format!("Exported {count} records to {}", file_path.display()),
                            Err(err) => format!("Export failed: {err:#}"),
                        };
                    },
                    "Export CSV"
                }
                button {
                    disabled: busy() || selected_count == 0,
                    onclick: move |_| {
                        let confirm = MessageDialog::new()
                            .set_level(MessageLevel::Warning)
                            .set_title("Remove records")
                            .set_description(format!(
                                "Remove {} selected records from the list?",
                                ids_for_remove.len()
                            ))
                            .set_buttons(MessageButtons::YesNo)
                            .show();
                        if confirm != MessageDialogResult::Yes {
                            return;
                        }
                        let removed = controller.write().remove_records(&ids_for_remove);
                        *status.write() = format!("Removed {removed} records");
                    },
                    "Remove selected ({selected_count})"
                }
                if show_assign {
                    input {
                        style: "padding: 4px 8px; width: 140px;",
                        placeholder: "Assignee",
                        value: assignee_input(),
                        oninput: move |event| assignee_input.set(event.value()),
                    }
                    button {
                        disabled: busy() || selected_count == 0 || assignee_input().trim().is_empty(),
                        onclick: move |_| {
                            let assignee = assignee_input();
                            let updated = {
                                let mut view = controller.write();
                                let updated = view.reassign(&ids_for_assign, &assignee);
                                view.clear_selection();
                                updated
                            };
                            *status.write() = format!("Assigned {updated} tickets to {}", assignee.trim());
                        },
                        "Assign selected"
                    }
                    button {
                        disabled: busy() || selected_count == 0,
                        onclick: move |_| {
                            let updated = {
                                let mut view = controller.write();
                                let updated = view.reassign(&ids_for_unassign, "");
                                view.clear_selection();
                                updated
                            };
                            *status.write() = format!("Unassigned {updated} tickets");
                        },
                        "Unassign selected"
                    }
                }
                span { "Status: {status}" }
            }

            div {
                style: "display: flex; gap: 12px; align-items: center; flex-wrap: wrap; padding: 4px 0 8px;",
                input {
                    style: "padding: 4px 8px; min-width: 220px;",
                    placeholder: "Search {current_screen.label()}",
                    value: search_input(),
                    oninput: move |event| {
                        let term = event.value();
                        search_input.set(term.clone());
                        controller.write().set_search_term(term);
                    }
                }
                {filter_dropdowns.into_iter().map(|(idx, field, label, options, selected)| {
                    rsx!(
                        DropdownSelect {
                            id: DropdownId::Filter(idx),
                            label: label,
                            options: options,
                            selected: Some(selected),
                            open_dropdown: open_dropdown,
                            dropdown_pos: dropdown_pos,
                            on_select: move |value: String| {
                                controller.write().set_filter(&field, &value);
                                if screen().server_params().contains(&field.as_str()) {
                                    *reload_nonce.write() += 1;
                                }
                            },
                        }
                    )
                })}
                span { "From" }
                input {
                    r#type: "date",
                    value: date_from_input(),
                    oninput: move |event| {
                        date_from_input.set(event.value());
                        controller.write().set_date_range(
                            parse_date_input(&date_from_input()),
                            parse_date_input(&date_to_input()),
                        );
                    }
                }
                span { "To" }
                input {
                    r#type: "date",
                    value: date_to_input(),
                    oninput: move |event| {
                        date_to_input.set(event.value());
                        controller.write().set_date_range(
                            parse_date_input(&date_from_input()),
                            parse_date_input(&date_to_input()),
                        );
                    }
                }
                button {
                    disabled: active_filters == 0,
                    onclick: move |_| {
                        let reload = screen()
                            .server_params()
                            .iter()
                            .any(|param| controller.peek().query().filters.contains_key(*param));
                        controller.write().clear_filters();
                        search_input.set(String::new());
                        date_from_input.set(String::new());
                        date_to_input.set(String::new());
                        if reload {
                            *reload_nonce.write() += 1;
                        }
                    },
                    "Clear all ({active_filters})"
                }
            }

            div {
                style: "display: flex; gap: 16px; align-items: center; flex-wrap: wrap; padding-bottom: 8px; color: #444;",
                span { "{match_count} of {total_records} shown" }
                span { "{stats_line}" }
                if !board_line.is_empty() {
                    span { "Open by assignee: {board_line}" }
                }
                span { "Source: {origin_label}" }
                span { "{snapshot_count} snapshots cached{last_snapshot}" }
                if !warning_text.is_empty() {
                    span { style: "color: #b91c1c;", "{warning_text}" }
                }
            }

            div {
                style: "{table_container_style()}",
                table { style: "border-collapse: collapse; width: 100%; background: #fff;",
                    thead {
                        tr {
                            th { style: "{table_header_cell_style()}",
                                input {
                                    r#type: "checkbox",
                                    checked: all_selected,
                                    onclick: move |_| {
                                        controller.write().toggle_select_all_visible();
                                    }
                                }
                            }
                            {columns.iter().map(|column| {
                                let field = column.field;
                                let marker = if sort.field == field {
                                    sort.direction.marker()
                                } else {
                                    ""
                                };
                                rsx!(
                                    th {
                                        style: "{table_header_cell_style()}",
                                        onclick: move |_| controller.write().set_sort(field),
                                        "{column.label} {marker}"
                                    }
                                )
                            })}
                        }
                    }
                    tbody {
                        if visible.is_empty() {
                            tr {
                                td {
                                    colspan: "{column_span}",
                                    style: "padding: 16px; text-align: center; color: #666;",
                                    "No matching records"
                                }
                            }
                        }
                        {visible.iter().map(|record| {
                            let id = record.id();
                            let selected = selected_ids.contains(&id);
                            let cell_style = table_cell_style(selected);
                            rsx!(
                                tr {
                                    key: "{id}",
                                    td { style: "{cell_style}",
                                        input {
                                            r#type: "checkbox",
                                            checked: selected,
                                            onclick: move |_| {
                                                controller.write().toggle_select(id);
                                            }
                                        }
                                    }
                                    {columns.iter().map(|column| {
                                        let text = display_cell(record, column.field, now);
                                        match badge_colors(column.field, &text) {
                                            Some((background, color)) => rsx!(
                                                td { style: "{cell_style}",
                                                    span { style: "{badge_style(background, color)}", "{text}" }
                                                }
                                            ),
                                            None => rsx!(
                                                td { style: "{cell_style}", "{text}" }
                                            ),
                                        }
                                    })}
                                }
                            )
                        })}
                    }
                }
            }

            div {
                style: "display: flex; gap: 8px; align-items: center; padding: 8px 0;",
                button {
                    disabled: !has_prev,
                    onclick: move |_| controller.write().prev_page(),
                    "Prev"
                }
                {pages.into_iter().map(|number| {
                    let weight = if number == current_page { "bold" } else { "normal" };
                    rsx!(
                        button {
                            style: "font-weight: {weight};",
                            onclick: move |_| controller.write().go_to_page(number as i64),
                            "{number}"
                        }
                    )
                })}
                button {
                    disabled: !has_next,
                    onclick: move |_| controller.write().next_page(),
                    "Next"
                }
                span { "{page_label}" }
                if selected_count > 0 {
                    button {
                        onclick: move |_| controller.write().clear_selection(),
                        "Clear selection ({selected_count})"
                    }
                }
            }
        }
    }
}
