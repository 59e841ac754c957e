use dioxus::prelude::{use_signal, Signal};

use crate::app::DropdownId;
use crate::domain::entities::screen::Screen;
use crate::infra::config::AppConfig;
use crate::usecase::ports::snapshot::SnapshotMeta;
use crate::usecase::services::list_controller::ListController;
use crate::usecase::services::record_service::LoadOrigin;

pub struct AppState {
    pub screen: Signal<Screen>,
    pub controller: Signal<ListController>,
    pub reload_nonce: Signal<u64>,
    pub busy: Signal<bool>,
    pub status: Signal<String>,
    pub origin: Signal<Option<LoadOrigin>>,
    pub warning: Signal<Option<String>>,
    pub snapshots: Signal<Vec<SnapshotMeta>>,
    pub search_input: Signal<String>,
    pub date_from_input: Signal<String>,
    pub date_to_input: Signal<String>,
    pub assignee_input: Signal<String>,
    pub open_dropdown: Signal<Option<DropdownId>>,
    pub dropdown_pos: Signal<Option<(f64, f64)>>,
}

pub fn controller_for(screen: Screen, config: &AppConfig) -> ListController {
    ListController::new(screen.list_config(config.page_size(screen)))
}

impl AppState {
    pub fn new(config: &AppConfig) -> Self {
        let initial = controller_for(Screen::Tickets, config);
        Self {
            screen: use_signal(|| Screen::Tickets),
            controller: use_signal(move || initial),
            reload_nonce: use_signal(|| 0_u64),
            busy: use_signal(|| false),
            status: use_signal(|| "Ready".to_string()),
            origin: use_signal(|| None::<LoadOrigin>),
            warning: use_signal(|| None::<String>),
            snapshots: use_signal(Vec::<SnapshotMeta>::new),
            search_input: use_signal(String::new),
            date_from_input: use_signal(String::new),
            date_to_input: use_signal(String::new),
            assignee_input: use_signal(String::new),
            open_dropdown: use_signal(|| None::<DropdownId>),
            dropdown_pos: use_signal(|| None::<(f64, f64)>),
        }
    }
}
