use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

mod app;
mod domain {
    pub mod entities {
        pub mod query;
        pub mod record;
        pub mod screen;
        pub mod selection;
        pub mod ticket;
    }
}
mod infra {
    pub mod config;
    pub mod fallback;
    pub mod mock;
    pub mod export {
        pub mod csv;
    }
    pub mod http {
        pub mod client;
    }
    pub mod import {
        pub mod csv;
        pub mod xlsx;
    }
    pub mod sqlite {
        pub mod queries;
        pub mod repo;
        pub mod schema;
    }
}
mod platform {
    pub mod desktop {
        pub mod blocking;
    }
}
mod ui {
    pub mod format;
    pub mod state {
        pub mod app_state;
    }
}
mod usecase {
    pub mod ports {
        pub mod snapshot;
        pub mod source;
    }
    pub mod services {
        pub mod import_service;
        pub mod list_controller;
        pub mod record_service;
    }
}


use crate::app::App;
use crate::infra::config::{load_app_config, project_dirs};

const WINDOW_TITLE: &str = "MSP Desk";

fn main() -> Result<()> {
    let config = load_app_config()?;
    init_logging(&config.log_filter);
    info!(
        api = %config.api_base_url,
        authenticated = config.authenticated(),
        fallback = ?config.fallback,
        "starting"
    );

    let webview_data_dir = default_webview_data_dir()?;

    dioxus::LaunchBuilder::desktop()
        .with_cfg(
            dioxus::desktop::Config::new()
                .with_window(dioxus::desktop::WindowBuilder::new().with_title(WINDOW_TITLE))
                .with_data_directory(webview_data_dir),
        )
        .with_context(config)
        .launch(App);
    Ok(())
}

/// `RUST_LOG` wins over the configured filter.
fn init_logging(default_filter: &str) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new(default_filter))
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    if let Err(err) = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .try_init()
    {
        eprintln!("failed to initialise logging: {err}");
    }
}

fn default_db_path() -> Result<PathBuf> {
    Ok(project_dirs()?.data_local_dir().join("snapshots.sqlite"))
}

fn ensure_webview_data_dir(base_data_dir: &Path) -> Result<PathBuf> {
    let webview_data_dir = base_data_dir.join("webview2");
    std::fs::create_dir_all(&webview_data_dir).with_context(|| {
        format!(
            "failed to create webview dir: {}",
            webview_data_dir.display()
        )
    })?;
    Ok(webview_data_dir)
}

fn default_webview_data_dir() -> Result<PathBuf> {
    ensure_webview_data_dir(project_dirs()?.data_local_dir())
}
