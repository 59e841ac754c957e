use std::collections::BTreeMap;

use crate::domain::entities::query::is_cleared_filter;
use crate::domain::entities::record::Record;
use crate::domain::entities::screen::Screen;

#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("request failed: {0}")]
    Http(String),
    #[error("unexpected response body: {0}")]
    Decode(String),
    #[error("local storage failed: {0}")]
    Storage(String),
    #[error("not authenticated")]
    Unauthenticated,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub screen: Screen,
    pub params: BTreeMap<String, String>,
}

impl FetchRequest {
    pub fn for_screen(screen: Screen) -> Self {
        Self {
            screen,
            params: BTreeMap::new(),
        }
    }

    /// Adds a query parameter unless it is blank or `"all"`.
    pub fn with_param(mut self, key: &str, value: &str) -> Self {
        if !is_cleared_filter(value) {
            self.params.insert(key.to_string(), value.to_string());
        }
        self
    }

    pub fn resource(&self) -> &'static str {
        self.screen.resource_path()
    }
}

/// Where list screens get their records from.
pub trait RecordSource: Send + Sync {
    fn fetch(&self, request: &FetchRequest) -> Result<Vec<Record>, SourceError>;

    fn describe(&self) -> String;
}
