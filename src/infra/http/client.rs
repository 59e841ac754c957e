use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::StatusCode;
use serde_json::Value;
use tracing::{debug, warn};

use crate::domain::entities::record::{dedupe_by_id, Record};
use crate::usecase::ports::source::{FetchRequest, RecordSource, SourceError};

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000/api";

/// Accepts either a bare JSON array or an object holding the array under
/// `wrapper_key`. Entries without an integer id are skipped, as are
/// repeats of an id already seen.
pub fn records_from_body(body: &Value, wrapper_key: &str) -> Result<Vec<Record>, SourceError> {
    let items = match body {
        Value::Array(items) => items,
        Value::Object(object) => match object.get(wrapper_key) {
            Some(Value::Array(items)) => items,
            _ => {
                return Err(SourceError::Decode(format!(
                    "expected an array or an object with a `{wrapper_key}` array"
                )))
            }
        },
        _ => {
            return Err(SourceError::Decode(
                "expected an array or an object".to_string(),
            ))
        }
    };

    let records: Vec<Record> = items.iter().filter_map(Record::from_json).collect();
    let skipped = items.len() - records.len();
    if skipped > 0 {
        warn!(skipped, "dropped list entries without an integer id");
    }
    let (records, dropped) = dedupe_by_id(records);
    if dropped > 0 {
        warn!(dropped, "dropped list entries with a repeated id");
    }
    Ok(records)
}

pub struct HttpRecordSource {
    client: Client,
    base_url: String,
}

impl HttpRecordSource {
    pub fn new(
        base_url: &str,
        token: Option<&str>,
        timeout: Duration,
    ) -> Result<Self, SourceError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if let Some(token) = token.filter(|token| !token.is_empty()) {
            let value = HeaderValue::from_str(&format!("Bearer {token}"))
                .map_err(|e| SourceError::Http(format!("invalid api token: {e}")))?;
            headers.insert(AUTHORIZATION, value);
        }

        let client = Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|e| SourceError::Http(format!("failed to build http client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn endpoint(&self, resource: &str) -> String {
        format!("{}/{}", self.base_url, resource.trim_start_matches('/'))
    }
}

impl RecordSource for HttpRecordSource {
    fn fetch(&self, request: &FetchRequest) -> Result<Vec<Record>, SourceError> {
        let url = self.endpoint(request.resource());
        debug!(%url, params = ?request.params, "fetching records");

        let response = self
            .client
            .get(&url)
            .query(&request.params)
            .send()
            .map_err(|e| SourceError::Http(format!("GET {url}: {e}")))?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            return Err(SourceError::Unauthenticated);
        }
        if !status.is_success() {
            return Err(SourceError::Http(format!("GET {url} returned {status}")));
        }

        let body: Value = response
            .json()
            .map_err(|e| SourceError::Decode(format!("GET {url}: {e}")))?;
        records_from_body(&body, request.screen.wrapper_key())
    }

    fn describe(&self) -> String {
        format!("backend {}", self.base_url)
    }
}
