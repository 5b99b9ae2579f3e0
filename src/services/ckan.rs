//! CKAN action API: dataset catalogue and datastore search
use super::{DataGovSg, RequestOptions};
use crate::config::{ClientConfig, CACHE_ONE_DAY};
use crate::domain::{Params, RecordsFormat, Value};
use crate::errors::{ApiError, ApiResult};
use serde_json::Value as JsonValue;
use std::collections::HashSet;
use tracing::debug;

const DEFAULT_LIMIT: u32 = 100;

/// Arguments for `datastore_search`
#[derive(Debug, Clone, PartialEq)]
pub struct DatastoreSearch {
    resource_id: String,
    limit: Option<u32>,
    offset: Option<u32>,
    fields: Option<String>,
    filters: Option<JsonValue>,
    q: Option<String>,
    sort: Option<String>,
    records_format: RecordsFormat,
}

impl DatastoreSearch {
    pub fn new(resource_id: impl Into<String>) -> Self {
        Self {
            resource_id: resource_id.into(),
            limit: None,
            offset: None,
            fields: None,
            filters: None,
            q: None,
            sort: None,
            records_format: RecordsFormat::default(),
        }
    }

    /// Rows per page (default 100). All pages are fetched regardless.
    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn offset(mut self, offset: u32) -> Self {
        self.offset = Some(offset);
        self
    }

    pub fn fields(mut self, fields: &[&str]) -> Self {
        self.fields = Some(fields.join(","));
        self
    }

    /// Exact-match conditions, e.g. `{"town": "BEDOK"}`
    pub fn filters(mut self, filters: JsonValue) -> Self {
        self.filters = Some(filters);
        self
    }

    /// Full-text query across all fields
    pub fn q(mut self, q: impl Into<String>) -> Self {
        self.q = Some(q.into());
        self
    }

    /// Full-text query per field, e.g. `{"town": "bedok"}`
    pub fn q_fields(mut self, q: JsonValue) -> Self {
        self.q = Some(q.to_string());
        self
    }

    /// e.g. `"month desc, town"`
    pub fn sort(mut self, sort: impl Into<String>) -> Self {
        self.sort = Some(sort.into());
        self
    }

    pub fn records_format(mut self, format: RecordsFormat) -> Self {
        self.records_format = format;
        self
    }

    fn validate(&self) -> ApiResult<()> {
        if self.resource_id.trim().is_empty() {
            return Err(ApiError::validation("resource_id must not be empty"));
        }
        if self.limit == Some(0) {
            return Err(ApiError::validation("limit must be greater than zero"));
        }
        if let Some(filters) = &self.filters {
            if !filters.is_object() {
                return Err(ApiError::validation(format!(
                    "filters must be a JSON object, got {filters}"
                )));
            }
        }
        Ok(())
    }

    fn to_params(&self) -> Params {
        let defaults = Params::new()
            .set("limit", DEFAULT_LIMIT)
            .set("offset", 0u32);
        let mut params = Params::new()
            .set("resource_id", self.resource_id.as_str())
            .set_opt("fields", self.fields.clone())
            .set_opt("filters", self.filters.as_ref().map(JsonValue::to_string))
            .set_opt("q", self.q.clone())
            .set_opt("sort", self.sort.clone());
        if let Some(limit) = self.limit {
            params.insert("limit", Some(limit.into()));
        }
        if let Some(offset) = self.offset {
            params.insert("offset", Some(offset.into()));
        }
        params.with_defaults(&defaults)
    }
}

/// Client for the CKAN catalogue. Responses are cached for a day.
#[derive(Clone)]
pub struct Ckan {
    api: DataGovSg,
}

impl Ckan {
    pub fn new(config: ClientConfig) -> ApiResult<Self> {
        Ok(Self::with_client(DataGovSg::new(config)?))
    }

    pub fn from_env() -> ApiResult<Self> {
        Ok(Self::with_client(DataGovSg::from_env()?))
    }

    pub fn with_client(api: DataGovSg) -> Self {
        Self { api }
    }

    /// Search a datastore resource, following `_links.next` until every
    /// matching record has been fetched. Records of all pages are
    /// concatenated under `result.records`.
    pub fn datastore_search(&self, search: &DatastoreSearch) -> ApiResult<Value> {
        search.validate()?;
        let url = self.api.config().ckan_endpoint("datastore_search");
        let mut payload = self
            .api
            .fetch_json(&url, &search.to_params(), CACHE_ONE_DAY)?;
        ensure_success(&payload)?;

        let total = payload.pointer("/result/total").and_then(JsonValue::as_u64);
        let mut page_len = records_len(&payload);
        let mut fetched = u64::from(search.offset.unwrap_or(0)) + page_len as u64;
        let mut next = next_link(&payload);
        let mut seen_links = HashSet::new();

        // an empty page ends the run; `_links.next` is present even on the last one
        while page_len > 0 && total.map_or(true, |total| fetched < total) {
            let Some(link) = next.take() else {
                break;
            };
            if !seen_links.insert(link.clone()) {
                return Err(ApiError::api(
                    format!("datastore_search next link {link:?} repeated"),
                    serde_json::json!({ "next": link }),
                ));
            }

            let mut page = self
                .api
                .fetch_json(&self.resolve_link(&link), &Params::new(), CACHE_ONE_DAY)?;
            ensure_success(&page)?;
            next = next_link(&page);

            let records = match page.pointer_mut("/result/records").map(JsonValue::take) {
                Some(JsonValue::Array(records)) => records,
                _ => Vec::new(),
            };
            page_len = records.len();
            fetched += page_len as u64;
            debug!("datastore_search page of {} records ({} so far)", page_len, fetched);

            if let Some(JsonValue::Array(all)) = payload.pointer_mut("/result/records") {
                all.extend(records);
            }
        }

        apply_records_format(&mut payload, search.records_format);
        Ok(RequestOptions::default().apply(payload))
    }

    /// Names of all datasets; `limit`/`offset` page through them
    pub fn package_list(&self, limit: Option<u32>, offset: Option<u32>) -> ApiResult<Value> {
        let params = Params::new()
            .set_opt("limit", limit)
            .set_opt("offset", offset);
        self.action("package_list", &params)
    }

    /// Metadata and resources of one dataset
    pub fn package_show(&self, package_id: &str) -> ApiResult<Value> {
        self.action("package_show", &id_param(package_id)?)
    }

    pub fn resource_show(&self, resource_id: &str) -> ApiResult<Value> {
        self.action("resource_show", &id_param(resource_id)?)
    }

    fn action(&self, action: &str, params: &Params) -> ApiResult<Value> {
        let url = self.api.config().ckan_endpoint(action);
        let payload = self.api.fetch_json(&url, params, CACHE_ONE_DAY)?;
        ensure_success(&payload)?;
        Ok(RequestOptions::default().apply(payload))
    }

    fn resolve_link(&self, link: &str) -> String {
        if link.starts_with("http://") || link.starts_with("https://") {
            link.to_string()
        } else {
            format!(
                "{}/{}",
                self.api.config().ckan_domain.trim_end_matches('/'),
                link.trim_start_matches('/')
            )
        }
    }
}

impl DataGovSg {
    pub fn ckan(&self) -> Ckan {
        Ckan::with_client(self.clone())
    }
}

fn id_param(id: &str) -> ApiResult<Params> {
    if id.trim().is_empty() {
        return Err(ApiError::validation("id must not be empty"));
    }
    Ok(Params::new().set("id", id))
}

/// CKAN reports failures in the body as `success: false`
fn ensure_success(payload: &JsonValue) -> ApiResult<()> {
    if payload.get("success").and_then(JsonValue::as_bool) == Some(false) {
        let message = payload
            .pointer("/error/message")
            .and_then(JsonValue::as_str)
            .unwrap_or("CKAN request failed")
            .to_string();
        return Err(ApiError::api(message, payload.clone()));
    }
    if payload.get("result").is_none() {
        return Err(ApiError::api("response has no result field", payload.clone()));
    }
    Ok(())
}

fn records_len(payload: &JsonValue) -> usize {
    payload
        .pointer("/result/records")
        .and_then(JsonValue::as_array)
        .map_or(0, Vec::len)
}

fn next_link(payload: &JsonValue) -> Option<String> {
    payload
        .pointer("/result/_links/next")
        .and_then(JsonValue::as_str)
        .filter(|link| !link.is_empty())
        .map(str::to_string)
}

/// Reshape `result.records` in place. Key order of each record is kept.
fn apply_records_format(payload: &mut JsonValue, format: RecordsFormat) {
    if format == RecordsFormat::Objects {
        return;
    }
    let Some(records) = payload
        .pointer_mut("/result/records")
        .and_then(JsonValue::as_array_mut)
    else {
        return;
    };

    for record in records.iter_mut() {
        let values: Vec<JsonValue> = match record.take() {
            JsonValue::Object(map) => map.into_iter().map(|(_, v)| v).collect(),
            JsonValue::Array(items) => items,
            other => vec![other],
        };
        *record = match format.delimiter() {
            Some(sep) => JsonValue::String(
                values.iter().map(cell_text).collect::<Vec<_>>().join(sep),
            ),
            None => JsonValue::Array(values),
        };
    }
}

fn cell_text(value: &JsonValue) -> String {
    match value {
        JsonValue::String(s) => s.clone(),
        JsonValue::Null => String::new(),
        other => other.to_string(),
    }
}
