//! Request layer, pagination collector and per-category clients
pub mod ckan;
pub mod economy;
pub mod environment;
pub mod housing;
pub mod technology;
pub mod transport;

use crate::clients::{HttpClient, HttpResponse, Transport};
use crate::config::{ClientConfig, RETRY_STATUSES};
use crate::domain::{Params, QueryArgs, QueryValue, Value};
use crate::errors::{ApiError, ApiResult};
use crate::repo::CacheRepo;
use crate::utils::{sanitize_owned, SanitizeOptions};
use reqwest::Url;
use retry_policies::{RetryDecision, RetryPolicy as _};
use serde_json::{Map as JsonMap, Value as JsonValue};
use std::collections::HashSet;
use std::sync::Arc;
use std::thread;
use std::time::SystemTime;
use tracing::{debug, warn};

/// Continuation token field in v2 `data` objects, echoed back as a query parameter
pub const PAGINATION_TOKEN: &str = "paginationToken";

/// List fields concatenated across pages, in priority order
const LIST_FIELDS: [&str; 3] = ["items", "readings", "records"];

/// Metadata fields merged across pages, with the key entries are deduplicated on
const KEYED_FIELDS: [(&str, &str); 3] = [
    ("area_metadata", "name"),
    ("regionMetadata", "name"),
    ("stations", "id"),
];

/// Post-processing applied to a decoded response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestOptions {
    pub sanitize: bool,
    pub sanitize_numbers: bool,
}

impl RequestOptions {
    /// Sanitize timestamps and number-like strings
    pub fn with_numbers() -> Self {
        Self {
            sanitize: true,
            sanitize_numbers: true,
        }
    }

    /// Return the decoded body untouched
    pub fn raw() -> Self {
        Self {
            sanitize: false,
            sanitize_numbers: false,
        }
    }

    fn apply(&self, raw: JsonValue) -> Value {
        let value = Value::from(raw);
        if self.sanitize {
            sanitize_owned(
                value,
                SanitizeOptions {
                    iterate: true,
                    sanitize_numbers: self.sanitize_numbers,
                },
            )
        } else {
            value
        }
    }
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self {
            sanitize: true,
            sanitize_numbers: false,
        }
    }
}

/// Shared request machinery behind every category client.
///
/// Cloning is cheap and shares both the transport and the response cache.
#[derive(Clone)]
pub struct DataGovSg {
    transport: Arc<dyn Transport>,
    cache: CacheRepo,
    config: Arc<ClientConfig>,
}

impl DataGovSg {
    pub fn new(config: ClientConfig) -> ApiResult<Self> {
        let transport = HttpClient::new(&config)?;
        Ok(Self::with_transport(config, Arc::new(transport)))
    }

    pub fn from_env() -> ApiResult<Self> {
        Self::new(ClientConfig::from_env()?)
    }

    /// Use a caller-supplied transport, e.g. a proxy-aware client or a test double
    pub fn with_transport(config: ClientConfig, transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            cache: CacheRepo::new(config.cache_capacity),
            config: Arc::new(config),
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn cache(&self) -> &CacheRepo {
        &self.cache
    }

    /// Fetch a single-page endpoint.
    ///
    /// Public so callers can reach endpoints that have no category method yet.
    pub fn send_request(
        &self,
        url: &str,
        params: &Params,
        cache_seconds: u64,
        options: RequestOptions,
    ) -> ApiResult<Value> {
        let raw = self.fetch_json(url, params, cache_seconds)?;
        Ok(options.apply(raw))
    }

    /// Fetch every page of a paginated endpoint and return the merged `data` object.
    ///
    /// Pages are merged raw and sanitized once at the end.
    pub fn paginate(
        &self,
        url: &str,
        params: &Params,
        cache_seconds: u64,
        options: RequestOptions,
    ) -> ApiResult<Value> {
        let merged = self.collect_pages(url, params, cache_seconds)?;
        Ok(options.apply(merged))
    }

    fn collect_pages(&self, url: &str, params: &Params, cache_seconds: u64) -> ApiResult<JsonValue> {
        let mut page_params = params.clone();
        let mut pages = Vec::new();
        let mut seen_tokens = HashSet::new();

        loop {
            let payload = self.fetch_json(url, &page_params, cache_seconds)?;
            let mut data = take_data(payload)?;
            let token = data
                .as_object_mut()
                .and_then(|obj| obj.shift_remove(PAGINATION_TOKEN))
                .and_then(token_text);
            pages.push(data);
            debug!("fetched page {} of {}", pages.len(), url);

            let Some(token) = token else {
                break;
            };
            if !seen_tokens.insert(token.clone()) {
                return Err(ApiError::api(
                    format!("pagination token {token:?} repeated for {url}"),
                    serde_json::json!({ "paginationToken": token }),
                ));
            }
            page_params.insert(PAGINATION_TOKEN, Some(QueryValue::Text(token)));
        }

        // Each page absorbs everything fetched after it, so fold from the last page back.
        let merged = pages.into_iter().rev().reduce(|rest, mut page| {
            if let (Some(page_obj), JsonValue::Object(rest_obj)) = (page.as_object_mut(), rest) {
                merge_page(page_obj, rest_obj);
            }
            page
        });
        Ok(merged.unwrap_or_default())
    }

    /// GET `url` with `params` through the cache, returning the decoded body
    pub(crate) fn fetch_json(
        &self,
        url: &str,
        params: &Params,
        cache_seconds: u64,
    ) -> ApiResult<JsonValue> {
        let url = build_url(url, params)?;

        if cache_seconds > 0 {
            if let Some(body) = self.cache.get_latest(url.as_str()) {
                return Ok(decode_body(&body, &url));
            }
        }

        let resp = self.get_with_retry(&url)?;
        self.cache.write(url.as_str(), &resp.body, cache_seconds);
        Ok(decode_body(&resp.body, &url))
    }

    fn get_with_retry(&self, url: &Url) -> ApiResult<HttpResponse> {
        let policy = &self.config.retry;
        let backoff = policy.backoff();
        let started = SystemTime::now();
        let mut attempt = 0;

        loop {
            let resp = self.transport.get(url)?;
            if resp.is_success() {
                return Ok(resp);
            }

            if RETRY_STATUSES.contains(&resp.status) {
                if let RetryDecision::Retry { execute_after } = backoff.should_retry(started, attempt) {
                    let delay = execute_after
                        .duration_since(SystemTime::now())
                        .unwrap_or_default();
                    warn!(
                        "HTTP {} from {}, retry {}/{} in {:?}",
                        resp.status,
                        url,
                        attempt + 1,
                        policy.max_retries,
                        delay
                    );
                    thread::sleep(delay);
                    attempt += 1;
                    continue;
                }
            }

            return Err(ApiError::HttpStatus {
                status: resp.status,
                url: url.to_string(),
                body: resp.body,
            });
        }
    }
}

/// Which point-in-time filter an endpoint understands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FilterKind {
    DateOrDateTime,
    DateOnly,
    DateTimeOnly,
}

impl FilterKind {
    fn accepts(&self, value: &QueryValue) -> bool {
        matches!(
            (self, value),
            (FilterKind::DateOrDateTime, QueryValue::Date(_) | QueryValue::DateTime(_))
                | (FilterKind::DateOnly, QueryValue::Date(_))
                | (FilterKind::DateTimeOnly, QueryValue::DateTime(_))
        )
    }

    fn describe(&self) -> &'static str {
        match self {
            FilterKind::DateOrDateTime => "a date or date-time",
            FilterKind::DateOnly => "a date",
            FilterKind::DateTimeOnly => "a date-time",
        }
    }
}

/// Turn caller arguments into query parameters, placing the point-in-time
/// filter under `filter_key`. Typed `date`/`date_time` fields win over the
/// same key passed through `extra`.
pub(crate) fn prepare_params(
    args: &QueryArgs,
    filter_key: &str,
    kind: FilterKind,
) -> ApiResult<Params> {
    let filter = args
        .point_in_time()
        .or_else(|| args.extra.get(filter_key).cloned());

    let mut params = args.extra.clone();
    if let Some(value) = filter {
        if !kind.accepts(&value) {
            return Err(ApiError::validation(format!(
                "{filter_key} expects {}, got {:?}",
                kind.describe(),
                value
            )));
        }
        params.insert(filter_key, Some(value));
    }
    Ok(params)
}

fn build_url(endpoint: &str, params: &Params) -> ApiResult<Url> {
    let mut url = Url::parse(endpoint)
        .map_err(|e| ApiError::validation(format!("invalid endpoint {endpoint:?}: {e}")))?;
    let pairs = params.to_query_pairs();
    if !pairs.is_empty() {
        url.query_pairs_mut().extend_pairs(&pairs);
    }
    Ok(url)
}

/// Empty or undecodable bodies become an empty mapping
fn decode_body(body: &str, url: &Url) -> JsonValue {
    if body.trim().is_empty() {
        return JsonValue::Object(JsonMap::new());
    }
    serde_json::from_str(body).unwrap_or_else(|e| {
        debug!("undecodable body from {}: {}", url, e);
        JsonValue::Object(JsonMap::new())
    })
}

fn take_data(payload: JsonValue) -> ApiResult<JsonValue> {
    let has_data = payload.get("data").is_some_and(|d| !d.is_null());
    if !has_data {
        let message = payload
            .get("errorMsg")
            .and_then(JsonValue::as_str)
            .filter(|m| !m.is_empty())
            .unwrap_or("response has no data field")
            .to_string();
        return Err(ApiError::api(message, payload));
    }

    match payload {
        JsonValue::Object(mut obj) => Ok(obj.remove("data").unwrap_or_default()),
        other => Ok(other),
    }
}

/// A null or empty token ends the run
fn token_text(token: JsonValue) -> Option<String> {
    let text = match token {
        JsonValue::Null => return None,
        JsonValue::String(s) => s,
        other => other.to_string(),
    };
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

/// Fold `next` into `acc`: at most one list field and one keyed field, first match wins
fn merge_page(acc: &mut JsonMap<String, JsonValue>, mut next: JsonMap<String, JsonValue>) {
    let list_field = LIST_FIELDS
        .iter()
        .find(|field| acc.contains_key(**field) && next.contains_key(**field));
    if let Some(field) = list_field {
        if let (Some(JsonValue::Array(current)), Some(JsonValue::Array(more))) =
            (acc.get_mut(*field), next.remove(*field))
        {
            current.extend(more);
        }
    }

    let keyed_field = KEYED_FIELDS
        .iter()
        .find(|(field, _)| acc.contains_key(*field) && next.contains_key(*field));
    if let Some((field, key)) = keyed_field {
        if let (Some(JsonValue::Array(current)), Some(JsonValue::Array(more))) =
            (acc.get_mut(*field), next.remove(*field))
        {
            let mut seen: HashSet<String> = current
                .iter()
                .filter_map(|entry| entry.get(*key))
                .map(JsonValue::to_string)
                .collect();
            for entry in more {
                if let Some(id) = entry.get(*key).map(JsonValue::to_string) {
                    if !seen.insert(id) {
                        continue;
                    }
                }
                current.push(entry);
            }
        }
    }
}


#[cfg(test)]
mod tests {
    use super::testing::{client_with, FakeTransport};
    use super::*;
    use chrono::NaiveDate;
    use serde_json::json;

    const PSI: &str = "https://api-open.data.gov.sg/v2/real-time/api/psi";

    #[test]
    fn test_items_concatenated_across_pages() {
        let fake = FakeTransport::new();
        fake.push_json(json!({"code": 0, "data": {"items": ["A", "B"], "paginationToken": "t1"}}));
        fake.push_json(json!({"code": 0, "data": {"items": ["C"]}}));
        let api = client_with(&fake);

        let data = api
            .paginate(PSI, &Params::new(), 0, RequestOptions::default())
            .unwrap();

        let items: Vec<&str> = data["items"]
            .as_array()
            .unwrap()
            .iter()
            .filter_map(Value::as_str)
            .collect();
        assert_eq!(items, vec!["A", "B", "C"]);
        assert!(data.get(PAGINATION_TOKEN).is_none());
        assert_eq!(fake.query(0, PAGINATION_TOKEN), None);
        assert_eq!(fake.query(1, PAGINATION_TOKEN).as_deref(), Some("t1"));
    }

    #[test]
    fn test_three_pages_keep_fetch_order() {
        let fake = FakeTransport::new();
        fake.push_json(json!({"data": {"readings": [1, 2], "paginationToken": "a"}}));
        fake.push_json(json!({"data": {"readings": [3], "paginationToken": "b"}}));
        fake.push_json(json!({"data": {"readings": [4, 5]}}));
        let api = client_with(&fake);

        let data = api
            .paginate(PSI, &Params::new(), 0, RequestOptions::default())
            .unwrap();
        let readings: Vec<i64> = data["readings"]
            .as_array()
            .unwrap()
            .iter()
            .filter_map(Value::as_i64)
            .collect();
        assert_eq!(readings, vec![1, 2, 3, 4, 5]);
        assert_eq!(fake.calls().len(), 3);
    }

    #[test]
    fn test_stations_deduplicated_first_wins() {
        let fake = FakeTransport::new();
        fake.push_json(json!({"data": {
            "stations": [{"id": "S1", "name": "first"}, {"id": "S2", "name": "first"}],
            "readings": [],
            "paginationToken": "next",
        }}));
        fake.push_json(json!({"data": {
            "stations": [{"id": "S2", "name": "second"}, {"id": "S3", "name": "second"}],
            "readings": [],
        }}));
        let api = client_with(&fake);

        let data = api
            .paginate(PSI, &Params::new(), 0, RequestOptions::default())
            .unwrap();
        let stations = data["stations"].as_array().unwrap();
        let ids: Vec<&str> = stations.iter().filter_map(|s| s["id"].as_str()).collect();
        assert_eq!(ids, vec!["S1", "S2", "S3"]);
        assert_eq!(stations[1]["name"].as_str(), Some("first"));
    }

    #[test]
    fn test_page_without_list_field_cuts_off_later_items() {
        let fake = FakeTransport::new();
        fake.push_json(json!({"data": {"items": ["A"], "paginationToken": "t1"}}));
        fake.push_json(json!({"data": {"other": true, "paginationToken": "t2"}}));
        fake.push_json(json!({"data": {"items": ["C"]}}));
        let api = client_with(&fake);

        let data = api
            .paginate(PSI, &Params::new(), 0, RequestOptions::default())
            .unwrap();
        let items: Vec<&str> = data["items"]
            .as_array()
            .unwrap()
            .iter()
            .filter_map(Value::as_str)
            .collect();
        assert_eq!(items, vec!["A"]);
        assert!(data.get("other").is_none());
        assert_eq!(fake.calls().len(), 3);
    }

    #[test]
    fn test_only_first_list_field_merged() {
        let mut acc = json!({"items": [1], "readings": [10]});
        let next = json!({"items": [2], "readings": [20]});
        if let (Some(acc), JsonValue::Object(next)) = (acc.as_object_mut(), next) {
            merge_page(acc, next);
        }
        assert_eq!(acc, json!({"items": [1, 2], "readings": [10]}));
    }

    #[test]
    fn test_entries_without_key_are_kept() {
        let mut acc = json!({"area_metadata": [{"name": "Ang Mo Kio"}]});
        let next = json!({"area_metadata": [{"name": "Ang Mo Kio"}, {"label": "unnamed"}]});
        if let (Some(acc), JsonValue::Object(next)) = (acc.as_object_mut(), next) {
            merge_page(acc, next);
        }
        assert_eq!(
            acc,
            json!({"area_metadata": [{"name": "Ang Mo Kio"}, {"label": "unnamed"}]})
        );
    }

    #[test]
    fn test_missing_data_raises_api_error() {
        let fake = FakeTransport::new();
        fake.push_json(json!({"code": 4, "errorMsg": "Invalid date format"}));
        let api = client_with(&fake);

        let err = api
            .paginate(PSI, &Params::new(), 0, RequestOptions::default())
            .unwrap_err();
        match err {
            ApiError::Api { message, payload } => {
                assert_eq!(message, "Invalid date format");
                assert_eq!(payload["code"], 4);
            }
            other => panic!("expected api error, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_data_on_later_page_discards_merge() {
        let fake = FakeTransport::new();
        fake.push_json(json!({"data": {"items": [1], "paginationToken": "t"}}));
        fake.push_json(json!({}));
        let api = client_with(&fake);

        let err = api
            .paginate(PSI, &Params::new(), 0, RequestOptions::default())
            .unwrap_err();
        assert!(matches!(err, ApiError::Api { ref message, .. } if message == "response has no data field"));
    }

    #[test]
    fn test_repeated_token_stops() {
        let fake = FakeTransport::new();
        fake.push_json(json!({"data": {"items": [1], "paginationToken": "same"}}));
        fake.push_json(json!({"data": {"items": [2], "paginationToken": "same"}}));
        let api = client_with(&fake);

        let err = api
            .paginate(PSI, &Params::new(), 0, RequestOptions::default())
            .unwrap_err();
        assert!(matches!(err, ApiError::Api { .. }));
        assert_eq!(fake.calls().len(), 2);
    }

    #[test]
    fn test_merged_result_is_sanitized_once() {
        let fake = FakeTransport::new();
        fake.push_json(json!({"data": {"items": [{"timestamp": "2024-07-13T08:00:00+08:00"}], "paginationToken": "t"}}));
        fake.push_json(json!({"data": {"items": [{"timestamp": "2024-07-13T09:00:00+08:00"}]}}));
        let api = client_with(&fake);

        let data = api
            .paginate(PSI, &Params::new(), 0, RequestOptions::default())
            .unwrap();
        assert!(data["items"][0]["timestamp"].as_datetime().is_some());
        assert!(data["items"][1]["timestamp"].as_datetime().is_some());

        fake.push_json(json!({"data": {"items": [{"timestamp": "2024-07-13T08:00:00+08:00"}]}}));
        let raw = api
            .paginate(PSI, &Params::new(), 0, RequestOptions::raw())
            .unwrap();
        assert_eq!(raw["items"][0]["timestamp"].as_str(), Some("2024-07-13T08:00:00+08:00"));
    }

    #[test]
    fn test_cache_hit_skips_transport() {
        let fake = FakeTransport::new();
        fake.push_json(json!({"value": 1}));
        let api = client_with(&fake);
        let params = Params::new().set("date", NaiveDate::from_ymd_opt(2024, 7, 13).unwrap());

        let first = api
            .send_request(PSI, &params, 60, RequestOptions::default())
            .unwrap();
        let second = api
            .send_request(PSI, &params, 60, RequestOptions::default())
            .unwrap();
        assert_eq!(first, second);
        assert_eq!(fake.calls().len(), 1);
        assert_eq!(fake.query(0, "date").as_deref(), Some("2024-07-13"));

        // different params are a different cache key
        fake.push_json(json!({"value": 2}));
        let other = api
            .send_request(PSI, &Params::new(), 60, RequestOptions::default())
            .unwrap();
        assert_eq!(other["value"].as_i64(), Some(2));
    }

    #[test]
    fn test_expired_entry_refetched() {
        let fake = FakeTransport::new();
        fake.push_json(json!({"value": 1}));
        fake.push_json(json!({"value": 2}));
        let api = client_with(&fake);

        let first = api
            .send_request(PSI, &Params::new(), 1, RequestOptions::default())
            .unwrap();
        let cached = api
            .send_request(PSI, &Params::new(), 1, RequestOptions::default())
            .unwrap();
        assert_eq!(first, cached);
        assert_eq!(fake.calls().len(), 1);

        thread::sleep(std::time::Duration::from_millis(1200));
        let refreshed = api
            .send_request(PSI, &Params::new(), 1, RequestOptions::default())
            .unwrap();
        assert_eq!(refreshed["value"].as_i64(), Some(2));
        assert_eq!(fake.calls().len(), 2);
    }

    #[test]
    fn test_response_keeps_key_order() {
        let fake = FakeTransport::new();
        fake.push(200, r#"{"zeta":1,"alpha":2,"mid":3}"#);
        fake.push(200, r#"{"data":{"zeta":1,"paginationToken":"t","alpha":2,"mid":3}}"#);
        fake.push(200, r#"{"data":{"zeta":4}}"#);
        let api = client_with(&fake);

        let value = api
            .send_request(PSI, &Params::new(), 0, RequestOptions::default())
            .unwrap();
        let keys: Vec<&str> = value.as_object().unwrap().keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["zeta", "alpha", "mid"]);
        assert_eq!(serde_json::to_string(&value).unwrap(), r#"{"zeta":1,"alpha":2,"mid":3}"#);

        let merged = api
            .paginate(PSI, &Params::new(), 0, RequestOptions::default())
            .unwrap();
        let keys: Vec<&str> = merged.as_object().unwrap().keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_zero_duration_always_fetches() {
        let fake = FakeTransport::new();
        fake.push_json(json!({"value": 1}));
        fake.push_json(json!({"value": 2}));
        let api = client_with(&fake);

        let first = api
            .send_request(PSI, &Params::new(), 0, RequestOptions::default())
            .unwrap();
        let second = api
            .send_request(PSI, &Params::new(), 0, RequestOptions::default())
            .unwrap();
        assert_eq!(first["value"].as_i64(), Some(1));
        assert_eq!(second["value"].as_i64(), Some(2));
        assert!(api.cache().is_empty());
    }

    #[test]
    fn test_transient_status_retried() {
        let fake = FakeTransport::new();
        fake.push(503, "unavailable");
        fake.push(502, "bad gateway");
        fake.push_json(json!({"ok": true}));
        let api = client_with(&fake);

        let value = api
            .send_request(PSI, &Params::new(), 0, RequestOptions::default())
            .unwrap();
        assert_eq!(value["ok"].as_bool(), Some(true));
        assert_eq!(fake.calls().len(), 3);
    }

    #[test]
    fn test_retries_exhausted() {
        let fake = FakeTransport::new();
        for _ in 0..6 {
            fake.push(500, "");
        }
        let api = client_with(&fake);

        let err = api
            .send_request(PSI, &Params::new(), 0, RequestOptions::default())
            .unwrap_err();
        assert_eq!(err.status(), Some(500));
        assert_eq!(fake.calls().len(), 6);
    }

    #[test]
    fn test_client_error_not_retried() {
        let fake = FakeTransport::new();
        fake.push(404, "not found");
        let api = client_with(&fake);

        let err = api
            .send_request(PSI, &Params::new(), 60, RequestOptions::default())
            .unwrap_err();
        match err {
            ApiError::HttpStatus { status, body, .. } => {
                assert_eq!(status, 404);
                assert_eq!(body, "not found");
            }
            other => panic!("expected status error, got {other:?}"),
        }
        assert_eq!(fake.calls().len(), 1);
        assert!(api.cache().is_empty());
    }

    #[test]
    fn test_transport_error_surfaces() {
        let fake = FakeTransport::new();
        let api = client_with(&fake);
        let err = api
            .send_request(PSI, &Params::new(), 0, RequestOptions::default())
            .unwrap_err();
        assert!(matches!(err, ApiError::Transport { .. }));
    }

    #[test]
    fn test_undecodable_body_is_empty_mapping() {
        let fake = FakeTransport::new();
        fake.push(200, "<html>maintenance</html>");
        fake.push(204, "");
        let api = client_with(&fake);

        for _ in 0..2 {
            let value = api
                .send_request(PSI, &Params::new(), 0, RequestOptions::default())
                .unwrap();
            assert_eq!(value, Value::empty_object());
        }
    }

    #[test]
    fn test_sanitize_numbers_option() {
        let fake = FakeTransport::new();
        fake.push_json(json!({"lots_available": "316"}));
        let api = client_with(&fake);

        let value = api
            .send_request(PSI, &Params::new(), 0, RequestOptions::with_numbers())
            .unwrap();
        assert_eq!(value["lots_available"].as_i64(), Some(316));
    }

    #[test]
    fn test_prepare_params_validates_filter_kind() {
        let date = NaiveDate::from_ymd_opt(2024, 7, 13).unwrap();
        let args = QueryArgs::new().date(date);

        let params = prepare_params(&args, "date", FilterKind::DateOrDateTime).unwrap();
        assert_eq!(params.get("date"), Some(&QueryValue::Date(date)));

        let err = prepare_params(&args, "date_time", FilterKind::DateTimeOnly).unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));

        let bad_extra = QueryArgs::new().param("lodgement_date", "yesterday");
        let err = prepare_params(&bad_extra, "lodgement_date", FilterKind::DateOnly).unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));

        let good_extra = QueryArgs::new().param("lodgement_date", date);
        let params = prepare_params(&good_extra, "lodgement_date", FilterKind::DateOnly).unwrap();
        assert_eq!(params.to_query_pairs(), vec![("lodgement_date".to_string(), "2024-07-13".to_string())]);
    }
}
