//! Transport feeds: taxi availability and traffic cameras
use super::{prepare_params, DataGovSg, FilterKind, RequestOptions};
use crate::config::{ClientConfig, CACHE_ONE_MINUTE, CACHE_THIRTY_SECONDS};
use crate::domain::{QueryArgs, Value};
use crate::errors::ApiResult;

const FILTER_KEY: &str = "date_time";

#[derive(Clone)]
pub struct Transport {
    api: DataGovSg,
}

impl Transport {
    pub fn new(config: ClientConfig) -> ApiResult<Self> {
        Ok(Self::with_client(DataGovSg::new(config)?))
    }

    pub fn from_env() -> ApiResult<Self> {
        Ok(Self::with_client(DataGovSg::from_env()?))
    }

    pub fn with_client(api: DataGovSg) -> Self {
        Self { api }
    }

    /// Locations of available taxis (cached 30 seconds)
    pub fn taxi_availability(&self, args: &QueryArgs) -> ApiResult<Value> {
        self.feed("transport/taxi-availability", args, CACHE_THIRTY_SECONDS)
    }

    /// Traffic camera images with locations (cached 1 minute)
    pub fn traffic_images(&self, args: &QueryArgs) -> ApiResult<Value> {
        self.feed("transport/traffic-images", args, CACHE_ONE_MINUTE)
    }

    fn feed(&self, path: &str, args: &QueryArgs, cache_seconds: u64) -> ApiResult<Value> {
        let params = prepare_params(args, FILTER_KEY, FilterKind::DateTimeOnly)?;
        let url = self.api.config().v1_endpoint(path);
        self.api
            .send_request(&url, &params, cache_seconds, RequestOptions::default())
    }
}

impl DataGovSg {
    pub fn transport(&self) -> Transport {
        Transport::with_client(self.clone())
    }
}
