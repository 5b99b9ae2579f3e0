//! Environment readings and weather forecasts (v2 real-time API)
use super::{prepare_params, DataGovSg, FilterKind, RequestOptions};
use crate::config::{
    ClientConfig, CACHE_FIVE_MINUTES, CACHE_ONE_HOUR, CACHE_ONE_MINUTE, CACHE_THIRTY_MINUTES,
    CACHE_TWELVE_HOURS,
};
use crate::domain::{QueryArgs, Value};
use crate::errors::ApiResult;

/// Every v2 endpoint takes its point-in-time filter as `date`,
/// either `YYYY-MM-DD` or a full date-time.
const FILTER_KEY: &str = "date";

/// Client for the environment endpoints. Every method follows pagination
/// and returns the merged `data` object.
#[derive(Clone)]
pub struct Environment {
    api: DataGovSg,
}

impl Environment {
    pub fn new(config: ClientConfig) -> ApiResult<Self> {
        Ok(Self::with_client(DataGovSg::new(config)?))
    }

    pub fn from_env() -> ApiResult<Self> {
        Ok(Self::with_client(DataGovSg::from_env()?))
    }

    pub fn with_client(api: DataGovSg) -> Self {
        Self { api }
    }

    /// Air temperature per station (cached 1 minute)
    pub fn air_temperature(&self, args: &QueryArgs) -> ApiResult<Value> {
        self.readings("air-temperature", args, CACHE_ONE_MINUTE)
    }

    /// Four-day weather outlook (cached 12 hours)
    pub fn four_day_outlook(&self, args: &QueryArgs) -> ApiResult<Value> {
        self.readings("four-day-outlook", args, CACHE_TWELVE_HOURS)
    }

    /// PM2.5 per region (cached 1 hour)
    pub fn pm25(&self, args: &QueryArgs) -> ApiResult<Value> {
        self.readings("pm25", args, CACHE_ONE_HOUR)
    }

    /// Pollutant Standards Index per region (cached 1 hour)
    pub fn psi(&self, args: &QueryArgs) -> ApiResult<Value> {
        self.readings("psi", args, CACHE_ONE_HOUR)
    }

    /// Rainfall per station (cached 5 minutes)
    pub fn rainfall(&self, args: &QueryArgs) -> ApiResult<Value> {
        self.readings("rainfall", args, CACHE_FIVE_MINUTES)
    }

    pub fn relative_humidity(&self, args: &QueryArgs) -> ApiResult<Value> {
        self.readings("relative-humidity", args, CACHE_ONE_MINUTE)
    }

    /// 24-hour forecast per region (cached 1 hour)
    pub fn twenty_four_hour_forecast(&self, args: &QueryArgs) -> ApiResult<Value> {
        self.readings("twenty-four-hr-forecast", args, CACHE_ONE_HOUR)
    }

    /// 2-hour forecast per area (cached 30 minutes)
    pub fn two_hour_forecast(&self, args: &QueryArgs) -> ApiResult<Value> {
        self.readings("two-hr-forecast", args, CACHE_THIRTY_MINUTES)
    }

    pub fn uv_index(&self, args: &QueryArgs) -> ApiResult<Value> {
        self.readings("uv", args, CACHE_ONE_HOUR)
    }

    pub fn wind_direction(&self, args: &QueryArgs) -> ApiResult<Value> {
        self.readings("wind-direction", args, CACHE_ONE_MINUTE)
    }

    pub fn wind_speed(&self, args: &QueryArgs) -> ApiResult<Value> {
        self.readings("wind-speed", args, CACHE_ONE_MINUTE)
    }

    fn readings(&self, path: &str, args: &QueryArgs, cache_seconds: u64) -> ApiResult<Value> {
        let params = prepare_params(args, FILTER_KEY, FilterKind::DateOrDateTime)?;
        let url = self.api.config().v2_endpoint(path);
        self.api
            .paginate(&url, &params, cache_seconds, RequestOptions::default())
    }
}

impl DataGovSg {
    /// Environment client sharing this client's transport and cache
    pub fn environment(&self) -> Environment {
        Environment::with_client(self.clone())
    }
}
