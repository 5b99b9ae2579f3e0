//! Housing: HDB carpark availability
use super::{prepare_params, DataGovSg, FilterKind, RequestOptions};
use crate::config::{ClientConfig, CACHE_ONE_MINUTE};
use crate::domain::{QueryArgs, Value};
use crate::errors::ApiResult;

#[derive(Clone)]
pub struct Housing {
    api: DataGovSg,
}

impl Housing {
    pub fn new(config: ClientConfig) -> ApiResult<Self> {
        Ok(Self::with_client(DataGovSg::new(config)?))
    }

    pub fn from_env() -> ApiResult<Self> {
        Ok(Self::with_client(DataGovSg::from_env()?))
    }

    pub fn with_client(api: DataGovSg) -> Self {
        Self { api }
    }

    /// Available lots per carpark, updated every minute (cached 1 minute).
    ///
    /// Lot counts arrive as strings and are returned as numbers.
    pub fn carpark_availability(&self, args: &QueryArgs) -> ApiResult<Value> {
        let params = prepare_params(args, "date_time", FilterKind::DateTimeOnly)?;
        let url = self.api.config().v1_endpoint("transport/carpark-availability");
        self.api
            .send_request(&url, &params, CACHE_ONE_MINUTE, RequestOptions::with_numbers())
    }
}

impl DataGovSg {
    pub fn housing(&self) -> Housing {
        Housing::with_client(self.clone())
    }
}
