//! Economy: IPOS intellectual-property applications
use super::{prepare_params, DataGovSg, FilterKind, RequestOptions};
use crate::config::{ClientConfig, CACHE_TWELVE_HOURS};
use crate::domain::{QueryArgs, Value};
use crate::errors::ApiResult;

/// Applications are filtered by the day they were lodged
const FILTER_KEY: &str = "lodgement_date";

#[derive(Clone)]
pub struct Economy {
    api: DataGovSg,
}

impl Economy {
    pub fn new(config: ClientConfig) -> ApiResult<Self> {
        Ok(Self::with_client(DataGovSg::new(config)?))
    }

    pub fn from_env() -> ApiResult<Self> {
        Ok(Self::with_client(DataGovSg::from_env()?))
    }

    pub fn with_client(api: DataGovSg) -> Self {
        Self { api }
    }

    /// Design applications lodged with IPOS
    pub fn designs(&self, args: &QueryArgs) -> ApiResult<Value> {
        self.applications("designs", args)
    }

    /// Patent applications lodged with IPOS
    pub fn patents(&self, args: &QueryArgs) -> ApiResult<Value> {
        self.applications("patents", args)
    }

    /// Trademark applications lodged with IPOS
    pub fn trademarks(&self, args: &QueryArgs) -> ApiResult<Value> {
        self.applications("trademarks", args)
    }

    fn applications(&self, kind: &str, args: &QueryArgs) -> ApiResult<Value> {
        let params = prepare_params(args, FILTER_KEY, FilterKind::DateOnly)?;
        let url = self
            .api
            .config()
            .v1_endpoint(&format!("technology/ipos/{kind}"));
        self.api
            .send_request(&url, &params, CACHE_TWELVE_HOURS, RequestOptions::default())
    }
}

impl DataGovSg {
    pub fn economy(&self) -> Economy {
        Economy::with_client(self.clone())
    }
}
