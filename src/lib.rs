//! Client for the data.gov.sg open-data APIs.
//!
//! Category clients (`Environment`, `Transport`, `Housing`, `Economy`, `Ckan`)
//! share one `DataGovSg` request layer, which caches responses, retries
//! transient server errors and follows pagination. Timestamp strings in
//! responses are returned as dates or Singapore date-times.
//!
//! ```no_run
//! use datagovsg::{DataGovSg, QueryArgs};
//!
//! let api = DataGovSg::from_env()?;
//! let psi = api.environment().psi(&QueryArgs::new())?;
//! println!("{:?}", psi["items"][0]["date"]);
//! # Ok::<(), datagovsg::ApiError>(())
//! ```
pub mod clients;
pub mod config;
pub mod domain;
pub mod errors;
pub mod repo;
pub mod services;
pub mod utils;

pub use config::{ClientConfig, RetryPolicy};
pub use domain::{Params, QueryArgs, QueryValue, RecordsFormat, Timestamp, Value};
pub use errors::{ApiError, ApiResult, ParseError};
pub use services::ckan::{Ckan, DatastoreSearch};
pub use services::economy::Economy;
pub use services::environment::Environment;
pub use services::housing::Housing;
#[allow(deprecated)]
pub use services::technology::Technology;
pub use services::transport::Transport;
pub use services::{DataGovSg, RequestOptions};
pub use utils::{datetime_from_string, sanitize_data, SanitizeOptions};
