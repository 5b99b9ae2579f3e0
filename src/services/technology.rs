//! Technology: retired IPOS datasets
#![allow(deprecated)]

use crate::domain::{QueryArgs, Value};
use tracing::warn;

/// The IPOS datasets were moved under the economy category upstream.
/// Every method logs a warning and returns `None` without a request.
#[deprecated(note = "IPOS datasets are served by `Economy`")]
#[derive(Debug, Clone, Copy, Default)]
pub struct Technology;

impl Technology {
    pub fn new() -> Self {
        Self
    }

    #[deprecated(note = "use `Economy::designs`")]
    pub fn designs(&self, _args: &QueryArgs) -> Option<Value> {
        retired("designs")
    }

    #[deprecated(note = "use `Economy::patents`")]
    pub fn patents(&self, _args: &QueryArgs) -> Option<Value> {
        retired("patents")
    }

    #[deprecated(note = "use `Economy::trademarks`")]
    pub fn trademarks(&self, _args: &QueryArgs) -> Option<Value> {
        retired("trademarks")
    }
}

fn retired(method: &str) -> Option<Value> {
    warn!(
        "Technology::{} is deprecated and returns nothing, use Economy::{} instead",
        method, method
    );
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_methods_are_inert() {
        let technology = Technology::new();
        let args = QueryArgs::new();
        assert!(technology.designs(&args).is_none());
        assert!(technology.patents(&args).is_none());
        assert!(technology.trademarks(&args).is_none());
    }
}
