//! Catalog source abstraction

use crate::{CatalogError, CatalogRequest, RawGame};
use std::future::Future;
use std::sync::Arc;

/// Something that can answer catalog requests with raw records
pub trait CatalogSource: Send + Sync {
    fn fetch(
        &self,
        request: &CatalogRequest,
    ) -> impl Future<Output = Result<Vec<RawGame>, CatalogError>> + Send;
}

impl<S: CatalogSource> CatalogSource for Arc<S> {
    fn fetch(
        &self,
        request: &CatalogRequest,
    ) -> impl Future<Output = Result<Vec<RawGame>, CatalogError>> + Send {
        (**self).fetch(request)
    }
}
