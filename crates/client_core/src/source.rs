use std::{marker::PhantomData, time::Duration};

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use shared::error::ApiError;
use tracing::{debug, warn};

use crate::{
    error::{ListError, ListResult},
    page::{parse_page, ListPage},
    query::ListQuery,
    resource::ListResource,
};

pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Where a controller reads its pages from.
#[async_trait]
pub trait ListSource<T>: Send + Sync {
    async fn fetch_page(&self, query: &ListQuery) -> ListResult<ListPage<T>>;
}

/// HTTP client with the request timeout applied to every call.
pub fn build_http_client(timeout: Duration) -> ListResult<Client> {
    Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|err| ListError::InvalidArgument(format!("failed to build HTTP client: {err}")))
}

/// `GET <server><base>/paginated` over reqwest.
pub struct HttpListSource<T> {
    http: Client,
    endpoint: String,
    _rows: PhantomData<fn() -> T>,
}

impl<T> HttpListSource<T> {
    pub fn new(http: Client, server_url: &str, resource: &ListResource) -> Self {
        Self {
            http,
            endpoint: format!(
                "{}{}",
                server_url.trim_end_matches('/'),
                resource.endpoint_path()
            ),
            _rows: PhantomData,
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl<T> ListSource<T> for HttpListSource<T>
where
    T: DeserializeOwned + Send + 'static,
{
    async fn fetch_page(&self, query: &ListQuery) -> ListResult<ListPage<T>> {
        let params = query.request_params();
        debug!(endpoint = %self.endpoint, ?params, "fetching list page");

        let response = self
            .http
            .get(&self.endpoint)
            .query(&params)
            .send()
            .await?;
        let status = response.status();
        let body = response.bytes().await?;

        if !status.is_success() {
            let detail = ApiError::from_body(&body).map(|err| err.error);
            warn!(
                endpoint = %self.endpoint,
                status = status.as_u16(),
                detail = detail.as_deref().unwrap_or(""),
                "list request rejected"
            );
            return Err(ListError::fetch(status, detail));
        }

        let page = parse_page::<T>(&body)?;
        debug!(
            endpoint = %self.endpoint,
            rows = page.items.len(),
            total = page.total_items,
            "list page received"
        );
        Ok(page)
    }
}

#[cfg(test)]
#[path = "tests/source_tests.rs"]
mod tests;
