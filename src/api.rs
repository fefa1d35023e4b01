use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::catalog::Catalog;
use crate::config::ApiConfig;
use crate::error::{ReelError, Result};
use crate::types::{
    Envelope, Movie, MovieDetail, MovieListResponse, Paged, Rating, RatingListResponse,
    SearchResponse,
};

/// HTTP client for the movie API.
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ReelError::Config(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn api_url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// GET `path` and decode the body, stripping a `data` envelope if present.
    async fn get_json<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> Result<T> {
        let url = self.api_url(path);
        debug!(%url, ?query, "GET");

        let response = self.client.get(&url).query(query).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(ReelError::Fetch(format!("{} {}: {}", url, status, text)));
        }

        let body: Envelope<T> = response.json().await?;
        Ok(body.into_inner())
    }
}

#[async_trait]
impl Catalog for ApiClient {
    async fn list_movies(&self, page: u32, page_size: u32) -> Result<Paged<Movie>> {
        let resp: MovieListResponse = self
            .get_json(
                "/movies",
                &[("page", page.to_string()), ("page_size", page_size.to_string())],
            )
            .await?;
        Ok(resp.into())
    }

    async fn search_movies(&self, query: &str, limit: u32) -> Result<Vec<Movie>> {
        let resp: SearchResponse = self
            .get_json(
                "/movies/search",
                &[("q", query.to_string()), ("limit", limit.to_string())],
            )
            .await?;
        Ok(resp.into())
    }

    async fn get_movie(&self, id: u64) -> Result<MovieDetail> {
        self.get_json(&format!("/movies/{}", id), &[]).await
    }

    async fn list_ratings(&self, id: u64, page: u32, page_size: u32) -> Result<Paged<Rating>> {
        let resp: RatingListResponse = self
            .get_json(
                &format!("/movies/{}/ratings", id),
                &[("page", page.to_string()), ("page_size", page_size.to_string())],
            )
            .await?;
        Ok(resp.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base_url: &str) -> ApiClient {
        ApiClient::new(&ApiConfig {
            base_url: base_url.to_string(),
            timeout_secs: 10,
        })
        .unwrap()
    }

    #[test]
    fn api_url_joins_base_and_path() {
        let api = client("http://localhost:8000/api");
        assert_eq!(api.api_url("/movies/3"), "http://localhost:8000/api/movies/3");
    }

    #[test]
    fn trailing_slash_on_base_is_ignored() {
        let api = client("http://localhost:8000/api/");
        assert_eq!(api.api_url("/movies"), "http://localhost:8000/api/movies");
    }

    #[tokio::test]
    async fn invalid_base_url_is_fetch_error() {
        let api = client("not a url");
        let err = api.list_movies(1, 20).await.unwrap_err();
        assert!(matches!(err, ReelError::Fetch(_)));
    }
}
