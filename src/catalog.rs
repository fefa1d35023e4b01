use async_trait::async_trait;

use crate::error::Result;
use crate::types::{Movie, MovieDetail, Paged, Rating};

/// Results returned by a search, at most this many.
pub const SEARCH_LIMIT: u32 = 50;

/// The four calls the views need from the movie API.
#[async_trait]
pub trait Catalog: Send + Sync + std::fmt::Debug {
    async fn list_movies(&self, page: u32, page_size: u32) -> Result<Paged<Movie>>;
    async fn search_movies(&self, query: &str, limit: u32) -> Result<Vec<Movie>>;
    async fn get_movie(&self, id: u64) -> Result<MovieDetail>;
    async fn list_ratings(&self, id: u64, page: u32, page_size: u32) -> Result<Paged<Rating>>;
}
