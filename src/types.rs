use std::collections::BTreeMap;

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};

/// Star buckets as the API keys them, highest first. Ratings below 1 are
/// collapsed into the "0.5" bucket.
pub const RATING_BUCKETS: [&str; 6] = ["5", "4", "3", "2", "1", "0.5"];

/// Movie as it appears in list and search results
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    #[serde(deserialize_with = "id_from_number_or_string")]
    pub id: u64,
    pub title: String,
    /// Pipe-delimited, e.g. `Action|Sci-Fi`
    #[serde(default)]
    pub genres: String,
    #[serde(default)]
    pub avg_rating: f64,
    #[serde(default)]
    pub rating_count: u64,
}

impl Movie {
    pub fn genre_list(&self) -> Vec<&str> {
        crate::format::split_genres(&self.genres)
    }
}

/// Movie detail: the list fields plus rating statistics and the most recent
/// ratings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieDetail {
    #[serde(flatten)]
    pub movie: Movie,
    #[serde(default)]
    pub rating_stats: Option<RatingStats>,
    #[serde(default)]
    pub recent_ratings: Vec<Rating>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RatingStats {
    #[serde(default)]
    pub avg_rating: f64,
    #[serde(default)]
    pub total_count: u64,
    #[serde(default)]
    pub rating_distribution: BTreeMap<String, u64>,
}

/// One row of the distribution histogram
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DistributionRow {
    pub bucket: &'static str,
    pub count: u64,
}

impl RatingStats {
    /// Rows for buckets 5 down to 1. The half-star bucket is only included
    /// when something landed in it.
    pub fn distribution_rows(&self) -> Vec<DistributionRow> {
        RATING_BUCKETS
            .into_iter()
            .map(|bucket| DistributionRow {
                bucket,
                count: self.rating_distribution.get(bucket).copied().unwrap_or(0),
            })
            .filter(|row| row.bucket != "0.5" || row.count > 0)
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rating {
    #[serde(deserialize_with = "string_from_number_or_string")]
    pub user_id: String,
    #[serde(default, deserialize_with = "optional_string_from_number_or_string")]
    pub movie_id: Option<String>,
    pub rating: f64,
    #[serde(default, deserialize_with = "string_from_number_or_string")]
    pub timestamp: String,
}

/// One page of a paginated listing, already unwrapped from whatever response
/// shape the endpoint uses.
#[derive(Debug, Clone, PartialEq)]
pub struct Paged<T> {
    pub items: Vec<T>,
    pub page: u32,
    pub total_pages: u32,
    pub total: u64,
}

// Response bodies

#[derive(Debug, Deserialize)]
pub struct MovieListResponse {
    pub movies: Vec<Movie>,
    pub page: u32,
    pub total_pages: u32,
    pub total: u64,
}

impl From<MovieListResponse> for Paged<Movie> {
    fn from(resp: MovieListResponse) -> Self {
        Paged {
            items: resp.movies,
            page: resp.page,
            total_pages: resp.total_pages,
            total: resp.total,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct RatingListResponse {
    pub ratings: Vec<Rating>,
    pub page: u32,
    pub total_pages: u32,
    pub total: u64,
}

impl From<RatingListResponse> for Paged<Rating> {
    fn from(resp: RatingListResponse) -> Self {
        Paged {
            items: resp.ratings,
            page: resp.page,
            total_pages: resp.total_pages,
            total: resp.total,
        }
    }
}

/// Search returns either `{ movies, query, total }` or a bare array.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum SearchResponse {
    Wrapped { movies: Vec<Movie> },
    Bare(Vec<Movie>),
}

impl From<SearchResponse> for Vec<Movie> {
    fn from(resp: SearchResponse) -> Self {
        match resp {
            SearchResponse::Wrapped { movies } => movies,
            SearchResponse::Bare(movies) => movies,
        }
    }
}

/// Some deployments wrap every body in `{ "data": ... }`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum Envelope<T> {
    Wrapped { data: T },
    Bare(T),
}

impl<T> Envelope<T> {
    pub fn into_inner(self) -> T {
        match self {
            Envelope::Wrapped { data } => data,
            Envelope::Bare(inner) => inner,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrString {
    Number(serde_json::Number),
    Text(String),
}

impl NumberOrString {
    fn into_string(self) -> String {
        match self {
            NumberOrString::Number(n) => n.to_string(),
            NumberOrString::Text(s) => s,
        }
    }
}

fn id_from_number_or_string<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = NumberOrString::deserialize(deserializer)?.into_string();
    raw.trim()
        .parse()
        .map_err(|_| de::Error::custom(format!("invalid movie id: {:?}", raw)))
}

fn string_from_number_or_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(NumberOrString::deserialize(deserializer)?.into_string())
}

fn optional_string_from_number_or_string<'de, D>(
    deserializer: D,
) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<NumberOrString>::deserialize(deserializer)?.map(NumberOrString::into_string))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn movie_id_accepts_number_and_string() {
        let a: Movie = serde_json::from_str(r#"{"id": 42, "title": "Heat"}"#).unwrap();
        let b: Movie = serde_json::from_str(r#"{"id": "42", "title": "Heat"}"#).unwrap();
        assert_eq!(a.id, 42);
        assert_eq!(a, b);
        assert_eq!(a.avg_rating, 0.0);
        assert_eq!(a.rating_count, 0);
    }

    #[test]
    fn movie_id_rejects_non_numeric() {
        let res = serde_json::from_str::<Movie>(r#"{"id": "abc", "title": "Heat"}"#);
        assert!(res.is_err());
    }

    #[test]
    fn detail_parses_stats_and_recent_ratings() {
        let json = r#"{
            "id": "1",
            "title": "Toy Story (1995)",
            "genres": "Adventure|Animation|Children",
            "avg_rating": 3.92,
            "rating_count": 215,
            "recent_ratings": [
                {"user_id": "7", "movie_id": "1", "rating": 4.5, "timestamp": "964982703"},
                {"user_id": 9, "rating": 3, "timestamp": 964982931}
            ],
            "rating_stats": {
                "avg_rating": 3.92,
                "total_count": 215,
                "rating_distribution": {"5": 40, "4": 100, "3": 50, "2": 20, "1": 5}
            }
        }"#;
        let detail: MovieDetail = serde_json::from_str(json).unwrap();
        assert_eq!(detail.movie.id, 1);
        assert_eq!(detail.movie.genre_list(), vec!["Adventure", "Animation", "Children"]);
        assert_eq!(detail.recent_ratings.len(), 2);
        assert_eq!(detail.recent_ratings[1].user_id, "9");
        assert_eq!(detail.recent_ratings[1].movie_id, None);
        assert_eq!(detail.recent_ratings[1].timestamp, "964982931");
        let stats = detail.rating_stats.unwrap();
        assert_eq!(stats.total_count, 215);
        assert_eq!(stats.rating_distribution["4"], 100);
    }

    #[test]
    fn detail_without_stats() {
        let detail: MovieDetail =
            serde_json::from_str(r#"{"id": 3, "title": "Grumpier Old Men"}"#).unwrap();
        assert!(detail.rating_stats.is_none());
        assert!(detail.recent_ratings.is_empty());
    }

    #[test]
    fn distribution_rows_skip_empty_half_star_bucket() {
        let stats = RatingStats {
            avg_rating: 4.0,
            total_count: 3,
            rating_distribution: BTreeMap::from([("5".to_string(), 2), ("3".to_string(), 1)]),
        };
        let rows = stats.distribution_rows();
        let buckets: Vec<_> = rows.iter().map(|r| r.bucket).collect();
        assert_eq!(buckets, vec!["5", "4", "3", "2", "1"]);
        assert_eq!(rows[0].count, 2);
        assert_eq!(rows[1].count, 0);
    }

    #[test]
    fn distribution_rows_keep_populated_half_star_bucket() {
        let stats = RatingStats {
            rating_distribution: BTreeMap::from([("0.5".to_string(), 4)]),
            ..Default::default()
        };
        let rows = stats.distribution_rows();
        assert_eq!(rows.len(), 6);
        assert_eq!(rows[5], DistributionRow { bucket: "0.5", count: 4 });
    }

    #[test]
    fn list_response_unwraps_into_page() {
        let json = r#"{"movies": [{"id": 1, "title": "A"}], "total": 41, "page": 2, "page_size": 20, "total_pages": 3}"#;
        let resp: MovieListResponse = serde_json::from_str(json).unwrap();
        let page: Paged<Movie> = resp.into();
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.page, 2);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.total, 41);
    }

    #[test]
    fn search_accepts_wrapped_and_bare() {
        let wrapped: SearchResponse = serde_json::from_str(
            r#"{"movies": [{"id": 1, "title": "A"}], "query": "a", "total": 1}"#,
        )
        .unwrap();
        let bare: SearchResponse =
            serde_json::from_str(r#"[{"id": 1, "title": "A"}, {"id": 2, "title": "B"}]"#).unwrap();
        assert_eq!(Vec::<Movie>::from(wrapped).len(), 1);
        assert_eq!(Vec::<Movie>::from(bare).len(), 2);
    }

    #[test]
    fn envelope_strips_data_wrapper() {
        let wrapped: Envelope<Vec<Movie>> =
            serde_json::from_str(r#"{"data": [{"id": 5, "title": "E"}]}"#).unwrap();
        let bare: Envelope<Vec<Movie>> =
            serde_json::from_str(r#"[{"id": 5, "title": "E"}]"#).unwrap();
        assert_eq!(wrapped.into_inner(), bare.into_inner());
    }
}
