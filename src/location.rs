use std::fmt;

/// Where the user is. Every view is reachable from a location string such as
/// `/movies?page=3` or `/movies/42/ratings?page=2`, and every navigation goes
/// through one of these.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Location {
    Movies { page: u32 },
    Search { query: String },
    Movie { id: u64 },
    Ratings { id: u64, page: u32 },
}

impl Default for Location {
    fn default() -> Self {
        Location::Movies { page: 1 }
    }
}

/// Parse a raw `page` query value. Absent, non-numeric and sub-1 values all
/// mean page 1.
pub fn parse_page(raw: Option<&str>) -> u32 {
    raw.and_then(|s| s.trim().parse::<u32>().ok())
        .filter(|&page| page >= 1)
        .unwrap_or(1)
}

impl Location {
    /// Parse a location string. Unknown paths fall back to the first page of
    /// the movie list.
    pub fn parse(input: &str) -> Self {
        let input = input.trim();
        let (path, query) = input.split_once('?').unwrap_or((input, ""));
        let page = parse_page(query_param(query, "page").as_deref());

        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        match segments.as_slice() {
            ["movies", "search"] | ["search"] => match query_param(query, "q") {
                Some(q) if !q.trim().is_empty() => Location::Search {
                    query: q.trim().to_string(),
                },
                _ => Location::Movies { page: 1 },
            },
            ["movies", id] => match id.parse() {
                Ok(id) => Location::Movie { id },
                Err(_) => Location::Movies { page },
            },
            ["movies", id, "ratings"] => match id.parse() {
                Ok(id) => Location::Ratings { id, page },
                Err(_) => Location::Movies { page },
            },
            _ => Location::Movies { page },
        }
    }

    /// Same location, different page. Only paginated locations change.
    pub fn with_page(&self, page: u32) -> Self {
        match self {
            Location::Movies { .. } => Location::Movies { page },
            Location::Ratings { id, .. } => Location::Ratings { id: *id, page },
            other => other.clone(),
        }
    }

    pub fn page(&self) -> Option<u32> {
        match self {
            Location::Movies { page } | Location::Ratings { page, .. } => Some(*page),
            _ => None,
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Location::Movies { page } => write!(f, "/movies?page={}", page),
            Location::Search { query } => {
                write!(f, "/movies/search?q={}", urlencoding::encode(query))
            }
            Location::Movie { id } => write!(f, "/movies/{}", id),
            Location::Ratings { id, page } => write!(f, "/movies/{}/ratings?page={}", id, page),
        }
    }
}

fn query_param(query: &str, key: &str) -> Option<String> {
    query
        .split('&')
        .filter_map(|pair| pair.split_once('=').or(Some((pair, ""))))
        .find(|(k, _)| *k == key)
        .map(|(_, v)| {
            let v = v.replace('+', " ");
            urlencoding::decode(&v)
                .map(|d| d.into_owned())
                .unwrap_or(v)
        })
}

/// Back stack of visited locations.
#[derive(Debug, Default)]
pub struct History {
    entries: Vec<Location>,
}

impl History {
    pub fn push(&mut self, location: Location) {
        self.entries.push(location);
    }

    pub fn pop(&mut self) -> Option<Location> {
        self.entries.pop()
    }
}
