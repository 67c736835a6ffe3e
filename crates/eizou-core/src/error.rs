use thiserror::Error;

#[derive(Debug, Error)]
pub enum EizouError {
    #[error("config error: {0}")]
    Config(String),

    #[error("catalog load failed: {0}")]
    Load(#[from] LoadError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Failure to fetch or parse the catalog document.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("HTTP error: {0}")]
    Fetch(#[from] reqwest::Error),

    #[error("catalog fetch returned status {status} for {url}")]
    Status { status: u16, url: String },

    #[error("invalid catalog source: {0}")]
    InvalidSource(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// A page parameter did not resolve to an entity in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    #[error("missing or invalid page parameter `{0}`")]
    Param(&'static str),

    #[error("anime not found: {0}")]
    Anime(String),

    #[error("season {index} not found for anime {anime_id}")]
    Season { anime_id: String, index: usize },

    #[error("episode {number} not found in season {season}")]
    Episode { season: String, number: u32 },
}

/// Rejected admin edit. Nothing in the working copy changes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("season already exists: {0}")]
    DuplicateSeason(String),

    #[error("episode {0} already exists")]
    DuplicateEpisode(u32),

    #[error("anime not found: {0}")]
    AnimeNotFound(String),

    #[error("season {0} not found")]
    SeasonNotFound(usize),

    #[error("episode {0} not found")]
    EpisodeNotFound(u32),
}
