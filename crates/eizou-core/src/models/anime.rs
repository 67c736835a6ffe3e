use serde::{Deserialize, Serialize, Serializer};

/// A named mirror endpoint attached to an episode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Server {
    pub name: String,
    pub url: String,
}

impl Server {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
        }
    }
}

/// A single episode. `number` is the lookup key within its season and is
/// not guaranteed to be contiguous or sorted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Episode {
    pub number: u32,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub stream_servers: Vec<Server>,
    #[serde(default)]
    pub download_servers: Vec<Server>,
}

/// A season, keyed for display by its `name`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Season {
    pub name: String,
    #[serde(default)]
    pub episodes: Vec<Episode>,
}

impl Season {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            episodes: Vec::new(),
        }
    }

    pub fn episode(&self, number: u32) -> Option<&Episode> {
        self.episodes.iter().find(|ep| ep.number == number)
    }

    pub fn position(&self, number: u32) -> Option<usize> {
        self.episodes.iter().position(|ep| ep.number == number)
    }
}

/// Core catalog entity.
///
/// `popularity`, `trending` and `updated` are plain sort keys, entered by
/// the operator or stamped at mutation time (`updated`, unix millis).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Anime {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub poster: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, serialize_with = "whole_as_integer")]
    pub popularity: f64,
    #[serde(default, serialize_with = "whole_as_integer")]
    pub trending: f64,
    #[serde(default)]
    pub updated: i64,
    pub seasons: Vec<Season>,
}

impl Anime {
    pub fn season(&self, index: usize) -> Option<&Season> {
        self.seasons.get(index)
    }

    pub fn season_mut(&mut self, index: usize) -> Option<&mut Season> {
        self.seasons.get_mut(index)
    }
}

/// Write whole sort keys as integers so `95` round-trips as `95`, not `95.0`.
fn whole_as_integer<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    const MAX_EXACT: f64 = 9_007_199_254_740_992.0;
    if value.fract() == 0.0 && value.abs() <= MAX_EXACT {
        serializer.serialize_i64(*value as i64)
    } else {
        serializer.serialize_f64(*value)
    }
}
