//! Page view-models and their renderers.
//!
//! Every view is split in two: a view-model built from `&Catalog` plus page
//! parameters (pure, no I/O), and a `render` function producing a [`Node`].
//! A failed lookup is a [`LookupError`]; callers render such pages inert.
//!
//! [`Node`]: crate::node::Node
//! [`LookupError`]: crate::error::LookupError

pub mod admin;
pub mod browse;
pub mod download;
pub mod episodes;
pub mod hero;
pub mod home;
pub mod watch;

use url::form_urlencoded;

use crate::error::LookupError;
use crate::models::{Anime, Catalog, Episode, Season};

/// Link to an anime's episode list.
pub fn episodes_href(anime_id: &str) -> String {
    format!("episodes.html?{}", query(&[("id", anime_id)]))
}

/// Link to the watch page for one episode.
pub fn watch_href(anime_id: &str, season: usize, episode: u32) -> String {
    format!(
        "watch.html?{}",
        query(&[
            ("id", anime_id),
            ("s", &season.to_string()),
            ("e", &episode.to_string()),
        ])
    )
}

/// Link to the download page for one episode.
pub fn download_href(anime_id: &str, season: usize, episode: u32) -> String {
    format!(
        "download.html?{}",
        query(&[
            ("id", anime_id),
            ("s", &season.to_string()),
            ("e", &episode.to_string()),
        ])
    )
}

fn query(pairs: &[(&str, &str)]) -> String {
    form_urlencoded::Serializer::new(String::new())
        .extend_pairs(pairs)
        .finish()
}

/// Resolve an `(id, season index)` pair.
pub(crate) fn resolve_season<'a>(
    catalog: &'a Catalog,
    anime_id: &str,
    season: usize,
) -> Result<(&'a Anime, &'a Season), LookupError> {
    let anime = catalog
        .find(anime_id)
        .ok_or_else(|| LookupError::Anime(anime_id.to_string()))?;
    let s = anime.season(season).ok_or_else(|| LookupError::Season {
        anime_id: anime_id.to_string(),
        index: season,
    })?;
    Ok((anime, s))
}

/// Resolve an `(id, season index, episode number)` triple.
pub(crate) fn resolve_episode<'a>(
    catalog: &'a Catalog,
    anime_id: &str,
    season: usize,
    number: u32,
) -> Result<(&'a Anime, &'a Season, &'a Episode), LookupError> {
    let (anime, s) = resolve_season(catalog, anime_id, season)?;
    let ep = s.episode(number).ok_or_else(|| LookupError::Episode {
        season: s.name.clone(),
        number,
    })?;
    Ok((anime, s, ep))
}
