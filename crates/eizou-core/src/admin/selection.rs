use crate::models::Catalog;

/// Dropdown state of the admin editor.
///
/// The season pane and the episode pane each pick their own anime. After
/// every mutation [`AdminSelection::refresh`] re-validates all choices, so no
/// dropdown ever points at an entity that has been removed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdminSelection {
    pub season_anime: Option<String>,
    pub season_index: Option<usize>,
    pub episode_anime: Option<String>,
    pub episode_season: Option<usize>,
    pub episode_number: Option<u32>,
}

impl AdminSelection {
    /// Initial selection: first anime, first season, first episode.
    pub fn new(catalog: &Catalog) -> Self {
        let mut selection = Self::default();
        selection.refresh(catalog);
        selection
    }

    /// Clamp every choice to what exists in `catalog`, falling back to the
    /// first available option.
    pub fn refresh(&mut self, catalog: &Catalog) {
        let first_id = catalog.anime().first().map(|a| a.id.clone());

        if self
            .season_anime
            .as_deref()
            .map_or(true, |id| catalog.find(id).is_none())
        {
            self.season_anime = first_id.clone();
            self.season_index = None;
        }
        let season_count = self
            .season_anime
            .as_deref()
            .and_then(|id| catalog.find(id))
            .map_or(0, |a| a.seasons.len());
        self.season_index = clamp_index(self.season_index, season_count);

        if self
            .episode_anime
            .as_deref()
            .map_or(true, |id| catalog.find(id).is_none())
        {
            self.episode_anime = first_id;
            self.episode_season = None;
        }
        let anime = self.episode_anime.as_deref().and_then(|id| catalog.find(id));
        let season_count = anime.map_or(0, |a| a.seasons.len());
        self.episode_season = clamp_index(self.episode_season, season_count);

        let season = anime.zip(self.episode_season).and_then(|(a, i)| a.season(i));
        self.episode_number = match season {
            Some(s) => match self.episode_number {
                Some(n) if s.episode(n).is_some() => Some(n),
                _ => s.episodes.first().map(|ep| ep.number),
            },
            None => None,
        };
    }
}

fn clamp_index(current: Option<usize>, len: usize) -> Option<usize> {
    match current {
        _ if len == 0 => None,
        Some(i) if i < len => Some(i),
        _ => Some(0),
    }
}
