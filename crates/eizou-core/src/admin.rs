//! Admin editing of a private working copy of the catalog.
//!
//! Edits never touch the display copy. Deletes are two-step: a `request_*`
//! call validates the target and returns a [`PendingDelete`] carrying the
//! confirmation prompt; only [`AdminEditor::confirm`] removes anything.

mod form;
mod selection;

pub use form::{AnimeForm, EpisodeForm, ProviderSlot, SlotKind};
pub use selection::AdminSelection;

use chrono::Utc;

use crate::error::ValidationError;
use crate::models::{Anime, Catalog, Season};

/// What a successful edit did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdminOutcome {
    AnimeAdded(String),
    AnimeUpdated(String),
    AnimeDeleted(String),
    SeasonAdded(String),
    SeasonRenamed(String),
    SeasonDeleted(String),
    EpisodeAdded(u32),
    EpisodeUpdated(u32),
    EpisodeDeleted(u32),
}

/// A delete awaiting confirmation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingDelete {
    Anime {
        id: String,
    },
    Season {
        anime_id: String,
        index: usize,
    },
    Episode {
        anime_id: String,
        season: usize,
        number: u32,
    },
}

impl PendingDelete {
    pub fn prompt(&self) -> &'static str {
        match self {
            Self::Anime { .. } => "Delete entire anime?",
            Self::Season { .. } => "Delete this season? All episodes will be removed.",
            Self::Episode { .. } => "Delete this episode?",
        }
    }
}

#[derive(Debug, Clone)]
pub struct AdminEditor {
    working: Catalog,
    selection: AdminSelection,
}

impl AdminEditor {
    /// Start editing a deep copy of `catalog`.
    pub fn new(catalog: Catalog) -> Self {
        let selection = AdminSelection::new(&catalog);
        Self {
            working: catalog,
            selection,
        }
    }

    pub fn working_copy(&self) -> &Catalog {
        &self.working
    }

    pub fn selection(&self) -> &AdminSelection {
        &self.selection
    }

    pub fn selection_mut(&mut self) -> &mut AdminSelection {
        &mut self.selection
    }

    /// Apply a selection change and re-validate it against the working copy.
    pub fn select(&mut self, f: impl FnOnce(&mut AdminSelection)) {
        f(&mut self.selection);
        self.selection.refresh(&self.working);
    }

    /// Pretty JSON of the working copy, as it would be published.
    pub fn preview(&self) -> String {
        self.working.to_pretty_json().unwrap_or_default()
    }

    // ── Anime ───────────────────────────────────────────────────

    /// Add a new anime or overwrite an existing one with the same id.
    pub fn upsert_anime(&mut self, form: &AnimeForm) -> Result<AdminOutcome, ValidationError> {
        let id = form.id.trim();
        let title = form.title.trim();
        if id.is_empty() {
            return Err(ValidationError::MissingField("id"));
        }
        if title.is_empty() {
            return Err(ValidationError::MissingField("title"));
        }
        let now = Utc::now().timestamp_millis();

        let outcome = match self.working.find_mut(id) {
            Some(anime) => {
                anime.title = title.to_string();
                anime.poster = form.poster.trim().to_string();
                anime.description = form.description.trim().to_string();
                anime.updated = now;
                AdminOutcome::AnimeUpdated(id.to_string())
            }
            None => {
                self.working.push(Anime {
                    id: id.to_string(),
                    title: title.to_string(),
                    poster: form.poster.trim().to_string(),
                    description: form.description.trim().to_string(),
                    popularity: 0.0,
                    trending: 0.0,
                    updated: now,
                    seasons: Vec::new(),
                });
                AdminOutcome::AnimeAdded(id.to_string())
            }
        };
        tracing::debug!(?outcome, "anime upserted");
        self.selection.refresh(&self.working);
        Ok(outcome)
    }

    pub fn request_delete_anime(&self, id: &str) -> Result<PendingDelete, ValidationError> {
        let id = id.trim();
        if id.is_empty() {
            return Err(ValidationError::MissingField("id"));
        }
        self.anime(id)?;
        Ok(PendingDelete::Anime { id: id.to_string() })
    }

    // ── Seasons ─────────────────────────────────────────────────

    pub fn add_season(&mut self, anime_id: &str, name: &str) -> Result<AdminOutcome, ValidationError> {
        let name = name.trim();
        if anime_id.is_empty() {
            return Err(ValidationError::MissingField("anime"));
        }
        if name.is_empty() {
            return Err(ValidationError::MissingField("season name"));
        }
        let anime = self.anime_mut(anime_id)?;
        if anime.seasons.iter().any(|s| s.name == name) {
            return Err(ValidationError::DuplicateSeason(name.to_string()));
        }
        anime.seasons.push(Season::new(name));
        self.selection.refresh(&self.working);
        Ok(AdminOutcome::SeasonAdded(name.to_string()))
    }

    pub fn rename_season(
        &mut self,
        anime_id: &str,
        index: usize,
        name: &str,
    ) -> Result<AdminOutcome, ValidationError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ValidationError::MissingField("season name"));
        }
        let anime = self.anime_mut(anime_id)?;
        if index >= anime.seasons.len() {
            return Err(ValidationError::SeasonNotFound(index));
        }
        if anime
            .seasons
            .iter()
            .enumerate()
            .any(|(i, s)| i != index && s.name == name)
        {
            return Err(ValidationError::DuplicateSeason(name.to_string()));
        }
        anime.seasons[index].name = name.to_string();
        self.selection.refresh(&self.working);
        Ok(AdminOutcome::SeasonRenamed(name.to_string()))
    }

    pub fn request_delete_season(
        &self,
        anime_id: &str,
        index: usize,
    ) -> Result<PendingDelete, ValidationError> {
        self.anime(anime_id)?
            .season(index)
            .ok_or(ValidationError::SeasonNotFound(index))?;
        Ok(PendingDelete::Season {
            anime_id: anime_id.to_string(),
            index,
        })
    }

    // ── Episodes ────────────────────────────────────────────────

    /// Add an episode. A number already present in the season is rejected;
    /// use [`AdminEditor::update_episode`] for that.
    pub fn add_episode(
        &mut self,
        anime_id: &str,
        season: usize,
        form: &EpisodeForm,
    ) -> Result<AdminOutcome, ValidationError> {
        let s = self.season_mut(anime_id, season)?;
        if s.episode(form.number).is_some() {
            return Err(ValidationError::DuplicateEpisode(form.number));
        }
        s.episodes.push(form.to_episode());
        self.selection.refresh(&self.working);
        Ok(AdminOutcome::EpisodeAdded(form.number))
    }

    /// Replace the whole episode record whose number matches the form.
    pub fn update_episode(
        &mut self,
        anime_id: &str,
        season: usize,
        form: &EpisodeForm,
    ) -> Result<AdminOutcome, ValidationError> {
        let s = self.season_mut(anime_id, season)?;
        let pos = s
            .position(form.number)
            .ok_or(ValidationError::EpisodeNotFound(form.number))?;
        s.episodes[pos] = form.to_episode();
        self.selection.refresh(&self.working);
        Ok(AdminOutcome::EpisodeUpdated(form.number))
    }

    /// Load a stored episode into a form for editing.
    pub fn episode_form(
        &self,
        anime_id: &str,
        season: usize,
        number: u32,
    ) -> Result<EpisodeForm, ValidationError> {
        let s = self
            .anime(anime_id)?
            .season(season)
            .ok_or(ValidationError::SeasonNotFound(season))?;
        s.episode(number)
            .map(EpisodeForm::from_episode)
            .ok_or(ValidationError::EpisodeNotFound(number))
    }

    pub fn request_delete_episode(
        &self,
        anime_id: &str,
        season: usize,
        number: u32,
    ) -> Result<PendingDelete, ValidationError> {
        let s = self
            .anime(anime_id)?
            .season(season)
            .ok_or(ValidationError::SeasonNotFound(season))?;
        s.episode(number)
            .ok_or(ValidationError::EpisodeNotFound(number))?;
        Ok(PendingDelete::Episode {
            anime_id: anime_id.to_string(),
            season,
            number,
        })
    }

    // ── Confirmation ────────────────────────────────────────────

    /// Carry out a confirmed delete. Season deletes cascade to their episodes.
    pub fn confirm(&mut self, pending: PendingDelete) -> Result<AdminOutcome, ValidationError> {
        let outcome = match pending {
            PendingDelete::Anime { id } => {
                if !self.working.remove(&id) {
                    return Err(ValidationError::AnimeNotFound(id));
                }
                AdminOutcome::AnimeDeleted(id)
            }
            PendingDelete::Season { anime_id, index } => {
                let anime = self.anime_mut(&anime_id)?;
                if index >= anime.seasons.len() {
                    return Err(ValidationError::SeasonNotFound(index));
                }
                let removed = anime.seasons.remove(index);
                AdminOutcome::SeasonDeleted(removed.name)
            }
            PendingDelete::Episode {
                anime_id,
                season,
                number,
            } => {
                let s = self.season_mut(&anime_id, season)?;
                let before = s.episodes.len();
                s.episodes.retain(|ep| ep.number != number);
                if s.episodes.len() == before {
                    return Err(ValidationError::EpisodeNotFound(number));
                }
                AdminOutcome::EpisodeDeleted(number)
            }
        };
        tracing::debug!(?outcome, "delete confirmed");
        self.selection.refresh(&self.working);
        Ok(outcome)
    }

    fn anime(&self, id: &str) -> Result<&Anime, ValidationError> {
        self.working
            .find(id)
            .ok_or_else(|| ValidationError::AnimeNotFound(id.to_string()))
    }

    fn anime_mut(&mut self, id: &str) -> Result<&mut Anime, ValidationError> {
        self.working
            .find_mut(id)
            .ok_or_else(|| ValidationError::AnimeNotFound(id.to_string()))
    }

    fn season_mut(&mut self, anime_id: &str, index: usize) -> Result<&mut Season, ValidationError> {
        self.anime_mut(anime_id)?
            .season_mut(index)
            .ok_or(ValidationError::SeasonNotFound(index))
    }
}
