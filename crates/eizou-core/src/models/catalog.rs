use serde::{Deserialize, Serialize};

use super::Anime;

/// The full ordered collection of anime.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Catalog(pub Vec<Anime>);

impl Catalog {
    pub fn new(anime: Vec<Anime>) -> Self {
        Self(anime)
    }

    pub fn anime(&self) -> &[Anime] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn find(&self, id: &str) -> Option<&Anime> {
        self.0.iter().find(|a| a.id == id)
    }

    pub fn find_mut(&mut self, id: &str) -> Option<&mut Anime> {
        self.0.iter_mut().find(|a| a.id == id)
    }

    pub fn push(&mut self, anime: Anime) {
        self.0.push(anime);
    }

    /// Remove by id, returning whether anything was removed.
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.0.len();
        self.0.retain(|a| a.id != id);
        self.0.len() != before
    }

    /// Return a copy of the catalog ordered by `key` descending.
    ///
    /// Ties keep no documented order.
    pub fn sorted_desc_by<F>(&self, key: F) -> Vec<&Anime>
    where
        F: Fn(&Anime) -> f64,
    {
        let mut list: Vec<&Anime> = self.0.iter().collect();
        list.sort_by(|a, b| key(b).total_cmp(&key(a)));
        list
    }

    /// Two-space indented JSON, used for the admin preview and publishing.
    pub fn to_pretty_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

impl From<Vec<Anime>> for Catalog {
    fn from(anime: Vec<Anime>) -> Self {
        Self(anime)
    }
}
