use crate::error::LookupError;
use crate::models::Catalog;
use crate::node::Node;

use super::{resolve_season, watch_href};

#[derive(Debug, Clone, PartialEq)]
pub struct EpisodeRow {
    pub number: u32,
    pub title: String,
    pub watch_href: String,
}

/// Episode list for one anime, showing one season at a time.
#[derive(Debug, Clone)]
pub struct EpisodesView {
    pub anime_id: String,
    pub title: String,
    pub description: String,
    pub poster: String,
    /// `(index, name)` pairs for the season selector.
    pub seasons: Vec<(usize, String)>,
    pub selected: usize,
    pub episodes: Vec<EpisodeRow>,
}

impl EpisodesView {
    pub fn new(catalog: &Catalog, anime_id: &str, season: usize) -> Result<Self, LookupError> {
        let (anime, _) = resolve_season(catalog, anime_id, season)?;
        let mut view = Self {
            anime_id: anime.id.clone(),
            title: anime.title.clone(),
            description: anime.description.clone(),
            poster: anime.poster.clone(),
            seasons: anime
                .seasons
                .iter()
                .enumerate()
                .map(|(i, s)| (i, s.name.clone()))
                .collect(),
            selected: season,
            episodes: Vec::new(),
        };
        view.select_season(catalog, season)?;
        Ok(view)
    }

    /// Switch to another season in place, without navigating.
    pub fn select_season(&mut self, catalog: &Catalog, season: usize) -> Result<(), LookupError> {
        let (anime, s) = resolve_season(catalog, &self.anime_id, season)?;
        self.selected = season;
        self.episodes = s
            .episodes
            .iter()
            .map(|ep| EpisodeRow {
                number: ep.number,
                title: ep.title.clone(),
                watch_href: watch_href(&anime.id, season, ep.number),
            })
            .collect();
        Ok(())
    }
}

pub fn render(view: &EpisodesView) -> Node {
    let header = Node::el("header").class("anime-header").children([
        Node::el("img")
            .id("anime-poster")
            .attr("src", view.poster.as_str()),
        Node::el("h1").id("anime-title").text(view.title.as_str()),
        Node::el("p")
            .id("anime-description")
            .text(view.description.as_str()),
    ]);

    let select = Node::el("select")
        .id("season-select")
        .children(view.seasons.iter().map(|(i, name)| {
            let option = Node::el("option").attr("value", i.to_string());
            let option = if *i == view.selected {
                option.attr("selected", "selected")
            } else {
                option
            };
            option.text(name.as_str())
        }));

    let list = Node::el("div")
        .id("episodes-list")
        .children(view.episodes.iter().map(|ep| {
            Node::el("div").class("episode-card").children([
                Node::el("div").children([
                    Node::el("h3").text(ep.title.as_str()),
                    Node::el("p").text(format!("Episode {}", ep.number)),
                ]),
                Node::el("a")
                    .class("btn-primary")
                    .attr("href", ep.watch_href.as_str())
                    .text("Watch"),
            ])
        }));

    Node::el("main")
        .class("episodes-page")
        .children([header, select, list])
}
