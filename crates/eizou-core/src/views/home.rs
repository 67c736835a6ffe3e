use crate::models::{Anime, Catalog};
use crate::node::Node;

use super::episodes_href;

/// Which sort key a home row uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HomeRowKind {
    Latest,
    Popular,
    Trending,
}

impl HomeRowKind {
    pub const ALL: &[HomeRowKind] = &[Self::Latest, Self::Popular, Self::Trending];

    pub fn element_id(self) -> &'static str {
        match self {
            Self::Latest => "latest-row",
            Self::Popular => "popular-row",
            Self::Trending => "trending-row",
        }
    }

    fn key(self, anime: &Anime) -> f64 {
        match self {
            Self::Latest => anime.updated as f64,
            Self::Popular => anime.popularity,
            Self::Trending => anime.trending,
        }
    }
}

impl std::fmt::Display for HomeRowKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Latest => write!(f, "Latest Updates"),
            Self::Popular => write!(f, "Popular"),
            Self::Trending => write!(f, "Trending"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Card {
    pub anime_id: String,
    pub title: String,
    pub poster: String,
    pub href: String,
}

impl Card {
    pub fn from_anime(anime: &Anime) -> Self {
        Self {
            anime_id: anime.id.clone(),
            title: anime.title.clone(),
            poster: anime.poster.clone(),
            href: episodes_href(&anime.id),
        }
    }
}

#[derive(Debug, Clone)]
pub struct HomeRow {
    pub kind: HomeRowKind,
    pub cards: Vec<Card>,
}

/// The three home rows, each the whole catalog in a different order.
pub fn rows(catalog: &Catalog) -> Vec<HomeRow> {
    HomeRowKind::ALL
        .iter()
        .map(|&kind| HomeRow {
            kind,
            cards: catalog
                .sorted_desc_by(|a| kind.key(a))
                .into_iter()
                .map(Card::from_anime)
                .collect(),
        })
        .collect()
}

pub fn render_row(row: &HomeRow) -> Node {
    Node::el("section").class("home-row").children([
        Node::el("h2").text(row.kind.to_string()),
        Node::el("div")
            .id(row.kind.element_id())
            .class("row-scroll")
            .children(row.cards.iter().map(|card| {
                Node::el("a")
                    .class("anime-card")
                    .attr("href", card.href.as_str())
                    .children([
                        Node::el("img").attr("src", card.poster.as_str()),
                        Node::el("div").class("card-title").text(card.title.as_str()),
                    ])
            })),
    ])
}

pub fn render(rows: &[HomeRow]) -> Node {
    Node::el("div")
        .class("home-rows")
        .children(rows.iter().map(render_row))
}
