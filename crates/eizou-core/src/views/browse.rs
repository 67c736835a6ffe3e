use crate::models::Catalog;
use crate::node::Node;

use super::home::Card;

/// Browse grid with a live, case-insensitive title filter.
///
/// The filter is recomputed on every [`BrowseView::filter`] call; there is
/// no debounce.
#[derive(Debug, Clone)]
pub struct BrowseView {
    all: Vec<Card>,
    query: String,
    visible: Vec<usize>,
}

impl BrowseView {
    pub fn new(catalog: &Catalog) -> Self {
        let all: Vec<Card> = catalog.anime().iter().map(Card::from_anime).collect();
        let visible = (0..all.len()).collect();
        Self {
            all,
            query: String::new(),
            visible,
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn filter(&mut self, query: &str) {
        self.query = query.to_string();
        let needle = query.to_lowercase();
        self.visible = self
            .all
            .iter()
            .enumerate()
            .filter(|(_, c)| c.title.to_lowercase().contains(&needle))
            .map(|(i, _)| i)
            .collect();
    }

    pub fn cards(&self) -> impl Iterator<Item = &Card> {
        self.visible.iter().map(|&i| &self.all[i])
    }

    pub fn titles(&self) -> Vec<&str> {
        self.cards().map(|c| c.title.as_str()).collect()
    }
}

pub fn render(view: &BrowseView) -> Node {
    Node::el("div").id("browse-list").class("browse-grid").children(
        view.cards().map(|card| {
            Node::el("a")
                .class("browse-card")
                .attr("href", card.href.as_str())
                .children([
                    Node::el("img").attr("src", card.poster.as_str()),
                    Node::el("h3").text(card.title.as_str()),
                ])
        }),
    )
}
