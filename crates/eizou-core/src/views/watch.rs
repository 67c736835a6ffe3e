use crate::error::LookupError;
use crate::models::{Catalog, Server};
use crate::node::Node;

use super::{download_href, resolve_episode, watch_href};

/// Player chrome for one episode.
///
/// Previous/next assume episode numbers run densely from 1 up to the
/// season's episode count; gaps in numbering are not detected.
#[derive(Debug, Clone)]
pub struct WatchView {
    pub title: String,
    pub subtitle: String,
    pub servers: Vec<Server>,
    pub active: Option<usize>,
    pub prev_href: Option<String>,
    pub next_href: Option<String>,
    pub download_href: String,
}

impl WatchView {
    pub fn new(
        catalog: &Catalog,
        anime_id: &str,
        season: usize,
        number: u32,
    ) -> Result<Self, LookupError> {
        let (anime, s, ep) = resolve_episode(catalog, anime_id, season, number)?;
        let count = s.episodes.len() as u32;

        Ok(Self {
            title: format!("{} – Episode {}", anime.title, number),
            subtitle: s.name.clone(),
            servers: ep.stream_servers.clone(),
            active: (!ep.stream_servers.is_empty()).then_some(0),
            prev_href: (number > 1).then(|| watch_href(&anime.id, season, number - 1)),
            next_href: (number < count).then(|| watch_href(&anime.id, season, number + 1)),
            download_href: download_href(&anime.id, season, number),
        })
    }

    /// Switch playback to another server. Out-of-range indices are ignored.
    pub fn select_server(&mut self, index: usize) {
        if index < self.servers.len() {
            self.active = Some(index);
        }
    }

    /// URL currently loaded in the player.
    pub fn player_url(&self) -> Option<&str> {
        self.active
            .and_then(|i| self.servers.get(i))
            .map(|s| s.url.as_str())
    }
}

pub fn render(view: &WatchView) -> Node {
    let player = match view.player_url() {
        Some(url) => Node::el("iframe")
            .id("video-player")
            .attr("src", url)
            .attr("allowfullscreen", "true"),
        None => Node::el("iframe").id("video-player"),
    };

    let servers = Node::el("div")
        .id("server-list")
        .children(view.servers.iter().enumerate().map(|(i, srv)| {
            let class = if view.active == Some(i) {
                "btn-primary small-btn server-btn active"
            } else {
                "btn-primary small-btn server-btn"
            };
            Node::el("button")
                .class(class)
                .attr("data-url", srv.url.as_str())
                .text(srv.name.as_str())
        }));

    let nav_link = |id: &str, label: &str, href: &Option<String>| match href {
        Some(href) => Node::el("a").id(id).attr("href", href.as_str()).text(label),
        None => Node::el("span").id(id).class("disabled").text(label),
    };

    let nav = Node::el("nav").class("episode-nav").children([
        nav_link("prev-ep", "Previous", &view.prev_href),
        Node::el("a")
            .id("download-btn")
            .attr("href", view.download_href.as_str())
            .text("Download"),
        nav_link("next-ep", "Next", &view.next_href),
    ]);

    Node::el("main").class("watch-page").children([
        Node::el("h1").id("watch-title").text(view.title.as_str()),
        Node::el("p").id("watch-subtitle").text(view.subtitle.as_str()),
        player,
        servers,
        nav,
    ])
}
