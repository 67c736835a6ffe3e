use crate::error::LookupError;
use crate::models::{Catalog, Server};
use crate::node::Node;

use super::resolve_episode;

/// Seconds the links stay hidden when nothing else is configured.
pub const DEFAULT_COUNTDOWN_SECS: u32 = 10;

/// Countdown gating the download links.
///
/// Once it reaches zero the links are revealed and stay revealed; later
/// ticks do nothing. Elapsed time is not persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Countdown {
    remaining: u32,
    revealed: bool,
}

/// Result of one countdown tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    Waiting(u32),
    /// The tick that revealed the links. Emitted exactly once.
    Revealed,
    Done,
}

impl Countdown {
    pub fn new(secs: u32) -> Self {
        Self {
            remaining: secs,
            revealed: secs == 0,
        }
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    pub fn revealed(&self) -> bool {
        self.revealed
    }

    pub fn tick(&mut self) -> Tick {
        if self.revealed {
            return Tick::Done;
        }
        self.remaining = self.remaining.saturating_sub(1);
        if self.remaining == 0 {
            self.revealed = true;
            Tick::Revealed
        } else {
            Tick::Waiting(self.remaining)
        }
    }

    pub fn message(&self) -> String {
        format!("Please wait {} seconds…", self.remaining)
    }
}

impl Default for Countdown {
    fn default() -> Self {
        Self::new(DEFAULT_COUNTDOWN_SECS)
    }
}

#[derive(Debug, Clone)]
pub struct DownloadView {
    pub title: String,
    pub subtitle: String,
    pub links: Vec<Server>,
    pub countdown: Countdown,
}

impl DownloadView {
    pub fn new(
        catalog: &Catalog,
        anime_id: &str,
        season: usize,
        number: u32,
        countdown_secs: u32,
    ) -> Result<Self, LookupError> {
        let (anime, s, ep) = resolve_episode(catalog, anime_id, season, number)?;
        Ok(Self {
            title: format!("{} – Episode {}", anime.title, number),
            subtitle: s.name.clone(),
            links: ep.download_servers.clone(),
            countdown: Countdown::new(countdown_secs),
        })
    }
}

pub fn render(view: &DownloadView) -> Node {
    let revealed = view.countdown.revealed();

    let timer = if revealed {
        Node::Empty
    } else {
        Node::el("p")
            .id("download-timer")
            .text(view.countdown.message())
    };

    let buttons = if revealed {
        Node::el("div")
            .id("download-buttons")
            .children(view.links.iter().map(|srv| {
                Node::el("a")
                    .class("btn-primary download-link")
                    .attr("href", srv.url.as_str())
                    .attr("target", "_blank")
                    .text(srv.name.as_str())
            }))
    } else {
        Node::el("div").id("download-buttons").attr("hidden", "hidden")
    };

    Node::el("main").class("download-page").children([
        Node::el("h1").id("download-title").text(view.title.as_str()),
        Node::el("p")
            .id("download-subtitle")
            .text(view.subtitle.as_str()),
        timer,
        buttons,
    ])
}
