use crate::models::{Episode, Server};

/// Raw anime form input. Values are trimmed when applied.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnimeForm {
    pub id: String,
    pub title: String,
    pub poster: String,
    pub description: String,
}

/// Whether a provider slot feeds the stream or the download list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotKind {
    Stream,
    Download,
}

/// Fixed set of named mirror slots on the episode form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderSlot {
    Filemoon,
    StreamTape,
    StreamGh,
    FilemoonDl,
    StreamGhDl,
}

impl ProviderSlot {
    /// All slots, in the order servers are emitted.
    pub const ALL: &[ProviderSlot] = &[
        Self::Filemoon,
        Self::StreamTape,
        Self::StreamGh,
        Self::FilemoonDl,
        Self::StreamGhDl,
    ];

    /// Server name stored in the catalog.
    pub fn server_name(self) -> &'static str {
        match self {
            Self::Filemoon => "Filemoon",
            Self::StreamTape => "StreamTape",
            Self::StreamGh => "StreamGH",
            Self::FilemoonDl => "Filemoon DL",
            Self::StreamGhDl => "StreamGH DL",
        }
    }

    /// Short form key, as typed in the admin session.
    pub fn key(self) -> &'static str {
        match self {
            Self::Filemoon => "filemoon",
            Self::StreamTape => "streamtape",
            Self::StreamGh => "streamgh",
            Self::FilemoonDl => "dl-filemoon",
            Self::StreamGhDl => "dl-streamgh",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|s| s.key() == key)
    }

    pub fn kind(self) -> SlotKind {
        match self {
            Self::Filemoon | Self::StreamTape | Self::StreamGh => SlotKind::Stream,
            Self::FilemoonDl | Self::StreamGhDl => SlotKind::Download,
        }
    }

    fn index(self) -> usize {
        match self {
            Self::Filemoon => 0,
            Self::StreamTape => 1,
            Self::StreamGh => 2,
            Self::FilemoonDl => 3,
            Self::StreamGhDl => 4,
        }
    }
}

impl std::fmt::Display for ProviderSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.server_name())
    }
}

/// Episode form: number, title and one URL field per provider slot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EpisodeForm {
    pub number: u32,
    pub title: String,
    urls: [String; 5],
}

impl EpisodeForm {
    pub fn new(number: u32, title: impl Into<String>) -> Self {
        Self {
            number,
            title: title.into(),
            urls: Default::default(),
        }
    }

    pub fn with_url(mut self, slot: ProviderSlot, url: impl Into<String>) -> Self {
        self.set_url(slot, url);
        self
    }

    pub fn set_url(&mut self, slot: ProviderSlot, url: impl Into<String>) {
        self.urls[slot.index()] = url.into();
    }

    pub fn url(&self, slot: ProviderSlot) -> &str {
        &self.urls[slot.index()]
    }

    /// Fill the form from a stored episode, matching servers by name.
    /// Servers that do not map to a slot are dropped from the form.
    pub fn from_episode(ep: &Episode) -> Self {
        let mut form = Self::new(ep.number, ep.title.clone());
        for &slot in ProviderSlot::ALL {
            let list = match slot.kind() {
                SlotKind::Stream => &ep.stream_servers,
                SlotKind::Download => &ep.download_servers,
            };
            if let Some(srv) = list.iter().find(|s| s.name == slot.server_name()) {
                form.set_url(slot, srv.url.clone());
            }
        }
        form
    }

    /// Build the episode record. Server lists follow slot order; blank
    /// slots are left out.
    pub fn to_episode(&self) -> Episode {
        let servers = |kind: SlotKind| -> Vec<Server> {
            ProviderSlot::ALL
                .iter()
                .filter(|s| s.kind() == kind)
                .filter_map(|&slot| {
                    let url = self.url(slot).trim();
                    (!url.is_empty()).then(|| Server::new(slot.server_name(), url))
                })
                .collect()
        };

        Episode {
            number: self.number,
            title: self.title.trim().to_string(),
            stream_servers: servers(SlotKind::Stream),
            download_servers: servers(SlotKind::Download),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_slots_are_omitted() {
        let ep = EpisodeForm::new(4, "  Title  ")
            .with_url(ProviderSlot::StreamGh, "https://gh/4")
            .with_url(ProviderSlot::Filemoon, "https://fm/4")
            .with_url(ProviderSlot::StreamTape, "   ")
            .with_url(ProviderSlot::StreamGhDl, " https://gh/dl/4 ")
            .to_episode();

        assert_eq!(ep.title, "Title");
        let names: Vec<&str> = ep.stream_servers.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["Filemoon", "StreamGH"]);
        assert_eq!(ep.download_servers, vec![Server::new("StreamGH DL", "https://gh/dl/4")]);
    }

    #[test]
    fn test_from_episode_round_trips_known_slots() {
        let ep = Episode {
            number: 2,
            title: "Two".into(),
            stream_servers: vec![
                Server::new("StreamTape", "https://st/2"),
                Server::new("Unknown", "https://x/2"),
            ],
            download_servers: vec![Server::new("Filemoon DL", "https://fm/dl/2")],
        };
        let form = EpisodeForm::from_episode(&ep);
        assert_eq!(form.url(ProviderSlot::StreamTape), "https://st/2");
        assert_eq!(form.url(ProviderSlot::Filemoon), "");
        assert_eq!(form.url(ProviderSlot::FilemoonDl), "https://fm/dl/2");

        let rebuilt = form.to_episode();
        assert_eq!(rebuilt.stream_servers.len(), 1);
    }

    #[test]
    fn test_slot_keys() {
        for &slot in ProviderSlot::ALL {
            assert_eq!(ProviderSlot::from_key(slot.key()), Some(slot));
        }
        assert_eq!(ProviderSlot::from_key("mega"), None);
    }
}
