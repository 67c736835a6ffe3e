use crate::admin::{AdminEditor, AdminSelection};
use crate::node::Node;

/// Dropdown contents and preview for the admin page.
#[derive(Debug, Clone)]
pub struct AdminView {
    pub anime_options: Vec<(String, String)>,
    pub season_options: Vec<(usize, String)>,
    pub episode_season_options: Vec<(usize, String)>,
    pub episode_options: Vec<(u32, String)>,
    pub selection: AdminSelection,
    pub preview: String,
}

impl AdminView {
    pub fn new(editor: &AdminEditor) -> Self {
        let catalog = editor.working_copy();
        let selection = editor.selection().clone();

        let seasons_of = |id: Option<&str>| -> Vec<(usize, String)> {
            id.and_then(|id| catalog.find(id))
                .map(|a| {
                    a.seasons
                        .iter()
                        .enumerate()
                        .map(|(i, s)| (i, s.name.clone()))
                        .collect()
                })
                .unwrap_or_default()
        };

        let episode_options = selection
            .episode_anime
            .as_deref()
            .and_then(|id| catalog.find(id))
            .zip(selection.episode_season)
            .and_then(|(a, i)| a.season(i))
            .map(|s| {
                s.episodes
                    .iter()
                    .map(|ep| (ep.number, format!("Episode {} – {}", ep.number, ep.title)))
                    .collect()
            })
            .unwrap_or_default();

        Self {
            anime_options: catalog
                .anime()
                .iter()
                .map(|a| (a.id.clone(), a.title.clone()))
                .collect(),
            season_options: seasons_of(selection.season_anime.as_deref()),
            episode_season_options: seasons_of(selection.episode_anime.as_deref()),
            episode_options,
            preview: editor.preview(),
            selection,
        }
    }
}

fn select<V: ToString + PartialEq>(
    id: &str,
    options: &[(V, String)],
    selected: Option<&V>,
) -> Node {
    Node::el("select")
        .id(id)
        .children(options.iter().map(|(value, label)| {
            let option = Node::el("option").attr("value", value.to_string());
            let option = if selected == Some(value) {
                option.attr("selected", "selected")
            } else {
                option
            };
            option.text(label.as_str())
        }))
}

pub fn render(view: &AdminView) -> Node {
    let sel = &view.selection;
    Node::el("main").class("admin-page").children([
        Node::el("section").class("admin-seasons").children([
            select(
                "season-anime-select",
                &view.anime_options,
                sel.season_anime.as_ref(),
            ),
            select(
                "season-select-manage",
                &view.season_options,
                sel.season_index.as_ref(),
            ),
        ]),
        Node::el("section").class("admin-episodes").children([
            select(
                "episode-anime-select",
                &view.anime_options,
                sel.episode_anime.as_ref(),
            ),
            select(
                "episode-season-select",
                &view.episode_season_options,
                sel.episode_season.as_ref(),
            ),
            select(
                "episode-select",
                &view.episode_options,
                sel.episode_number.as_ref(),
            ),
        ]),
        Node::el("pre").id("json-preview").text(view.preview.as_str()),
    ])
}
