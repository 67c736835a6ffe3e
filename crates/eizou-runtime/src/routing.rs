//! Page identity → renderer table.
//!
//! Navigation passes `id` (anime), `s` (season index) and `e` (episode
//! number) as query parameters. Any missing or unparsable parameter, like any
//! failed lookup, renders the page inert.

use std::str::FromStr;

use url::form_urlencoded;

use eizou_core::admin::AdminEditor;
use eizou_core::config::AppConfig;
use eizou_core::error::LookupError;
use eizou_core::models::Catalog;
use eizou_core::node::Node;
use eizou_core::views::{admin, browse, download, episodes, hero, home, watch};

use crate::RuntimeError;

/// Which page is being rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Home,
    Browse,
    Episodes,
    Watch,
    Download,
    Admin,
}

impl Page {
    pub const ALL: &[Page] = &[
        Self::Home,
        Self::Browse,
        Self::Episodes,
        Self::Watch,
        Self::Download,
        Self::Admin,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Home => "home",
            Self::Browse => "browse",
            Self::Episodes => "episodes",
            Self::Watch => "watch",
            Self::Download => "download",
            Self::Admin => "admin",
        }
    }
}

impl FromStr for Page {
    type Err = RuntimeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().trim_end_matches(".html");
        let s = if s == "index" { "home" } else { s };
        Self::ALL
            .iter()
            .copied()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| RuntimeError::UnknownPage(s.to_string()))
    }
}

impl std::fmt::Display for Page {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Query parameters of a page request. Unparsable numbers count as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageParams {
    pub id: Option<String>,
    pub season: Option<usize>,
    pub episode: Option<u32>,
    pub query: Option<String>,
}

impl PageParams {
    pub fn from_query(query: &str) -> Self {
        let mut params = Self::default();
        for (key, value) in form_urlencoded::parse(query.trim_start_matches('?').as_bytes()) {
            match key.as_ref() {
                "id" => params.id = Some(value.into_owned()),
                "s" => params.season = value.trim().parse().ok(),
                "e" => params.episode = value.trim().parse().ok(),
                "q" => params.query = Some(value.into_owned()),
                _ => {}
            }
        }
        params
    }

    fn id(&self) -> Result<&str, LookupError> {
        self.id
            .as_deref()
            .filter(|id| !id.is_empty())
            .ok_or(LookupError::Param("id"))
    }

    fn season(&self) -> Result<usize, LookupError> {
        self.season.ok_or(LookupError::Param("s"))
    }

    fn episode(&self) -> Result<u32, LookupError> {
        self.episode.ok_or(LookupError::Param("e"))
    }
}

/// Everything a renderer may read.
pub struct RenderContext<'a> {
    pub catalog: &'a Catalog,
    pub config: &'a AppConfig,
    pub admin: Option<&'a AdminEditor>,
}

type Renderer = fn(&RenderContext<'_>, &PageParams) -> Result<Node, LookupError>;

const ROUTES: &[(Page, Renderer)] = &[
    (Page::Home, render_home),
    (Page::Browse, render_browse),
    (Page::Episodes, render_episodes),
    (Page::Watch, render_watch),
    (Page::Download, render_download),
    (Page::Admin, render_admin),
];

/// Render `page`; lookup failures leave it inert.
pub fn render(ctx: &RenderContext<'_>, page: Page, params: &PageParams) -> Node {
    let Some((_, renderer)) = ROUTES.iter().find(|(p, _)| *p == page) else {
        return Node::Empty;
    };
    match renderer(ctx, params) {
        Ok(node) => node,
        Err(e) => {
            tracing::debug!(%page, error = %e, "page left inert");
            Node::Empty
        }
    }
}

fn render_home(ctx: &RenderContext<'_>, _: &PageParams) -> Result<Node, LookupError> {
    if ctx.catalog.is_empty() {
        return Ok(Node::Empty);
    }
    let carousel = hero::HeroCarousel::new(ctx.catalog);
    Ok(Node::el("div")
        .class("home-page")
        .child(hero::render(&carousel))
        .child(home::render(&home::rows(ctx.catalog))))
}

fn render_browse(ctx: &RenderContext<'_>, params: &PageParams) -> Result<Node, LookupError> {
    let mut view = browse::BrowseView::new(ctx.catalog);
    if let Some(q) = &params.query {
        view.filter(q);
    }
    Ok(Node::el("div").class("browse-page").children([
        Node::el("input")
            .id("browse-search-input")
            .attr("type", "search")
            .attr("value", view.query()),
        browse::render(&view),
    ]))
}

fn render_episodes(ctx: &RenderContext<'_>, params: &PageParams) -> Result<Node, LookupError> {
    let view = episodes::EpisodesView::new(ctx.catalog, params.id()?, params.season.unwrap_or(0))?;
    Ok(episodes::render(&view))
}

fn render_watch(ctx: &RenderContext<'_>, params: &PageParams) -> Result<Node, LookupError> {
    let view = watch::WatchView::new(ctx.catalog, params.id()?, params.season()?, params.episode()?)?;
    Ok(watch::render(&view))
}

fn render_download(ctx: &RenderContext<'_>, params: &PageParams) -> Result<Node, LookupError> {
    let view = download::DownloadView::new(
        ctx.catalog,
        params.id()?,
        params.season()?,
        params.episode()?,
        ctx.config.download.countdown_secs,
    )?;
    Ok(download::render(&view))
}

fn render_admin(ctx: &RenderContext<'_>, _: &PageParams) -> Result<Node, LookupError> {
    let view = match ctx.admin {
        Some(editor) => admin::AdminView::new(editor),
        None => admin::AdminView::new(&AdminEditor::new(ctx.catalog.clone())),
    };
    Ok(admin::render(&view))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> Catalog {
        serde_json::from_str(include_str!("../../../data/animeData.json")).unwrap()
    }

    fn render_page(page: Page, query: &str) -> Node {
        let catalog = catalog();
        let config = AppConfig::default();
        let ctx = RenderContext {
            catalog: &catalog,
            config: &config,
            admin: None,
        };
        render(&ctx, page, &PageParams::from_query(query))
    }

    #[test]
    fn test_page_from_str() {
        assert_eq!("watch".parse::<Page>().unwrap(), Page::Watch);
        assert_eq!("index.html".parse::<Page>().unwrap(), Page::Home);
        assert_eq!("episodes.html".parse::<Page>().unwrap(), Page::Episodes);
        assert!("settings".parse::<Page>().is_err());
    }

    #[test]
    fn test_every_page_has_a_route() {
        for page in Page::ALL {
            assert!(ROUTES.iter().any(|(p, _)| p == page), "{page} has no route");
        }
    }

    #[test]
    fn test_params_from_query() {
        let p = PageParams::from_query("?id=one%20piece&s=1&e=12&q=ONE");
        assert_eq!(p.id.as_deref(), Some("one piece"));
        assert_eq!(p.season, Some(1));
        assert_eq!(p.episode, Some(12));
        assert_eq!(p.query.as_deref(), Some("ONE"));

        let bad = PageParams::from_query("s=abc&e=-1");
        assert_eq!(bad.season, None);
        assert_eq!(bad.episode, None);
    }

    #[test]
    fn test_home_and_browse_counts() {
        let home = render_page(Page::Home, "");
        assert_eq!(home.count_class("anime-card"), 9);
        assert_eq!(home.find_id("hero-title").unwrap().text_content(), "One Piece");

        let browse = render_page(Page::Browse, "q=one");
        assert_eq!(browse.count_class("browse-card"), 1);
    }

    #[test]
    fn test_missing_params_render_inert() {
        assert!(render_page(Page::Watch, "id=one-piece&s=0").is_empty());
        assert!(render_page(Page::Watch, "id=one-piece&s=x&e=1").is_empty());
        assert!(render_page(Page::Download, "id=nope&s=0&e=1").is_empty());
        assert!(render_page(Page::Episodes, "").is_empty());
        assert!(render_page(Page::Episodes, "id=bleach").is_empty());
    }

    #[test]
    fn test_valid_params_render() {
        assert!(!render_page(Page::Episodes, "id=one-piece").is_empty());
        let watch = render_page(Page::Watch, "id=one-piece&s=0&e=1");
        assert_eq!(watch.count_class("server-btn"), 3);
        let download = render_page(Page::Download, "id=one-piece&s=0&e=1");
        assert_eq!(download.count_class("download-link"), 0);
        assert!(render_page(Page::Admin, "").find_id("json-preview").is_some());
    }

    #[test]
    fn test_empty_catalog_home_is_blank() {
        let catalog = Catalog::default();
        let config = AppConfig::default();
        let ctx = RenderContext {
            catalog: &catalog,
            config: &config,
            admin: None,
        };
        assert!(render(&ctx, Page::Home, &PageParams::default()).is_empty());
        assert_eq!(
            render(&ctx, Page::Browse, &PageParams::default()).count_class("browse-card"),
            0
        );
    }
}
