use std::error::Error;
use std::io::Write;
use std::time::Duration;

use eizou_core::views::download::{DownloadView, Tick};
use eizou_core::views::hero::{HeroCarousel, HeroSlide};
use eizou_runtime::timers::{run_countdown, spawn_hero_ticker};
use eizou_runtime::{App, Notice, Page, PageParams};

use crate::cli::{EpisodeArgs, RenderArgs};

type CmdResult = Result<(), Box<dyn Error>>;

pub fn render(app: &App, args: RenderArgs, out: &mut impl Write) -> CmdResult {
    // Accept a full page link such as `watch.html?id=x&s=0&e=1`; flags win.
    let (page, query) = args.page.split_once('?').unwrap_or((args.page.as_str(), ""));
    let page: Page = page.parse()?;
    let linked = PageParams::from_query(query);
    let params = PageParams {
        id: args.id.or(linked.id),
        season: args.season.or(linked.season),
        episode: args.episode.or(linked.episode),
        query: args.query.or(linked.query),
    };
    let node = app.render(page, &params);
    if node.is_empty() {
        tracing::warn!(%page, ?params, "page rendered nothing");
    }

    if args.json {
        writeln!(out, "{}", serde_json::to_string_pretty(&node)?)?;
    } else {
        writeln!(out, "{}", node.to_html())?;
    }
    Ok(())
}

fn write_slide(out: &mut impl Write, pos: usize, len: usize, slide: &HeroSlide) -> std::io::Result<()> {
    writeln!(
        out,
        "[{}/{}] {} | {} | {} | {}",
        pos + 1,
        len,
        slide.title,
        slide.meta,
        slide.pill,
        slide.watch_href
    )
}

/// Show the hero banner and let it auto-advance `slides` times.
pub async fn hero(app: &App, slides: usize, out: &mut impl Write) -> CmdResult {
    let mut carousel = HeroCarousel::new(app.catalog());
    let len = carousel.len();
    let Some(first) = carousel.current() else {
        writeln!(out, "{}", Notice::info("Nothing to feature yet."))?;
        return Ok(());
    };
    write_slide(out, carousel.index(), len, first)?;

    let period = Duration::from_secs(app.config().hero.interval_secs.max(1));
    let (_ticker, mut ticks) = spawn_hero_ticker(period);
    for _ in 0..slides {
        if ticks.recv().await.is_none() {
            break;
        }
        let index = {
            carousel.advance();
            carousel.index()
        };
        if let Some(slide) = carousel.current() {
            write_slide(out, index, len, slide)?;
        }
    }
    Ok(())
}

/// Count down, then list the episode's download mirrors.
pub async fn download(app: &App, args: EpisodeArgs, out: &mut impl Write) -> CmdResult {
    let mut view = DownloadView::new(
        app.catalog(),
        &args.id,
        args.season,
        args.episode,
        app.config().download.countdown_secs,
    )?;
    writeln!(out, "{}", view.title)?;
    writeln!(out, "{}", view.subtitle)?;

    let mut write_err = None;
    if !view.countdown.revealed() {
        writeln!(out, "{}", view.countdown.message())?;
    }
    run_countdown(&mut view.countdown, Duration::from_secs(1), |tick, countdown| {
        if let Tick::Waiting(_) = tick {
            if let Err(e) = writeln!(out, "{}", countdown.message()) {
                write_err.get_or_insert(e);
            }
        }
    })
    .await;
    if let Some(e) = write_err {
        return Err(e.into());
    }

    if view.links.is_empty() {
        writeln!(out, "{}", Notice::info("No download links for this episode."))?;
    }
    for link in &view.links {
        writeln!(out, "{}: {}", link.name, link.url)?;
    }
    Ok(())
}
