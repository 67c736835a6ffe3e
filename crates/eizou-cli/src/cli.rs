use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "eizou", version, about = "Anime streaming catalog renderer and editor")]
pub struct Cli {
    /// Config file (defaults to the platform config dir, then built-in defaults).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Catalog URL or path, overriding the config.
    #[arg(long, global = true)]
    pub catalog: Option<String>,

    /// Also write logs to a daily rolling file in this directory. The admin
    /// session always logs to a file, under the platform data dir by default.
    #[arg(long, global = true)]
    pub log_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Render one page as HTML.
    Render(RenderArgs),
    /// Cycle the hero banner on its timer.
    Hero {
        /// Number of auto-advance steps before exiting.
        #[arg(long, default_value_t = 3)]
        slides: usize,
    },
    /// Wait out the download countdown, then print the links.
    Download(EpisodeArgs),
    /// Interactive admin session on a working copy of the catalog.
    Admin,
}

#[derive(Debug, Args)]
pub struct RenderArgs {
    /// Page identity (home, browse, episodes, watch, download, admin),
    /// optionally with its query string: `watch.html?id=x&s=0&e=1`.
    pub page: String,

    #[arg(long)]
    pub id: Option<String>,

    #[arg(long, short = 's')]
    pub season: Option<usize>,

    #[arg(long, short = 'e')]
    pub episode: Option<u32>,

    /// Browse filter.
    #[arg(long, short = 'q')]
    pub query: Option<String>,

    /// Print the node tree as JSON instead of HTML.
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Args)]
pub struct EpisodeArgs {
    #[arg(long)]
    pub id: String,

    #[arg(long, short = 's', default_value_t = 0)]
    pub season: usize,

    #[arg(long, short = 'e')]
    pub episode: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_render() {
        let cli = Cli::parse_from([
            "eizou", "render", "watch", "--id", "one-piece", "-s", "0", "-e", "2",
        ]);
        match cli.command {
            Command::Render(args) => {
                assert_eq!(args.page, "watch");
                assert_eq!(args.id.as_deref(), Some("one-piece"));
                assert_eq!(args.episode, Some(2));
                assert!(!args.json);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::parse_from(["eizou", "admin", "--catalog", "data/animeData.json"]);
        assert_eq!(cli.catalog.as_deref(), Some("data/animeData.json"));
        assert!(matches!(cli.command, Command::Admin));
    }

    #[test]
    fn test_verify_cli() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
