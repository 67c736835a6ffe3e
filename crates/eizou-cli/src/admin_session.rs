//! Line-oriented admin session.
//!
//! Each input line is one command, parsed with clap. Edits go to the app's
//! working copy; nothing leaves the process until `publish`.

use std::io::{self, Write};
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, Lines};

use eizou_core::admin::{AdminEditor, AnimeForm, EpisodeForm, PendingDelete, ProviderSlot};
use eizou_core::error::ValidationError;
use eizou_core::views::admin::AdminView;
use eizou_runtime::{App, Notice};

#[derive(Debug, Parser)]
#[command(name = "admin", no_binary_name = true, disable_version_flag = true)]
struct AdminLine {
    #[command(subcommand)]
    command: AdminCommand,
}

#[derive(Debug, Subcommand)]
enum AdminCommand {
    /// Add, update or delete an anime.
    Anime {
        #[command(subcommand)]
        action: AnimeAction,
    },
    /// Add, rename or delete a season.
    Season {
        #[command(subcommand)]
        action: SeasonAction,
    },
    /// Add, update, load or delete an episode.
    Episode {
        #[command(subcommand)]
        action: EpisodeAction,
    },
    /// Change a dropdown selection.
    Select {
        #[command(subcommand)]
        target: SelectTarget,
    },
    /// Set publish target fields for this session.
    Github(GithubArgs),
    /// Show the dropdowns.
    Show,
    /// Print the JSON that would be published.
    Preview,
    /// Overwrite the remote catalog with the working copy.
    Publish,
    /// End the session.
    #[command(alias = "exit")]
    Quit,
}

#[derive(Debug, Subcommand)]
enum AnimeAction {
    /// Add a new anime, or update the one with this id.
    Add {
        #[arg(long)]
        id: String,
        #[arg(long)]
        title: String,
        #[arg(long, default_value = "")]
        poster: String,
        #[arg(long, default_value = "")]
        description: String,
    },
    Delete {
        #[arg(long)]
        id: String,
    },
}

#[derive(Debug, Args)]
struct SeasonTarget {
    /// Anime id (defaults to the current selection).
    #[arg(long)]
    anime: Option<String>,
    /// Season index (defaults to the current selection).
    #[arg(long)]
    index: Option<usize>,
}

#[derive(Debug, Subcommand)]
enum SeasonAction {
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        anime: Option<String>,
    },
    Rename {
        #[arg(long)]
        name: String,
        #[command(flatten)]
        target: SeasonTarget,
    },
    Delete {
        #[command(flatten)]
        target: SeasonTarget,
    },
}

#[derive(Debug, Args)]
struct EpisodeFields {
    #[arg(long)]
    number: u32,
    #[arg(long, default_value = "")]
    title: String,
    /// Mirror URL as `slot=url`; slots: filemoon, streamtape, streamgh,
    /// dl-filemoon, dl-streamgh.
    #[arg(long = "url", value_parser = parse_slot_url)]
    urls: Vec<(ProviderSlot, String)>,
    #[command(flatten)]
    target: SeasonTarget,
}

impl EpisodeFields {
    fn form(&self) -> EpisodeForm {
        self.urls
            .iter()
            .fold(EpisodeForm::new(self.number, self.title.clone()), |form, (slot, url)| {
                form.with_url(*slot, url.clone())
            })
    }
}

#[derive(Debug, Subcommand)]
enum EpisodeAction {
    Add(EpisodeFields),
    Update(EpisodeFields),
    /// Print the stored episode as form fields.
    Load {
        #[arg(long)]
        number: Option<u32>,
        #[command(flatten)]
        target: SeasonTarget,
    },
    Delete {
        #[arg(long)]
        number: Option<u32>,
        #[command(flatten)]
        target: SeasonTarget,
    },
}

#[derive(Debug, Subcommand)]
enum SelectTarget {
    SeasonAnime { id: String },
    Season { index: usize },
    EpisodeAnime { id: String },
    EpisodeSeason { index: usize },
    Episode { number: u32 },
}

#[derive(Debug, Args)]
struct GithubArgs {
    #[arg(long)]
    owner: Option<String>,
    #[arg(long)]
    repo: Option<String>,
    #[arg(long)]
    branch: Option<String>,
    #[arg(long)]
    path: Option<String>,
    #[arg(long)]
    token: Option<String>,
    /// Also write the target to the config file.
    #[arg(long)]
    save: bool,
}

fn parse_slot_url(raw: &str) -> Result<(ProviderSlot, String), String> {
    let (key, url) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected slot=url, got `{raw}`"))?;
    let slot = ProviderSlot::from_key(key.trim()).ok_or_else(|| {
        let keys: Vec<&str> = ProviderSlot::ALL.iter().map(|s| s.key()).collect();
        format!("unknown slot `{key}` (expected one of {})", keys.join(", "))
    })?;
    Ok((slot, url.to_string()))
}

/// Split a command line into words. Single and double quotes group words;
/// a backslash escapes the next character outside single quotes.
pub fn split_words(line: &str) -> Result<Vec<String>, String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut in_word = false;
    let mut quote: Option<char> = None;
    let mut chars = line.chars();

    while let Some(c) = chars.next() {
        match (quote, c) {
            (Some('\''), '\'') | (Some('"'), '"') => quote = None,
            (Some('\''), _) => current.push(c),
            (_, '\\') => {
                let next = chars.next().ok_or("trailing backslash")?;
                current.push(next);
                in_word = true;
            }
            (Some(_), _) => current.push(c),
            (None, '\'' | '"') => {
                quote = Some(c);
                in_word = true;
            }
            (None, c) if c.is_whitespace() => {
                if in_word {
                    words.push(std::mem::take(&mut current));
                    in_word = false;
                }
            }
            (None, _) => {
                current.push(c);
                in_word = true;
            }
        }
    }

    if quote.is_some() {
        return Err("unterminated quote".into());
    }
    if in_word {
        words.push(current);
    }
    Ok(words)
}

enum Flow {
    Continue,
    Quit,
}

pub struct AdminSession<'a, R, W> {
    app: &'a mut App,
    input: Lines<R>,
    out: W,
    config_path: Option<PathBuf>,
}

impl<'a, R, W> AdminSession<'a, R, W>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    pub fn new(app: &'a mut App, input: R, out: W) -> Self {
        Self {
            app,
            input: input.lines(),
            out,
            config_path: None,
        }
    }

    /// Where `github --save` writes the config.
    pub fn config_path(mut self, path: PathBuf) -> Self {
        self.config_path = Some(path);
        self
    }

    /// Run until `quit` or end of input. Returns the output sink.
    pub async fn run(mut self) -> io::Result<W> {
        writeln!(
            self.out,
            "Editing a working copy of {} anime. Type `help` for commands.",
            self.app.admin().working_copy().len()
        )?;
        loop {
            write!(self.out, "admin> ")?;
            self.out.flush()?;
            let Some(line) = self.input.next_line().await? else {
                break;
            };
            let words = match split_words(&line) {
                Ok(words) => words,
                Err(e) => {
                    self.notify(Notice::error(e))?;
                    continue;
                }
            };
            if words.is_empty() {
                continue;
            }
            match AdminLine::try_parse_from(words) {
                Ok(parsed) => {
                    if let Flow::Quit = self.execute(parsed.command).await? {
                        break;
                    }
                }
                Err(e) => write!(self.out, "{}", e.render())?,
            }
        }
        writeln!(self.out)?;
        Ok(self.out)
    }

    async fn execute(&mut self, command: AdminCommand) -> io::Result<Flow> {
        match command {
            AdminCommand::Anime { action } => self.anime(action).await?,
            AdminCommand::Season { action } => self.season(action).await?,
            AdminCommand::Episode { action } => self.episode(action).await?,
            AdminCommand::Select { target } => {
                let editor = self.app.admin();
                editor.select(|s| match target {
                    SelectTarget::SeasonAnime { id } => {
                        s.season_anime = Some(id);
                        s.season_index = None;
                    }
                    SelectTarget::Season { index } => s.season_index = Some(index),
                    SelectTarget::EpisodeAnime { id } => {
                        s.episode_anime = Some(id);
                        s.episode_season = None;
                        s.episode_number = None;
                    }
                    SelectTarget::EpisodeSeason { index } => {
                        s.episode_season = Some(index);
                        s.episode_number = None;
                    }
                    SelectTarget::Episode { number } => s.episode_number = Some(number),
                });
                self.show()?;
            }
            AdminCommand::Github(args) => {
                let github = &mut self.app.config_mut().github;
                let fields = [
                    (&mut github.owner, args.owner),
                    (&mut github.repo, args.repo),
                    (&mut github.branch, args.branch),
                    (&mut github.path, args.path),
                    (&mut github.token, args.token),
                ];
                for (field, value) in fields {
                    if let Some(value) = value {
                        *field = value;
                    }
                }
                if !args.save {
                    self.notify(Notice::info("GitHub target updated for this session."))?;
                    return Ok(Flow::Continue);
                }
                let Some(path) = self.config_path.clone() else {
                    self.notify(Notice::error("No config file to save to."))?;
                    return Ok(Flow::Continue);
                };
                match self.app.config().save_to(&path) {
                    Ok(()) => {
                        tracing::info!(path = %path.display(), "saved config");
                        self.notify(Notice::success("GitHub target saved."))?;
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "failed to save config");
                        self.notify(Notice::error(format!("Could not save config: {e}")))?;
                    }
                }
            }
            AdminCommand::Show => self.show()?,
            AdminCommand::Preview => {
                let preview = self.app.admin().preview();
                writeln!(self.out, "{preview}")?;
            }
            AdminCommand::Publish => {
                let result = self.app.publish().await;
                if let Err(e) = &result {
                    tracing::error!(error = %e, "publish failed");
                }
                self.notify(Notice::from_sync(&result))?;
            }
            AdminCommand::Quit => return Ok(Flow::Quit),
        }
        Ok(Flow::Continue)
    }

    async fn anime(&mut self, action: AnimeAction) -> io::Result<()> {
        match action {
            AnimeAction::Add {
                id,
                title,
                poster,
                description,
            } => {
                let result = self.app.admin().upsert_anime(&AnimeForm {
                    id,
                    title,
                    poster,
                    description,
                });
                self.notify(Notice::from_admin(&result))
            }
            AnimeAction::Delete { id } => {
                let pending = self.app.admin().request_delete_anime(&id);
                self.confirm_delete(pending).await
            }
        }
    }

    async fn season(&mut self, action: SeasonAction) -> io::Result<()> {
        match action {
            SeasonAction::Add { name, anime } => {
                let editor = self.app.admin();
                let anime = anime.or_else(|| editor.selection().season_anime.clone());
                let result = editor.add_season(anime.as_deref().unwrap_or_default(), &name);
                self.notify(Notice::from_admin(&result))
            }
            SeasonAction::Rename { name, target } => {
                let editor = self.app.admin();
                let result = season_target(editor, target)
                    .and_then(|(anime, index)| editor.rename_season(&anime, index, &name));
                self.notify(Notice::from_admin(&result))
            }
            SeasonAction::Delete { target } => {
                let editor = self.app.admin();
                let pending = season_target(editor, target)
                    .and_then(|(anime, index)| editor.request_delete_season(&anime, index));
                self.confirm_delete(pending).await
            }
        }
    }

    async fn episode(&mut self, action: EpisodeAction) -> io::Result<()> {
        match action {
            EpisodeAction::Add(fields) => {
                let editor = self.app.admin();
                let form = fields.form();
                let result = episode_target(editor, fields.target)
                    .and_then(|(anime, season)| editor.add_episode(&anime, season, &form));
                self.notify(Notice::from_admin(&result))
            }
            EpisodeAction::Update(fields) => {
                let editor = self.app.admin();
                let form = fields.form();
                let result = episode_target(editor, fields.target)
                    .and_then(|(anime, season)| editor.update_episode(&anime, season, &form));
                self.notify(Notice::from_admin(&result))
            }
            EpisodeAction::Load { number, target } => {
                let editor = self.app.admin();
                let number = number.or(editor.selection().episode_number);
                let form = episode_target(editor, target).and_then(|(anime, season)| {
                    let number = number.ok_or(ValidationError::MissingField("episode"))?;
                    editor.episode_form(&anime, season, number)
                });
                match form {
                    Ok(form) => {
                        writeln!(self.out, "number: {}", form.number)?;
                        writeln!(self.out, "title: {}", form.title)?;
                        for &slot in ProviderSlot::ALL {
                            writeln!(self.out, "{}: {}", slot.key(), form.url(slot))?;
                        }
                        Ok(())
                    }
                    Err(e) => self.notify(Notice::from_admin(&Err(e))),
                }
            }
            EpisodeAction::Delete { number, target } => {
                let editor = self.app.admin();
                let number = number.or(editor.selection().episode_number);
                let pending = episode_target(editor, target).and_then(|(anime, season)| {
                    let number = number.ok_or(ValidationError::MissingField("episode"))?;
                    editor.request_delete_episode(&anime, season, number)
                });
                self.confirm_delete(pending).await
            }
        }
    }

    /// Ask for confirmation, then carry out the delete.
    async fn confirm_delete(
        &mut self,
        pending: Result<PendingDelete, ValidationError>,
    ) -> io::Result<()> {
        let pending = match pending {
            Ok(pending) => pending,
            Err(e) => return self.notify(Notice::from_admin(&Err(e))),
        };

        write!(self.out, "{} [y/N] ", pending.prompt())?;
        self.out.flush()?;
        let answer = self.input.next_line().await?.unwrap_or_default();
        if !matches!(answer.trim().to_lowercase().as_str(), "y" | "yes") {
            return self.notify(Notice::info("Cancelled."));
        }

        let result = self.app.admin().confirm(pending);
        self.notify(Notice::from_admin(&result))
    }

    fn show(&mut self) -> io::Result<()> {
        let view = AdminView::new(self.app.admin());
        let sel = &view.selection;
        let season_name = |options: &[(usize, String)], index: Option<usize>| {
            index
                .and_then(|i| options.iter().find(|(j, _)| *j == i))
                .map_or_else(|| "-".to_string(), |(i, name)| format!("{i}: {name}"))
        };

        writeln!(
            self.out,
            "anime: {}",
            view.anime_options
                .iter()
                .map(|(id, title)| format!("{id} ({title})"))
                .collect::<Vec<_>>()
                .join(", ")
        )?;
        writeln!(
            self.out,
            "season pane: anime={} season={}",
            sel.season_anime.as_deref().unwrap_or("-"),
            season_name(&view.season_options, sel.season_index)
        )?;
        writeln!(
            self.out,
            "episode pane: anime={} season={} episode={}",
            sel.episode_anime.as_deref().unwrap_or("-"),
            season_name(&view.episode_season_options, sel.episode_season),
            sel.episode_number
                .map_or_else(|| "-".to_string(), |n| n.to_string())
        )?;
        for (_, label) in &view.episode_options {
            writeln!(self.out, "  {label}")?;
        }
        Ok(())
    }

    fn notify(&mut self, notice: Notice) -> io::Result<()> {
        writeln!(self.out, "{notice}")
    }
}

fn season_target(
    editor: &AdminEditor,
    target: SeasonTarget,
) -> Result<(String, usize), ValidationError> {
    let sel = editor.selection();
    let anime = target
        .anime
        .or_else(|| sel.season_anime.clone())
        .ok_or(ValidationError::MissingField("anime"))?;
    let index = target
        .index
        .or(sel.season_index)
        .ok_or(ValidationError::MissingField("season"))?;
    Ok((anime, index))
}

fn episode_target(
    editor: &AdminEditor,
    target: SeasonTarget,
) -> Result<(String, usize), ValidationError> {
    let sel = editor.selection();
    let anime = target
        .anime
        .or_else(|| sel.episode_anime.clone())
        .ok_or(ValidationError::MissingField("anime"))?;
    let index = target
        .index
        .or(sel.episode_season)
        .ok_or(ValidationError::MissingField("season"))?;
    Ok((anime, index))
}

#[cfg(test)]
mod tests {
    use eizou_core::config::AppConfig;
    use eizou_core::models::Catalog;

    use super::*;

    fn app() -> App {
        let catalog: Catalog =
            serde_json::from_str(include_str!("../../../data/animeData.json")).unwrap();
        App::with_catalog(AppConfig::default(), catalog)
    }

    async fn run_script(app: &mut App, script: &str) -> String {
        let out = AdminSession::new(app, script.as_bytes(), Vec::new())
            .run()
            .await
            .unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_split_words() {
        assert_eq!(
            split_words(r#"anime add --id x --title "One Piece" --poster 'a b'"#).unwrap(),
            ["anime", "add", "--id", "x", "--title", "One Piece", "--poster", "a b"]
        );
        assert_eq!(split_words(r#"--title "say \"hi\"""#).unwrap(), ["--title", r#"say "hi""#]);
        assert_eq!(split_words(r#"--title """#).unwrap(), ["--title", ""]);
        assert!(split_words(r#"--title "open"#).is_err());
        assert!(split_words("   ").unwrap().is_empty());
    }

    #[test]
    fn test_parse_slot_url() {
        assert_eq!(
            parse_slot_url("dl-streamgh=https://gh/dl?x=1").unwrap(),
            (ProviderSlot::StreamGhDl, "https://gh/dl?x=1".to_string())
        );
        assert!(parse_slot_url("mega=https://m").is_err());
        assert!(parse_slot_url("filemoon").is_err());
    }

    #[tokio::test]
    async fn test_anime_add_and_update() {
        let mut app = app();
        let out = run_script(
            &mut app,
            "anime add --id frieren --title Frieren\n\
             anime add --id frieren --title \"Frieren: Beyond Journey's End\"\n\
             anime add --id x --title ''\n",
        )
        .await;
        assert!(out.contains("[ok] Anime added."));
        assert!(out.contains("[ok] Anime updated."));
        assert!(out.contains("[error] ID & Title required."));

        let editor = app.admin();
        assert_eq!(editor.working_copy().len(), 4);
        assert_eq!(
            editor.working_copy().find("frieren").unwrap().title,
            "Frieren: Beyond Journey's End"
        );
        assert_eq!(app.catalog().len(), 3);
    }

    #[tokio::test]
    async fn test_delete_needs_yes() {
        let mut app = app();
        let out = run_script(
            &mut app,
            "anime delete --id bleach\nn\nanime delete --id bleach\ny\n",
        )
        .await;
        assert!(out.contains("Delete entire anime? [y/N]"));
        assert!(out.contains("[info] Cancelled."));
        assert!(out.contains("[ok] Anime deleted."));
        assert!(app.admin().working_copy().find("bleach").is_none());
    }

    #[tokio::test]
    async fn test_season_and_episode_flow_uses_selection() {
        let mut app = app();
        let out = run_script(
            &mut app,
            "season add --name \"East Blue\"\n\
             select episode-season 1\n\
             episode add --number 1 --title Arrival --url filemoon=https://fm/1 --url dl-streamgh=https://gh/dl/1\n\
             episode add --number 1 --title Again\n\
             episode update --number 1 --title Revised --url streamtape=https://st/1\n\
             episode load\n\
             season delete --index 1\nyes\n\
             show\n",
        )
        .await;
        assert!(out.contains("[error] Season already exists!"));
        assert!(out.contains("[ok] Episode added."));
        assert!(out.contains("[error] Episode exists. Use Update instead."));
        assert!(out.contains("[ok] Episode updated."));
        assert!(out.contains("title: Revised"));
        assert!(out.contains("streamtape: https://st/1"));
        assert!(out.contains("Delete this season? All episodes will be removed. [y/N]"));
        assert!(out.contains("[ok] Season deleted."));
        assert!(out.contains("episode pane: anime=one-piece season=0: East Blue episode=1"));

        let op = app.admin().working_copy().find("one-piece").unwrap().clone();
        assert_eq!(op.seasons.len(), 1);
    }

    #[tokio::test]
    async fn test_publish_without_github_fields() {
        let mut app = app();
        let out = run_script(&mut app, "publish\nquit\npreview\n").await;
        assert!(out.contains("[error] Fill all GitHub fields."));
        // Nothing after quit runs.
        assert!(!out.contains("\"id\": \"one-piece\""));
    }

    #[tokio::test]
    async fn test_github_command_sets_session_fields() {
        let mut app = app();
        run_script(&mut app, "github --owner me --repo site --token t\n").await;
        let github = &app.config().github;
        assert_eq!(github.owner, "me");
        assert_eq!(github.repo, "site");
        assert_eq!(github.branch, "main");
        assert_eq!(github.token, "t");
    }

    #[tokio::test]
    async fn test_github_save_writes_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let mut app = app();
        let out = AdminSession::new(
            &mut app,
            "github --owner me --repo site --save\n".as_bytes(),
            Vec::new(),
        )
        .config_path(path.clone())
        .run()
        .await
        .unwrap();
        assert!(String::from_utf8(out).unwrap().contains("[ok] GitHub target saved."));

        let saved = AppConfig::load_from(&path).unwrap();
        assert_eq!(saved.github.owner, "me");
        assert_eq!(saved.github.repo, "site");
        assert_eq!(saved.hero.interval_secs, 5);
    }

    #[tokio::test]
    async fn test_unknown_command_prints_usage() {
        let mut app = app();
        let out = run_script(&mut app, "frobnicate\n").await;
        assert!(out.contains("error:"));
    }
}
