pub mod notice;
pub mod routing;
pub mod timers;

use eizou_api::{GitHubClient, PublishReceipt, RemoteStore, SyncError};
use eizou_core::admin::AdminEditor;
use eizou_core::config::AppConfig;
use eizou_core::models::Catalog;
use eizou_core::node::Node;
use eizou_core::store::{self, CatalogSource, CatalogStore};

pub use notice::{Notice, NoticeKind};
pub use routing::{Page, PageParams, RenderContext};

#[derive(Debug, thiserror::Error)]
pub enum RuntimeError {
    #[error("unknown page: {0}")]
    UnknownPage(String),
}

/// Application state: configuration, the read-only display catalog and,
/// once the admin page is opened, the editor's private working copy.
pub struct App {
    config: AppConfig,
    store: CatalogStore,
    admin: Option<AdminEditor>,
}

impl App {
    /// Build the app and load the catalog once. Load failures are logged and
    /// leave the catalog empty.
    pub async fn load(config: AppConfig) -> Self {
        let catalog = match CatalogSource::parse(&config.catalog.source) {
            Ok(source) => store::load_or_empty(&source).await,
            Err(e) => {
                tracing::error!(error = %e, "invalid catalog source");
                Catalog::default()
            }
        };
        Self::with_catalog(config, catalog)
    }

    pub fn with_catalog(config: AppConfig, catalog: Catalog) -> Self {
        let mut store = CatalogStore::empty();
        store.init(catalog);
        Self {
            config,
            store,
            admin: None,
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut AppConfig {
        &mut self.config
    }

    /// The display copy. Admin edits never show up here.
    pub fn catalog(&self) -> &Catalog {
        self.store.catalog()
    }

    /// The admin editor, created from a deep copy on first use.
    pub fn admin(&mut self) -> &mut AdminEditor {
        let store = &self.store;
        self.admin
            .get_or_insert_with(|| AdminEditor::new(store.working_copy()))
    }

    pub fn render(&self, page: Page, params: &PageParams) -> Node {
        let ctx = RenderContext {
            catalog: self.store.catalog(),
            config: &self.config,
            admin: self.admin.as_ref(),
        };
        routing::render(&ctx, page, params)
    }

    /// Publish the working copy (or the display copy if nothing was edited)
    /// through `remote`.
    pub async fn publish_with<S: RemoteStore>(
        &self,
        remote: &S,
    ) -> Result<PublishReceipt, SyncError> {
        let catalog = self
            .admin
            .as_ref()
            .map_or(self.store.catalog(), |a| a.working_copy());
        eizou_api::publish(remote, &self.config.github, catalog).await
    }

    /// Publish to GitHub using the configured API base.
    pub async fn publish(&self) -> Result<PublishReceipt, SyncError> {
        let client = GitHubClient::new(self.config.github.api_base.clone());
        self.publish_with(&client).await
    }
}
