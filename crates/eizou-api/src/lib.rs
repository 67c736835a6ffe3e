//! Remote sync for the admin working copy.
//!
//! [`publish`] validates the target, reads the current revision marker,
//! then overwrites the remote file in one call. There is no retry: a stale
//! marker (someone else wrote in between) fails the upload and the caller
//! decides what to do.

pub mod error;
pub mod github;
pub mod traits;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use eizou_core::config::GitHubConfig;
use eizou_core::models::Catalog;

pub use error::SyncError;
pub use github::GitHubClient;
pub use traits::{PutContent, PutReceipt, RemoteStore, SyncTarget};

/// Commit message used when none is configured.
pub const DEFAULT_COMMIT_MESSAGE: &str = "Updated via Admin Panel";

/// Result of a successful publish.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishReceipt {
    pub previous_sha: String,
    pub receipt: PutReceipt,
    pub bytes: usize,
}

/// Encode the catalog as the remote file contents.
pub fn encode_catalog(catalog: &Catalog) -> Result<(String, usize), SyncError> {
    let json = catalog.to_pretty_json()?;
    Ok((STANDARD.encode(json.as_bytes()), json.len()))
}

/// Overwrite the configured remote file with `catalog`. All-or-nothing from
/// the caller's side.
pub async fn publish<S: RemoteStore>(
    store: &S,
    config: &GitHubConfig,
    catalog: &Catalog,
) -> Result<PublishReceipt, SyncError> {
    let target = SyncTarget::from_config(config)?;
    let (content, bytes) = encode_catalog(catalog)?;

    let sha = store.fetch_revision(&target).await?;
    tracing::debug!(path = %target.path, %sha, "read remote revision");

    let message = match config.message.trim() {
        "" => DEFAULT_COMMIT_MESSAGE.to_string(),
        m => m.to_string(),
    };
    let body = PutContent {
        message,
        content,
        sha: sha.clone(),
        branch: target.branch.clone(),
    };
    let receipt = store.put_content(&target, &body).await?;

    tracing::info!(
        repo = %format!("{}/{}", target.owner, target.repo),
        branch = %target.branch,
        path = %target.path,
        bytes,
        "catalog published"
    );
    Ok(PublishReceipt {
        previous_sha: sha,
        receipt,
        bytes,
    })
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use eizou_core::models::Anime;

    use super::*;

    /// In-memory store recording every call.
    struct FakeStore {
        revision: Result<String, u16>,
        put_status: Option<u16>,
        gets: Mutex<u32>,
        puts: Mutex<Vec<PutContent>>,
    }

    impl FakeStore {
        fn new(revision: Result<&str, u16>, put_status: Option<u16>) -> Self {
            Self {
                revision: revision.map(str::to_string),
                put_status,
                gets: Mutex::new(0),
                puts: Mutex::new(Vec::new()),
            }
        }
    }

    impl RemoteStore for FakeStore {
        async fn fetch_revision(&self, _target: &SyncTarget) -> Result<String, SyncError> {
            *self.gets.lock().unwrap() += 1;
            self.revision.clone().map_err(|status| SyncError::Read {
                status,
                message: "read failed".into(),
            })
        }

        async fn put_content(
            &self,
            _target: &SyncTarget,
            body: &PutContent,
        ) -> Result<PutReceipt, SyncError> {
            self.puts.lock().unwrap().push(body.clone());
            match self.put_status {
                Some(status) => Err(SyncError::Write {
                    status,
                    message: "rejected".into(),
                }),
                None => Ok(PutReceipt {
                    commit_sha: Some("commit".into()),
                    content_sha: Some("content".into()),
                }),
            }
        }
    }

    fn config() -> GitHubConfig {
        GitHubConfig {
            owner: "owner".into(),
            repo: "site".into(),
            branch: "main".into(),
            path: "animeData.json".into(),
            token: "t".into(),
            message: String::new(),
            api_base: String::new(),
        }
    }

    fn catalog() -> Catalog {
        Catalog::new(vec![Anime {
            id: "frieren".into(),
            title: "葬送のフリーレン".into(),
            poster: String::new(),
            description: String::new(),
            popularity: 1.0,
            trending: 0.0,
            updated: 0,
            seasons: vec![],
        }])
    }

    #[tokio::test]
    async fn test_publish_sends_base64_json_with_prior_sha() {
        let store = FakeStore::new(Ok("sha-1"), None);
        let receipt = publish(&store, &config(), &catalog()).await.unwrap();
        assert_eq!(receipt.previous_sha, "sha-1");

        let puts = store.puts.lock().unwrap();
        assert_eq!(puts.len(), 1);
        let put = &puts[0];
        assert_eq!(put.sha, "sha-1");
        assert_eq!(put.branch, "main");
        assert_eq!(put.message, DEFAULT_COMMIT_MESSAGE);

        let decoded = String::from_utf8(STANDARD.decode(&put.content).unwrap()).unwrap();
        assert_eq!(decoded, catalog().to_pretty_json().unwrap());
        assert!(decoded.contains("葬送のフリーレン"));
        assert_eq!(receipt.bytes, decoded.len());
    }

    #[tokio::test]
    async fn test_custom_commit_message() {
        let store = FakeStore::new(Ok("sha-1"), None);
        let mut cfg = config();
        cfg.message = "Add Frieren".into();
        publish(&store, &cfg, &catalog()).await.unwrap();
        assert_eq!(store.puts.lock().unwrap()[0].message, "Add Frieren");
    }

    #[tokio::test]
    async fn test_missing_config_makes_no_calls() {
        let store = FakeStore::new(Ok("sha-1"), None);
        let mut cfg = config();
        cfg.token.clear();
        assert!(matches!(
            publish(&store, &cfg, &catalog()).await,
            Err(SyncError::MissingConfig("token"))
        ));
        assert_eq!(*store.gets.lock().unwrap(), 0);
        assert!(store.puts.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_read_failure_skips_upload() {
        let store = FakeStore::new(Err(401), None);
        assert!(matches!(
            publish(&store, &config(), &catalog()).await,
            Err(SyncError::Read { status: 401, .. })
        ));
        assert!(store.puts.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_stale_revision_fails_without_retry() {
        let store = FakeStore::new(Ok("stale"), Some(409));
        assert!(matches!(
            publish(&store, &config(), &catalog()).await,
            Err(SyncError::Write { status: 409, .. })
        ));
        assert_eq!(*store.gets.lock().unwrap(), 1);
        assert_eq!(store.puts.lock().unwrap().len(), 1);
    }
}
