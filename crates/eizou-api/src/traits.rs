//! Remote store abstraction.
//!
//! Publishing only needs two calls: read the current revision marker of the
//! target file, then overwrite it. [`crate::publish`] is written against this
//! trait so it can run against GitHub or an in-memory fake.

use std::future::Future;

use eizou_core::config::GitHubConfig;
use serde::{Deserialize, Serialize};

use crate::error::SyncError;

/// A content host that can overwrite one file given its prior revision.
pub trait RemoteStore: Send + Sync {
    /// Read the revision marker (content SHA) of the target file.
    fn fetch_revision(
        &self,
        target: &SyncTarget,
    ) -> impl Future<Output = Result<String, SyncError>> + Send;

    /// Overwrite the target file in a single call.
    fn put_content(
        &self,
        target: &SyncTarget,
        body: &PutContent,
    ) -> impl Future<Output = Result<PutReceipt, SyncError>> + Send;
}

/// Fully specified publish destination. Only built through
/// [`SyncTarget::from_config`], so every field is non-blank.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncTarget {
    pub owner: String,
    pub repo: String,
    pub branch: String,
    pub path: String,
    pub token: String,
}

impl SyncTarget {
    pub fn from_config(config: &GitHubConfig) -> Result<Self, SyncError> {
        let required = |value: &str, name: &'static str| -> Result<String, SyncError> {
            let value = value.trim();
            if value.is_empty() {
                Err(SyncError::MissingConfig(name))
            } else {
                Ok(value.to_string())
            }
        };

        Ok(Self {
            owner: required(&config.owner, "owner")?,
            repo: required(&config.repo, "repo")?,
            branch: required(&config.branch, "branch")?,
            path: required(&config.path, "path")?.trim_start_matches('/').to_string(),
            token: required(&config.token, "token")?,
        })
    }
}

/// Body of the overwrite call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PutContent {
    pub message: String,
    /// Base64 (standard alphabet) of the UTF-8 file contents.
    pub content: String,
    /// Revision marker read just before the write.
    pub sha: String,
    pub branch: String,
}

/// What the host reported after a successful overwrite.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PutReceipt {
    pub commit_sha: Option<String>,
    pub content_sha: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> GitHubConfig {
        GitHubConfig {
            owner: "owner".into(),
            repo: "site".into(),
            branch: "main".into(),
            path: "/animeData.json".into(),
            token: "ghp_x".into(),
            message: String::new(),
            api_base: String::new(),
        }
    }

    #[test]
    fn test_from_config() {
        let target = SyncTarget::from_config(&config()).unwrap();
        assert_eq!(target.path, "animeData.json");
        assert_eq!(target.branch, "main");
    }

    #[test]
    fn test_each_required_field() {
        let cases: [(&str, fn(&mut GitHubConfig)); 5] = [
            ("owner", |c| c.owner.clear()),
            ("repo", |c| c.repo = "  ".into()),
            ("branch", |c| c.branch.clear()),
            ("path", |c| c.path.clear()),
            ("token", |c| c.token.clear()),
        ];
        for (field, clear) in cases {
            let mut c = config();
            clear(&mut c);
            match SyncTarget::from_config(&c) {
                Err(SyncError::MissingConfig(name)) => assert_eq!(name, field),
                other => panic!("expected MissingConfig({field}), got {other:?}"),
            }
        }
    }
}
