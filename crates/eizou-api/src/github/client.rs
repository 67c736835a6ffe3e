use reqwest::Client;
use url::Url;

use super::types::{ContentResponse, PutResponse};
use crate::error::SyncError;
use crate::traits::{PutContent, PutReceipt, RemoteStore, SyncTarget};

pub const DEFAULT_API_BASE: &str = "https://api.github.com";

const USER_AGENT: &str = concat!("eizou/", env!("CARGO_PKG_VERSION"));
const ACCEPT: &str = "application/vnd.github+json";
const API_VERSION: &str = "2022-11-28";

/// GitHub REST contents API client.
pub struct GitHubClient {
    api_base: String,
    http: Client,
}

impl GitHubClient {
    pub fn new(api_base: impl Into<String>) -> Self {
        let api_base = api_base.into();
        let api_base = if api_base.trim().is_empty() {
            DEFAULT_API_BASE.to_string()
        } else {
            api_base.trim().trim_end_matches('/').to_string()
        };
        Self {
            api_base,
            http: Client::new(),
        }
    }

    /// Contents endpoint for `target`. Owner, repo and every path segment are
    /// percent-encoded, so `#` or `?` in a file name stay in the path.
    fn contents_url(&self, target: &SyncTarget) -> Result<Url, SyncError> {
        let mut url = Url::parse(&self.api_base)
            .map_err(|e| SyncError::InvalidUrl(format!("{}: {e}", self.api_base)))?;
        url.path_segments_mut()
            .map_err(|_| SyncError::InvalidUrl(self.api_base.clone()))?
            .pop_if_empty()
            .extend(["repos", target.owner.as_str(), target.repo.as_str(), "contents"])
            .extend(target.path.split('/').filter(|s| !s.is_empty()));
        Ok(url)
    }

    fn request(
        &self,
        method: reqwest::Method,
        target: &SyncTarget,
    ) -> Result<reqwest::RequestBuilder, SyncError> {
        Ok(self
            .http
            .request(method, self.contents_url(target)?)
            .header("Authorization", format!("Bearer {}", target.token))
            .header("Accept", ACCEPT)
            .header("User-Agent", USER_AGENT)
            .header("X-GitHub-Api-Version", API_VERSION))
    }

    async fn error_body(resp: reqwest::Response) -> (u16, String) {
        let status = resp.status().as_u16();
        let body = resp.text().await.unwrap_or_default();
        (status, body)
    }
}

impl Default for GitHubClient {
    fn default() -> Self {
        Self::new(DEFAULT_API_BASE)
    }
}

impl RemoteStore for GitHubClient {
    async fn fetch_revision(&self, target: &SyncTarget) -> Result<String, SyncError> {
        let resp = self
            .request(reqwest::Method::GET, target)?
            .query(&[("ref", target.branch.as_str())])
            .send()
            .await?;

        if !resp.status().is_success() {
            let (status, message) = Self::error_body(resp).await;
            tracing::warn!(status, path = %target.path, "GitHub read failed");
            return Err(SyncError::Read { status, message });
        }

        let content: ContentResponse = resp
            .json()
            .await
            .map_err(|e| SyncError::Parse(e.to_string()))?;
        Ok(content.sha)
    }

    async fn put_content(
        &self,
        target: &SyncTarget,
        body: &PutContent,
    ) -> Result<PutReceipt, SyncError> {
        let resp = self
            .request(reqwest::Method::PUT, target)?
            .json(body)
            .send()
            .await?;

        // 409/422 here usually mean the revision marker went stale.
        if !resp.status().is_success() {
            let (status, message) = Self::error_body(resp).await;
            tracing::warn!(status, path = %target.path, "GitHub upload failed");
            return Err(SyncError::Write { status, message });
        }

        let put: PutResponse = resp
            .json()
            .await
            .map_err(|e| SyncError::Parse(e.to_string()))?;
        Ok(PutReceipt {
            commit_sha: put.commit.map(|c| c.sha),
            content_sha: put.content.map(|c| c.sha),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    use super::*;

    type Recorded = Arc<Mutex<Vec<String>>>;

    /// Minimal HTTP/1.1 responder: answers each connection with the next
    /// canned `(status, body)` and records the raw request.
    async fn serve(responses: Vec<(u16, &'static str)>) -> (String, Recorded) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base = format!("http://{}", listener.local_addr().unwrap());
        let recorded: Recorded = Arc::new(Mutex::new(Vec::new()));
        let log = recorded.clone();

        tokio::spawn(async move {
            for (status, body) in responses {
                let (mut sock, _) = listener.accept().await.unwrap();
                let mut buf = Vec::new();
                let mut chunk = [0u8; 4096];
                loop {
                    let n = sock.read(&mut chunk).await.unwrap();
                    if n == 0 {
                        break;
                    }
                    buf.extend_from_slice(&chunk[..n]);
                    let text = String::from_utf8_lossy(&buf).to_string();
                    if let Some(head_end) = text.find("\r\n\r\n") {
                        let content_length = text[..head_end]
                            .lines()
                            .find_map(|l| {
                                let (k, v) = l.split_once(':')?;
                                k.eq_ignore_ascii_case("content-length")
                                    .then(|| v.trim().parse::<usize>().ok())
                                    .flatten()
                            })
                            .unwrap_or(0);
                        if buf.len() >= head_end + 4 + content_length {
                            break;
                        }
                    }
                }
                log.lock()
                    .unwrap()
                    .push(String::from_utf8_lossy(&buf).to_string());

                let resp = format!(
                    "HTTP/1.1 {status} X\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                    body.len()
                );
                sock.write_all(resp.as_bytes()).await.unwrap();
                sock.shutdown().await.ok();
            }
        });

        (base, recorded)
    }

    fn target() -> SyncTarget {
        SyncTarget {
            owner: "owner".into(),
            repo: "site".into(),
            branch: "main".into(),
            path: "data/animeData.json".into(),
            token: "secret".into(),
        }
    }

    #[test]
    fn test_contents_url() {
        let client = GitHubClient::new("https://api.github.com/");
        assert_eq!(
            client.contents_url(&target()).unwrap().as_str(),
            "https://api.github.com/repos/owner/site/contents/data/animeData.json"
        );
        assert_eq!(GitHubClient::new("").api_base, DEFAULT_API_BASE);
    }

    #[test]
    fn test_contents_url_encodes_path_segments() {
        let client = GitHubClient::new("https://ghe.example/api/v3");
        let mut target = target();
        target.path = "data/anime #1?.json".into();
        let url = client.contents_url(&target).unwrap();
        assert_eq!(
            url.as_str(),
            "https://ghe.example/api/v3/repos/owner/site/contents/data/anime%20%231%3F.json"
        );
        assert_eq!(url.query(), None);
        assert_eq!(url.fragment(), None);
    }

    #[test]
    fn test_contents_url_rejects_bad_base() {
        let client = GitHubClient::new("not a url");
        assert!(matches!(
            client.contents_url(&target()),
            Err(SyncError::InvalidUrl(_))
        ));
    }

    #[tokio::test]
    async fn test_fetch_revision_sends_bearer_and_ref() {
        let (base, recorded) = serve(vec![(200, r#"{"sha":"abc123","path":"data/animeData.json"}"#)]).await;
        let client = GitHubClient::new(base);

        let sha = client.fetch_revision(&target()).await.unwrap();
        assert_eq!(sha, "abc123");

        let req = recorded.lock().unwrap()[0].clone();
        assert!(req.starts_with("GET /repos/owner/site/contents/data/animeData.json?ref=main "));
        assert!(req.to_lowercase().contains("authorization: bearer secret"));
    }

    #[tokio::test]
    async fn test_fetch_revision_failure_is_read_error() {
        let (base, _) = serve(vec![(404, r#"{"message":"Not Found"}"#)]).await;
        let client = GitHubClient::new(base);
        match client.fetch_revision(&target()).await {
            Err(SyncError::Read { status, message }) => {
                assert_eq!(status, 404);
                assert!(message.contains("Not Found"));
            }
            other => panic!("expected Read error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_put_content_body_and_stale_sha() {
        let (base, recorded) = serve(vec![
            (200, r#"{"content":{"sha":"new"},"commit":{"sha":"c0ffee"}}"#),
            (409, r#"{"message":"is at abc but expected def"}"#),
        ])
        .await;
        let client = GitHubClient::new(base);
        let body = PutContent {
            message: "Updated via Admin Panel".into(),
            content: "W10=".into(),
            sha: "abc123".into(),
            branch: "main".into(),
        };

        let receipt = client.put_content(&target(), &body).await.unwrap();
        assert_eq!(receipt.commit_sha.as_deref(), Some("c0ffee"));
        assert_eq!(receipt.content_sha.as_deref(), Some("new"));

        let req = recorded.lock().unwrap()[0].clone();
        assert!(req.starts_with("PUT /repos/owner/site/contents/data/animeData.json "));
        let json_start = req.find("\r\n\r\n").unwrap() + 4;
        let sent: PutContent = serde_json::from_str(&req[json_start..]).unwrap();
        assert_eq!(sent, body);

        assert!(matches!(
            client.put_content(&target(), &body).await,
            Err(SyncError::Write { status: 409, .. })
        ));
    }
}
