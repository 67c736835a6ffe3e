use serde::Deserialize;

/// `GET /repos/{owner}/{repo}/contents/{path}` response (file variant).
#[derive(Debug, Deserialize)]
pub struct ContentResponse {
    pub sha: String,
}

/// `PUT /repos/{owner}/{repo}/contents/{path}` response.
#[derive(Debug, Deserialize)]
pub struct PutResponse {
    #[serde(default)]
    pub content: Option<ContentRef>,
    #[serde(default)]
    pub commit: Option<CommitRef>,
}

#[derive(Debug, Deserialize)]
pub struct ContentRef {
    pub sha: String,
}

#[derive(Debug, Deserialize)]
pub struct CommitRef {
    pub sha: String,
}
