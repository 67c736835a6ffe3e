//! User-facing messages.
//!
//! Business logic returns typed results; this is the one place they are
//! turned into text for the operator.

use eizou_api::{PublishReceipt, SyncError};
use eizou_core::admin::AdminOutcome;
use eizou_core::error::ValidationError;

/// Kind of notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
    Info,
}

/// A single message for the operator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            message: message.into(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Info,
            message: message.into(),
        }
    }

    pub fn from_admin(result: &Result<AdminOutcome, ValidationError>) -> Self {
        match result {
            Ok(outcome) => Self::success(match outcome {
                AdminOutcome::AnimeAdded(_) => "Anime added.",
                AdminOutcome::AnimeUpdated(_) => "Anime updated.",
                AdminOutcome::AnimeDeleted(_) => "Anime deleted.",
                AdminOutcome::SeasonAdded(_) => "Season added.",
                AdminOutcome::SeasonRenamed(_) => "Season updated.",
                AdminOutcome::SeasonDeleted(_) => "Season deleted.",
                AdminOutcome::EpisodeAdded(_) => "Episode added.",
                AdminOutcome::EpisodeUpdated(_) => "Episode updated.",
                AdminOutcome::EpisodeDeleted(_) => "Episode deleted.",
            }),
            Err(e) => Self::error(match e {
                ValidationError::MissingField("id" | "title") => "ID & Title required.".into(),
                ValidationError::MissingField("anime" | "season name") => {
                    "Select anime & enter season name.".into()
                }
                ValidationError::DuplicateSeason(_) => "Season already exists!".into(),
                ValidationError::DuplicateEpisode(_) => {
                    "Episode exists. Use Update instead.".into()
                }
                ValidationError::EpisodeNotFound(_) => "Episode not found.".into(),
                other => capitalize(&other.to_string()),
            }),
        }
    }

    pub fn from_sync(result: &Result<PublishReceipt, SyncError>) -> Self {
        match result {
            Ok(_) => Self::success("Uploaded! The site will redeploy."),
            Err(SyncError::MissingConfig(_)) => Self::error("Fill all GitHub fields."),
            Err(SyncError::Read { .. }) => Self::error("Failed to read existing file."),
            Err(SyncError::Write { .. }) => Self::error("GitHub upload failed."),
            Err(e) => Self::error(format!("GitHub upload failed: {e}")),
        }
    }
}

impl std::fmt::Display for Notice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let tag = match self.kind {
            NoticeKind::Success => "ok",
            NoticeKind::Error => "error",
            NoticeKind::Info => "info",
        };
        write!(f, "[{tag}] {}", self.message)
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_admin_messages() {
        assert_eq!(
            Notice::from_admin(&Ok(AdminOutcome::AnimeAdded("x".into()))),
            Notice::success("Anime added.")
        );
        assert_eq!(
            Notice::from_admin(&Err(ValidationError::MissingField("title"))).message,
            "ID & Title required."
        );
        assert_eq!(
            Notice::from_admin(&Err(ValidationError::DuplicateSeason("S1".into()))).message,
            "Season already exists!"
        );
        assert_eq!(
            Notice::from_admin(&Err(ValidationError::AnimeNotFound("x".into()))).message,
            "Anime not found: x"
        );
    }

    #[test]
    fn test_sync_messages() {
        let n = Notice::from_sync(&Err(SyncError::MissingConfig("repo")));
        assert_eq!(n.kind, NoticeKind::Error);
        assert_eq!(n.message, "Fill all GitHub fields.");

        let n = Notice::from_sync(&Err(SyncError::Write {
            status: 409,
            message: String::new(),
        }));
        assert_eq!(n.message, "GitHub upload failed.");
    }

    #[test]
    fn test_display() {
        assert_eq!(Notice::info("hi").to_string(), "[info] hi");
    }
}
