//! Source reference parsing.
//!
//! A module reference is a user-supplied repository URL such as
//! `https://github.com/acme/widget#v2`. Parsing splits on `/` and `#`,
//! validates the hosting provider, and defaults the git ref to `master`.
//! References live only for the duration of one install call.

use crate::error::{InstallerError, Result};

/// The only hosting provider modules can be fetched from.
pub const SUPPORTED_HOST: &str = "github.com";

/// Git ref used when the reference carries no `#ref` suffix.
pub const DEFAULT_REF: &str = "master";

/// Archive file extension used by the hosting provider's export endpoint.
const ARCHIVE_EXT: &str = "zip";

/// Parsed form of a user-supplied repository URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceReference {
    host: String,
    owner: String,
    repo: String,
    git_ref: String,
}

impl SourceReference {
    /// Parses `raw` into a validated reference.
    ///
    /// Accepts `https://`, `http://`, and bare `github.com/...` spellings,
    /// with an optional leading `www.`. A trailing `#ref` selects a branch
    /// or tag; absent, the ref defaults to [`DEFAULT_REF`].
    ///
    /// # Errors
    ///
    /// Returns [`InstallerError::InvalidReference`] when the host is not
    /// [`SUPPORTED_HOST`] or the owner or repository segment is missing.
    pub fn parse(raw: &str) -> Result<Self> {
        let trimmed = raw
            .trim()
            .trim_start_matches("https://")
            .trim_start_matches("http://")
            .trim_start_matches("www.");

        let mut segments = trimmed.split('/');
        let host = segments.next().unwrap_or_default();
        let owner = segments.next().unwrap_or_default();
        let repo_segment = segments.next().unwrap_or_default();

        let (repo, git_ref) = match repo_segment.split_once('#') {
            Some((repo, git_ref)) => (repo, git_ref),
            None => (repo_segment, DEFAULT_REF),
        };

        if host != SUPPORTED_HOST || owner.is_empty() || repo.is_empty() {
            return Err(InstallerError::InvalidReference {
                reason: format!(
                    "expected https://{SUPPORTED_HOST}/<owner>/<repo>[#ref], got `{raw}`"
                ),
            });
        }
        if git_ref.is_empty() {
            return Err(InstallerError::InvalidReference {
                reason: format!("empty ref after `#` in `{raw}`"),
            });
        }

        Ok(Self {
            host: host.to_owned(),
            owner: owner.to_owned(),
            repo: repo.to_owned(),
            git_ref: git_ref.to_owned(),
        })
    }

    /// Returns the hosting provider's domain.
    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Returns the repository owner.
    #[must_use]
    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// Returns the repository name.
    #[must_use]
    pub fn repo(&self) -> &str {
        &self.repo
    }

    /// Returns the branch or tag to fetch.
    #[must_use]
    pub fn git_ref(&self) -> &str {
        &self.git_ref
    }

    /// Builds the archive download URL for this reference.
    ///
    /// Follows the hosting provider's export convention:
    /// `https://<host>/<owner>/<repo>/archive/<ref>.zip`.
    #[must_use]
    pub fn archive_url(&self) -> String {
        format!(
            "https://{}/{}/{}/archive/{}.{ARCHIVE_EXT}",
            self.host, self.owner, self.repo, self.git_ref
        )
    }
}
