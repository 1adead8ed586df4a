//! repo::remote

use serde::Serialize;

use crate::git::{Git, GitError, RemoteEntry};

/// A configured remote and its URLs.
///
/// The fetch URL comes first; a separately configured push URL follows it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Remote {
    pub name: String,
    pub urls: Vec<String>,
}

impl Remote {
    /// The fetch URL, if any.
    pub fn url(&self) -> Option<&str> {
        self.urls.first().map(String::as_str)
    }
}

impl From<RemoteEntry> for Remote {
    fn from(entry: RemoteEntry) -> Self {
        let mut urls: Vec<String> = entry.url.into_iter().collect();
        if let Some(push) = entry.push_url {
            if !urls.contains(&push) {
                urls.push(push);
            }
        }
        Self {
            name: entry.name,
            urls,
        }
    }
}

impl std::fmt::Display for Remote {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name)
    }
}

pub(crate) fn load_remotes(git: &Git) -> Result<Vec<Remote>, GitError> {
    Ok(git.remotes()?.into_iter().map(Remote::from).collect())
}
