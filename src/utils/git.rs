//! Last-modification lookup backed by git history.
//!
//! The sitemap and feed passes want a stable per-page timestamp that
//! survives fresh checkouts, where filesystem mtimes are meaningless.
//! Git history provides one: the time of the newest commit that touched
//! the file. Every failure mode here (no repository, untracked file,
//! shallow or empty history) degrades to `None` so callers can fall back
//! to the filesystem.

use chrono::{DateTime, Utc};
use gix::{ObjectId, Repository, ThreadSafeRepository};
use std::path::Path;

/// Source of per-file modification timestamps.
pub trait History {
    /// Time of the newest change to `path`, or `None` when unknown.
    fn last_commit_time(&self, path: &Path) -> Option<DateTime<Utc>>;
}

/// History source for trees outside version control. Always unknown.
pub struct NoHistory;

impl History for NoHistory {
    fn last_commit_time(&self, _path: &Path) -> Option<DateTime<Utc>> {
        None
    }
}

/// History source backed by a discovered git repository.
pub struct GitHistory {
    repo: Option<ThreadSafeRepository>,
}

impl GitHistory {
    /// Discover the repository containing `root`. Absence of a
    /// repository is not an error, only a permanent `None` answer.
    pub fn discover(root: &Path) -> Self {
        Self {
            repo: gix::discover(root).ok().map(gix::Repository::into_sync),
        }
    }
}

impl History for GitHistory {
    fn last_commit_time(&self, path: &Path) -> Option<DateTime<Utc>> {
        let repo = self.repo.as_ref()?.to_thread_local();
        let workdir = repo.workdir()?.canonicalize().ok()?;
        let rel = path.canonicalize().ok()?;
        let rel = rel.strip_prefix(&workdir).ok()?.to_path_buf();
        last_change(&repo, &rel)
    }
}

/// Newest first-parent commit whose tree entry for `rel` differs from
/// its parent's.
fn last_change(repo: &Repository, rel: &Path) -> Option<DateTime<Utc>> {
    let head = repo.head_commit().ok()?;

    // Untracked files have no history to report
    entry_oid(repo, head.id, rel)?;

    let walk = repo.rev_walk([head.id]).first_parent_only().all().ok()?;
    for info in walk {
        let info = info.ok()?;
        let entry = entry_oid(repo, info.id, rel);
        let parent_entry = info
            .parent_ids
            .first()
            .and_then(|parent| entry_oid(repo, *parent, rel));

        if entry != parent_entry {
            let commit = info.object().ok()?;
            let seconds = commit.time().ok()?.seconds;
            return DateTime::from_timestamp(seconds, 0);
        }
    }

    None
}

/// Blob id of `rel` in the tree of the given commit, if present.
fn entry_oid(repo: &Repository, commit_id: ObjectId, rel: &Path) -> Option<ObjectId> {
    let commit = repo.find_object(commit_id).ok()?.try_into_commit().ok()?;
    let tree = commit.tree().ok()?;
    let entry = tree.lookup_entry_by_path(rel).ok()??;
    Some(entry.object_id())
}
