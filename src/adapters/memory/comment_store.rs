//! In-memory implementation of the comment store ports.
//!
//! Tracks how many sessions were acquired and released and how many store
//! operations ran, and can be switched into failure modes per operation.

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::domain::comment::Comment;
use crate::ports::{SessionPool, StoreError, StoreSession};

/// Snapshot of store activity counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StoreStats {
    /// Sessions handed out by `acquire`.
    pub acquired: usize,
    /// Sessions dropped.
    pub released: usize,
    /// Insert operations attempted.
    pub inserts: usize,
    /// Listing queries attempted.
    pub queries: usize,
}

impl StoreStats {
    /// Sessions acquired but not yet released.
    pub fn outstanding(&self) -> usize {
        self.acquired.saturating_sub(self.released)
    }
}

#[derive(Debug, Default)]
struct Shared {
    comments: Mutex<Vec<Comment>>,
    acquired: AtomicUsize,
    released: AtomicUsize,
    inserts: AtomicUsize,
    queries: AtomicUsize,
    fail_acquire: AtomicBool,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
    closed: AtomicBool,
}

/// In-memory comment store acting as its own session pool.
///
/// Cloning shares the underlying data and counters.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCommentStore {
    shared: Arc<Shared>,
}

impl InMemoryCommentStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with comments.
    pub fn with_comments(comments: Vec<Comment>) -> Self {
        let store = Self::new();
        if let Ok(mut stored) = store.shared.comments.lock() {
            *stored = comments;
        }
        store
    }

    /// Make `acquire` fail as if the pool were exhausted.
    pub fn fail_acquire(&self, fail: bool) {
        self.shared.fail_acquire.store(fail, Ordering::SeqCst);
    }

    /// Make listing queries fail.
    pub fn fail_reads(&self, fail: bool) {
        self.shared.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Make inserts fail.
    pub fn fail_writes(&self, fail: bool) {
        self.shared.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Current activity counters.
    pub fn stats(&self) -> StoreStats {
        StoreStats {
            acquired: self.shared.acquired.load(Ordering::SeqCst),
            released: self.shared.released.load(Ordering::SeqCst),
            inserts: self.shared.inserts.load(Ordering::SeqCst),
            queries: self.shared.queries.load(Ordering::SeqCst),
        }
    }

    /// Number of stored comments.
    pub fn len(&self) -> usize {
        self.shared.comments.lock().map(|c| c.len()).unwrap_or(0)
    }

    /// True when nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Copy of everything stored, in insertion order.
    pub fn snapshot(&self) -> Vec<Comment> {
        self.shared
            .comments
            .lock()
            .map(|c| c.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl SessionPool for InMemoryCommentStore {
    async fn acquire(&self) -> Result<Box<dyn StoreSession>, StoreError> {
        if self.shared.closed.load(Ordering::SeqCst) {
            return Err(StoreError::unavailable("pool is closed"));
        }
        if self.shared.fail_acquire.load(Ordering::SeqCst) {
            return Err(StoreError::unavailable("no sessions available"));
        }

        self.shared.acquired.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(InMemorySession {
            shared: Arc::clone(&self.shared),
        }))
    }

    async fn close(&self) {
        self.shared.closed.store(true, Ordering::SeqCst);
    }
}

/// Session borrowed from an `InMemoryCommentStore`.
#[derive(Debug)]
struct InMemorySession {
    shared: Arc<Shared>,
}

#[async_trait]
impl StoreSession for InMemorySession {
    async fn insert_comment(&mut self, comment: &Comment) -> Result<(), StoreError> {
        self.shared.inserts.fetch_add(1, Ordering::SeqCst);
        if self.shared.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::backend("write rejected by in-memory store"));
        }

        let mut comments = self
            .shared
            .comments
            .lock()
            .map_err(|_| StoreError::backend("in-memory store lock poisoned"))?;

        if comments.iter().any(|c| c.id() == comment.id()) {
            return Err(StoreError::backend(format!(
                "duplicate key: {}",
                comment.id()
            )));
        }
        comments.push(comment.clone());
        Ok(())
    }

    async fn recent_comments(&mut self, limit: usize) -> Result<Vec<Comment>, StoreError> {
        self.shared.queries.fetch_add(1, Ordering::SeqCst);
        if self.shared.fail_reads.load(Ordering::SeqCst) {
            return Err(StoreError::backend("read failed in in-memory store"));
        }

        let mut comments = self
            .shared
            .comments
            .lock()
            .map_err(|_| StoreError::backend("in-memory store lock poisoned"))?
            .clone();

        comments.sort_by(Comment::newest_first);
        comments.truncate(limit);
        Ok(comments)
    }
}

impl Drop for InMemorySession {
    fn drop(&mut self) {
        self.shared.released.fetch_add(1, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{CommentId, Timestamp};

    #[tokio::test]
    async fn acquire_and_drop_are_counted() {
        let store = InMemoryCommentStore::new();

        let session = store.acquire().await.unwrap();
        assert_eq!(store.stats().outstanding(), 1);

        drop(session);
        let stats = store.stats();
        assert_eq!(stats.acquired, 1);
        assert_eq!(stats.released, 1);
    }

    #[tokio::test]
    async fn failing_acquire_does_not_count() {
        let store = InMemoryCommentStore::new();
        store.fail_acquire(true);

        assert!(matches!(
            store.acquire().await,
            Err(StoreError::Unavailable(_))
        ));
        assert_eq!(store.stats(), StoreStats::default());
    }

    #[tokio::test]
    async fn closed_pool_refuses_sessions() {
        let store = InMemoryCommentStore::new();
        store.close().await;
        assert!(store.acquire().await.is_err());
    }

    #[tokio::test]
    async fn insert_then_list_newest_first() {
        let store = InMemoryCommentStore::new();
        let mut session = store.acquire().await.unwrap();

        let base = Timestamp::from_unix_secs(1_700_000_000);
        for i in 0..3 {
            let comment = Comment::reconstitute(
                CommentId::new(),
                "a".into(),
                format!("{}", i),
                base.plus_secs(i),
            );
            session.insert_comment(&comment).await.unwrap();
        }

        let listed = session.recent_comments(2).await.unwrap();
        let texts: Vec<&str> = listed.iter().map(|c| c.text()).collect();
        assert_eq!(texts, vec!["2", "1"]);
        assert_eq!(store.len(), 3);
    }

    #[tokio::test]
    async fn duplicate_ids_are_rejected() {
        let store = InMemoryCommentStore::new();
        let mut session = store.acquire().await.unwrap();
        let comment = Comment::new("a", "b");

        session.insert_comment(&comment).await.unwrap();
        let second = session.insert_comment(&comment).await;

        assert!(matches!(second, Err(StoreError::Backend(_))));
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn failure_switches_apply_per_operation() {
        let store = InMemoryCommentStore::new();
        let mut session = store.acquire().await.unwrap();

        store.fail_writes(true);
        assert!(session.insert_comment(&Comment::new("a", "b")).await.is_err());
        assert!(session.recent_comments(10).await.is_ok());

        store.fail_writes(false);
        store.fail_reads(true);
        assert!(session.insert_comment(&Comment::new("a", "b")).await.is_ok());
        assert!(session.recent_comments(10).await.is_err());

        let stats = store.stats();
        assert_eq!(stats.inserts, 2);
        assert_eq!(stats.queries, 2);
    }
}
