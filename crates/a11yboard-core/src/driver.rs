//! Executing view commands: a cancellable fetch scope and a generic
//! async driver for native callers.

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard};

use futures_util::future::{AbortHandle, Abortable};
use futures_util::stream::{FuturesUnordered, StreamExt};
use tracing::debug;

use crate::artifact::ArtifactTab;
use crate::client::{ArtifactOwner, Backend};
use crate::error::{Result, ViewError};
use crate::view::{Command, Event, RunView};

#[derive(Default)]
struct ScopeInner {
    closed: bool,
    next_id: u64,
    handles: HashMap<u64, AbortHandle>,
}

/// Tracks the in-flight fetches of one mounted view so they can all be
/// aborted when the view goes away.
#[derive(Clone, Default)]
pub struct FetchScope {
    inner: Arc<Mutex<ScopeInner>>,
}

/// Drops a finished (or dropped) fetch's handle from its scope.
struct Tracked {
    id: u64,
    inner: Arc<Mutex<ScopeInner>>,
}

impl Drop for Tracked {
    fn drop(&mut self) {
        lock(&self.inner).handles.remove(&self.id);
    }
}

fn lock(inner: &Mutex<ScopeInner>) -> MutexGuard<'_, ScopeInner> {
    inner.lock().unwrap_or_else(|e| e.into_inner())
}

impl FetchScope {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap `fut` so that [`FetchScope::close`] aborts it. Futures wrapped
    /// after close resolve to `Cancelled` immediately.
    pub fn wrap<F: Future>(&self, fut: F) -> impl Future<Output = Result<F::Output>> {
        let (handle, registration) = AbortHandle::new_pair();
        let tracked = {
            let mut inner = lock(&self.inner);
            if inner.closed {
                handle.abort();
                None
            } else {
                let id = inner.next_id;
                inner.next_id += 1;
                inner.handles.insert(id, handle);
                Some(Tracked {
                    id,
                    inner: Arc::clone(&self.inner),
                })
            }
        };
        async move {
            let _tracked = tracked;
            Abortable::new(fut, registration)
                .await
                .map_err(|_| ViewError::Cancelled)
        }
    }

    /// Abort every tracked fetch and refuse new ones.
    pub fn close(&self) {
        let handles = {
            let mut inner = lock(&self.inner);
            inner.closed = true;
            std::mem::take(&mut inner.handles)
        };
        debug!("Aborting {} in-flight fetch(es)", handles.len());
        for handle in handles.into_values() {
            handle.abort();
        }
    }

    pub fn is_closed(&self) -> bool {
        lock(&self.inner).closed
    }

    /// Number of wrapped fetches that have not finished yet.
    pub fn in_flight(&self) -> usize {
        lock(&self.inner).handles.len()
    }
}

/// Run `commands` and everything they trigger until the view is idle.
///
/// Fetches run concurrently; events are applied in completion order.
/// History pushes are handed to `on_history`.
pub async fn drive<B: Backend>(
    view: &mut RunView,
    backend: &B,
    commands: Vec<Command>,
    mut on_history: impl FnMut(&str),
) {
    let mut pending = FuturesUnordered::new();
    let mut queue = commands;

    loop {
        for command in queue.drain(..) {
            match command {
                Command::Fetch(fetch) => pending.push(fetch.run(backend)),
                Command::PushHistory(hash) => on_history(&hash),
            }
        }
        match pending.next().await {
            Some(event) => queue = view.handle(event),
            None => break,
        }
    }
}

/// Mount a view for `search`/`hash` and drive it to idle.
pub async fn load_view<B: Backend>(backend: &B, search: &str, hash: &str) -> RunView {
    let (mut view, commands) = RunView::mount(search, hash);
    drive(&mut view, backend, commands, |_| {}).await;
    view
}

/// Feed a UI event to a mounted view and drive it to idle.
pub async fn dispatch<B: Backend>(view: &mut RunView, backend: &B, event: Event) {
    let commands = view.handle(event);
    drive(view, backend, commands, |_| {}).await;
}

/// Viewable artifacts attached to one result, in list order. Artifacts
/// without a viewer are skipped.
pub async fn load_result_artifacts<B: Backend>(backend: &B, result_id: &str) -> Result<Vec<ArtifactTab>> {
    let artifacts = backend.list_artifacts(ArtifactOwner::Result(result_id)).await?;
    debug!("Result {} has {} artifact(s)", result_id, artifacts.len());
    let mut tabs = Vec::new();
    for (position, artifact) in artifacts.into_iter().enumerate() {
        let content = backend.view_artifact(&artifact.id).await?;
        tabs.extend(ArtifactTab::from_content(artifact, position, content));
    }
    Ok(tabs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_scope_close_aborts_pending() {
        let scope = FetchScope::new();
        let fut = scope.wrap(futures_util::future::pending::<()>());
        scope.close();
        assert!(matches!(fut.await, Err(ViewError::Cancelled)));
        assert!(scope.is_closed());
    }

    #[tokio::test]
    async fn test_scope_passes_through_when_open() {
        let scope = FetchScope::new();
        assert_eq!(scope.wrap(async { 7 }).await.unwrap(), 7);
    }

    #[tokio::test]
    async fn test_wrap_after_close_is_cancelled() {
        let scope = FetchScope::new();
        scope.close();
        assert!(scope.wrap(async { 1 }).await.is_err());
    }

    #[tokio::test]
    async fn test_finished_fetches_leave_the_scope() {
        let scope = FetchScope::new();
        for i in 0..50 {
            assert_eq!(scope.wrap(async move { i }).await.unwrap(), i);
        }
        assert_eq!(scope.in_flight(), 0);

        let pending = scope.wrap(futures_util::future::pending::<()>());
        assert_eq!(scope.in_flight(), 1);
        drop(pending);
        assert_eq!(scope.in_flight(), 0);
    }

    #[tokio::test]
    async fn test_close_empties_the_scope() {
        let scope = FetchScope::new();
        let fut = scope.wrap(futures_util::future::pending::<()>());
        scope.close();
        assert_eq!(scope.in_flight(), 0);
        assert!(fut.await.is_err());
        assert_eq!(scope.in_flight(), 0);
    }
}
