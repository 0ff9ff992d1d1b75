use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_stream::wrappers::WatchStream;
use tracing::trace;

use crate::models::UiState;

/// Merge a cached value and the latest refresh error into a UI state
///
/// A cached value always wins, so a failed refresh stays invisible once
/// anything has been cached. Errors only show on a cold cache.
pub fn project<T: Clone>(cached: Option<&T>, error: Option<&str>) -> UiState<T> {
    match (cached, error) {
        (Some(value), _) => UiState::Success(value.clone()),
        (None, Some(message)) => UiState::Error(message.to_string()),
        (None, None) => UiState::Loading,
    }
}

/// Live [`project`] over two watched inputs
///
/// A background task re-evaluates the merge whenever either input changes
/// and publishes the result on its own watch channel. Identical consecutive
/// states are not re-published. The task stops when both inputs close or
/// the projection is dropped.
pub struct Projection<T> {
    rx: watch::Receiver<UiState<T>>,
    task: JoinHandle<()>,
}

impl<T> Projection<T>
where
    T: Clone + PartialEq + Send + Sync + 'static,
{
    /// Start projecting; must be called inside a tokio runtime
    pub fn spawn(
        mut cache: watch::Receiver<Option<T>>,
        mut error: watch::Receiver<Option<String>>,
    ) -> Self {
        let initial = evaluate(&mut cache, &mut error);
        let (tx, rx) = watch::channel(initial);

        let task = tokio::spawn(async move {
            let mut cache_open = true;
            let mut error_open = true;

            while cache_open || error_open {
                tokio::select! {
                    res = cache.changed(), if cache_open => cache_open = res.is_ok(),
                    res = error.changed(), if error_open => error_open = res.is_ok(),
                }

                let next = evaluate(&mut cache, &mut error);
                let published = tx.send_if_modified(|current| {
                    if *current == next {
                        false
                    } else {
                        *current = next;
                        true
                    }
                });
                if published {
                    trace!("Projection updated");
                }
            }
        });

        Self { rx, task }
    }

    /// Latest projected state
    pub fn current(&self) -> UiState<T> {
        self.rx.borrow().clone()
    }

    /// New receiver positioned at the current state
    pub fn subscribe(&self) -> watch::Receiver<UiState<T>> {
        self.rx.clone()
    }

    /// Stream of states, starting with the current one
    pub fn stream(&self) -> WatchStream<UiState<T>> {
        WatchStream::new(self.rx.clone())
    }
}

impl<T> Drop for Projection<T> {
    fn drop(&mut self) {
        self.task.abort();
    }
}

fn evaluate<T: Clone>(
    cache: &mut watch::Receiver<Option<T>>,
    error: &mut watch::Receiver<Option<String>>,
) -> UiState<T> {
    let cached = cache.borrow_and_update();
    let error = error.borrow_and_update();
    project(cached.as_ref(), error.as_deref())
}
