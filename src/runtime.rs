//! Runtime abstraction layer for async operations
//!
//! The geosearch debounce timer and the services that issue viewport changes
//! never call the executor directly; they go through [`spawn`], which returns a
//! cancellable [`AsyncHandle`] backed by tokio.

use std::future::Future;
use std::pin::Pin;

/// A trait for spawning async tasks (object-safe version)
pub trait AsyncSpawner: Send + Sync + 'static {
    /// Spawn a future and return a handle to it
    fn spawn_boxed(
        &self,
        future: Pin<Box<dyn Future<Output = ()> + Send + 'static>>,
    ) -> Box<dyn AsyncHandle>;
}

/// Handle to a spawned async task
pub trait AsyncHandle: Send + Sync {
    /// Check if the task is finished
    fn is_finished(&self) -> bool;

    /// Cancel the task; a task parked on a timer never resumes
    fn cancel(&self);
}

/// Spawn a future on the tokio runtime
pub fn spawn<F>(future: F) -> Box<dyn AsyncHandle>
where
    F: Future<Output = ()> + Send + 'static,
{
    log::trace!("runtime::spawn");
    runtime().spawn_boxed(Box::pin(future))
}

/// Default spawner implementations
pub mod spawners {
    use super::*;

    pub mod tokio_impl {
        use super::*;
        use ::tokio::task::JoinHandle;

        /// Tokio-based async spawner
        pub struct TokioSpawner;

        impl AsyncSpawner for TokioSpawner {
            fn spawn_boxed(
                &self,
                future: Pin<Box<dyn Future<Output = ()> + Send + 'static>>,
            ) -> Box<dyn AsyncHandle> {
                let handle = ::tokio::spawn(future);
                Box::new(TokioHandle(handle))
            }
        }

        struct TokioHandle(JoinHandle<()>);

        impl AsyncHandle for TokioHandle {
            fn is_finished(&self) -> bool {
                self.0.is_finished()
            }

            fn cancel(&self) {
                self.0.abort();
            }
        }
    }
}

/// Unified async utilities
pub mod async_utils {
    use std::time::Duration;

    /// Runtime-agnostic delay
    pub async fn async_delay(duration: Duration) {
        tokio::time::sleep(duration).await;
    }

    /// Resolves to `None` if `future` does not complete within `duration`
    pub async fn with_timeout<F, T>(duration: Duration, future: F) -> Option<T>
    where
        F: std::future::Future<Output = T>,
    {
        tokio::time::timeout(duration, future).await.ok()
    }
}

static TOKIO: spawners::tokio_impl::TokioSpawner = spawners::tokio_impl::TokioSpawner;

/// Get the runtime spawner
pub fn runtime() -> &'static dyn AsyncSpawner {
    &TOKIO
}
