//! Tokio Runtime Bridge
//!
//! Background work (the refresh timer) is spawned on the ambient tokio runtime
//! when there is one, and on a lazily created process runtime otherwise.
//!
//! ```text
//! caller (inside or outside tokio)
//!       │
//!       ▼
//! runtime_handle()  ── Handle::try_current() ──► ambient runtime
//!       │                    (none)
//!       ▼
//! OnceLock<Runtime>  ──► process runtime
//! ```

use std::future::Future;
use std::sync::OnceLock;
use tokio::runtime::{Handle, Runtime};
use tokio::task::JoinHandle;

/// Process runtime used when no ambient runtime exists
static TOKIO_RUNTIME: OnceLock<Runtime> = OnceLock::new();

fn get_runtime() -> &'static Runtime {
    TOKIO_RUNTIME.get_or_init(|| Runtime::new().expect("Failed to create tokio runtime"))
}

/// Handle to the ambient runtime, or to the process runtime
pub fn runtime_handle() -> Handle {
    Handle::try_current().unwrap_or_else(|_| get_runtime().handle().clone())
}

/// Spawn a named background task and return its handle
pub fn spawn_named<F>(name: &'static str, future: F) -> JoinHandle<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    tracing::debug!("Spawning tokio task: {}", name);
    runtime_handle().spawn(async move {
        future.await;
        tracing::debug!("Tokio task completed: {}", name);
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spawn_without_ambient_runtime() {
        use std::sync::mpsc;
        use std::time::Duration;

        let (tx, rx) = mpsc::channel();
        let _handle = spawn_named("test", async move {
            let _ = tx.send(std::thread::current().name().map(str::to_string));
        });

        let worker = rx.recv_timeout(Duration::from_secs(5)).expect("task ran");
        assert_eq!(worker.as_deref(), Some("tokio-runtime-worker"));
    }
}
