//! Single-task presentation context.
//!
//! Every visual mutation is dispatched here so that updates coming from
//! worker tasks are applied one at a time, in submission order.

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

type Job = Box<dyn FnOnce() + Send + 'static>;

enum Message {
    Run(Job),
    Flush(oneshot::Sender<()>),
}

/// Handle to the presentation context. Cheap to clone.
#[derive(Clone)]
pub struct MainContext {
    tx: mpsc::UnboundedSender<Message>,
}

impl MainContext {
    /// Starts the presentation task on the current runtime.
    ///
    /// The task stops once every handle has been dropped.
    ///
    /// # Panics
    /// Panics when called outside a tokio runtime.
    #[must_use]
    pub fn spawn() -> (Self, JoinHandle<()>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let handle = tokio::spawn(Self::run(rx));
        (Self { tx }, handle)
    }

    async fn run(mut rx: mpsc::UnboundedReceiver<Message>) {
        while let Some(message) = rx.recv().await {
            match message {
                Message::Run(job) => job(),
                Message::Flush(done) => {
                    let _ = done.send(());
                }
            }
        }
        debug!("Presentation context stopped");
    }

    /// Queues `job` to run on the presentation task. Callable from any thread.
    pub fn dispatch(&self, job: impl FnOnce() + Send + 'static) {
        if self.tx.send(Message::Run(Box::new(job))).is_err() {
            warn!("Presentation context is closed, dropping update");
        }
    }

    /// Resolves once everything dispatched before this call has run.
    pub async fn flush(&self) {
        let (done_tx, done_rx) = oneshot::channel();
        if self.tx.send(Message::Flush(done_tx)).is_ok() {
            let _ = done_rx.await;
        }
    }

    /// Returns true while the presentation task accepts work.
    #[must_use]
    pub fn is_open(&self) -> bool {
        !self.tx.is_closed()
    }
}

impl std::fmt::Debug for MainContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MainContext")
            .field("open", &self.is_open())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use parking_lot::Mutex;

    use super::*;

    #[tokio::test]
    async fn test_jobs_run_in_order() {
        let (main, _task) = MainContext::spawn();
        let log = Arc::new(Mutex::new(Vec::new()));

        for i in 0..5 {
            let log = log.clone();
            main.dispatch(move || log.lock().push(i));
        }
        main.flush().await;

        assert_eq!(*log.lock(), vec![0, 1, 2, 3, 4]);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_dispatch_from_worker_threads() {
        let (main, _task) = MainContext::spawn();
        let counter = Arc::new(Mutex::new(0));

        let mut workers = Vec::new();
        for _ in 0..8 {
            let main = main.clone();
            let counter = counter.clone();
            workers.push(tokio::spawn(async move {
                main.dispatch(move || *counter.lock() += 1);
            }));
        }
        for worker in workers {
            worker.await.unwrap();
        }
        main.flush().await;

        assert_eq!(*counter.lock(), 8);
    }

    #[tokio::test]
    async fn test_dispatch_after_shutdown_is_dropped() {
        let (main, task) = MainContext::spawn();
        task.abort();
        let _ = task.await;

        assert!(!main.is_open());
        main.dispatch(|| panic!("must not run"));
        main.flush().await;
    }
}
