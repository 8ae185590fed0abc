//! Port definition for in-flight request bookkeeping.

use tokio::task::AbortHandle;

use crate::domain::entities::{ConsumerId, LoadTicket};

/// Handle to a spawned load request.
#[derive(Debug)]
pub struct TaskHandle {
    ticket: LoadTicket,
    abort: AbortHandle,
}

impl TaskHandle {
    #[must_use]
    pub const fn new(ticket: LoadTicket, abort: AbortHandle) -> Self {
        Self { ticket, abort }
    }

    #[must_use]
    pub const fn ticket(&self) -> LoadTicket {
        self.ticket
    }

    /// Requests termination of the task at its next await point.
    pub fn cancel(&self) {
        self.abort.abort();
    }
}

/// Port mapping each consumer to its in-flight request.
///
/// At most one handle is kept per consumer. Registering for a consumer that
/// already has a handle cancels the old one before replacing it. Tickets grow
/// monotonically per consumer, so a handle carrying an older ticket than the
/// stored one is cancelled instead and the stored handle stays.
pub trait TaskRegistryPort: Send + Sync {
    /// Stores `handle` for `id`, cancelling whichever of the two handles is
    /// older. Returns true if a previous handle was replaced.
    fn register(&self, id: ConsumerId, handle: TaskHandle) -> bool;

    /// Cancels and removes the handle for `id`. No-op when absent.
    fn cancel(&self, id: ConsumerId) -> bool;

    /// Removes the handle for `id` only if it belongs to `ticket`.
    fn clear(&self, id: ConsumerId, ticket: LoadTicket) -> bool;

    /// Returns true if `ticket` is the registered request for `id`.
    fn is_current(&self, id: ConsumerId, ticket: LoadTicket) -> bool;

    /// Number of registered requests.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use parking_lot::Mutex;
    use std::collections::HashMap;

    /// Registry that records handles but never cancels anything.
    ///
    /// Lets tests observe what happens when a superseded request still
    /// runs to completion.
    #[derive(Default)]
    pub struct NonCancellingRegistry {
        tasks: Mutex<HashMap<ConsumerId, TaskHandle>>,
    }

    impl TaskRegistryPort for NonCancellingRegistry {
        fn register(&self, id: ConsumerId, handle: TaskHandle) -> bool {
            self.tasks.lock().insert(id, handle).is_some()
        }

        fn cancel(&self, _id: ConsumerId) -> bool {
            false
        }

        fn clear(&self, id: ConsumerId, ticket: LoadTicket) -> bool {
            let mut tasks = self.tasks.lock();
            if tasks.get(&id).is_some_and(|h| h.ticket() == ticket) {
                tasks.remove(&id);
                return true;
            }
            false
        }

        fn is_current(&self, id: ConsumerId, ticket: LoadTicket) -> bool {
            self.tasks
                .lock()
                .get(&id)
                .is_some_and(|h| h.ticket() == ticket)
        }

        fn len(&self) -> usize {
            self.tasks.lock().len()
        }
    }
}
