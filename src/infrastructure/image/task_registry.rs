//! Process-wide registry of in-flight image requests.

use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

use parking_lot::Mutex;
use tracing::{debug, trace};

use crate::domain::entities::{ConsumerId, LoadTicket};
use crate::domain::ports::{TaskHandle, TaskRegistryPort};

static SHARED: OnceLock<Arc<TaskRegistry>> = OnceLock::new();

/// Maps each view to the request currently loading into it.
#[derive(Default)]
pub struct TaskRegistry {
    tasks: Mutex<HashMap<ConsumerId, TaskHandle>>,
}

impl TaskRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the process-wide registry, creating it on first use.
    #[must_use]
    pub fn shared() -> Arc<Self> {
        SHARED.get_or_init(|| Arc::new(Self::new())).clone()
    }
}

impl std::fmt::Debug for TaskRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskRegistry")
            .field("pending", &self.len())
            .finish()
    }
}

impl TaskRegistryPort for TaskRegistry {
    fn register(&self, id: ConsumerId, handle: TaskHandle) -> bool {
        let ticket = handle.ticket();
        let previous = {
            let mut tasks = self.tasks.lock();
            // Tickets only grow per view, so an older handle lost a race.
            if let Some(current) = tasks.get(&id).map(TaskHandle::ticket)
                && current > ticket
            {
                drop(tasks);
                handle.cancel();
                debug!(
                    id = %id,
                    ticket = %ticket,
                    current = %current,
                    "Rejected superseded image request"
                );
                return false;
            }
            tasks.insert(id, handle)
        };

        match previous {
            Some(previous) => {
                previous.cancel();
                debug!(
                    id = %id,
                    replaced = %previous.ticket(),
                    ticket = %ticket,
                    "Replaced in-flight image request"
                );
                true
            }
            None => {
                trace!(id = %id, ticket = %ticket, "Registered image request");
                false
            }
        }
    }

    fn cancel(&self, id: ConsumerId) -> bool {
        let Some(handle) = self.tasks.lock().remove(&id) else {
            return false;
        };
        handle.cancel();
        debug!(id = %id, ticket = %handle.ticket(), "Cancelled image request");
        true
    }

    fn clear(&self, id: ConsumerId, ticket: LoadTicket) -> bool {
        let mut tasks = self.tasks.lock();
        if tasks.get(&id).is_some_and(|h| h.ticket() == ticket) {
            tasks.remove(&id);
            trace!(id = %id, ticket = %ticket, "Cleared finished image request");
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
