//! Observable value holder.

use std::sync::Arc;

use parking_lot::{Mutex, RwLock};

type Callback<T> = Arc<dyn Fn(&T) + Send + Sync>;

/// A value that notifies one observer whenever it changes.
///
/// ```
/// use viewkit::util::Binding;
///
/// let names = Binding::new(Vec::<String>::new());
/// names.on_value_change(|names| println!("{} names", names.len()));
/// names.set(vec!["Ada".to_string(), "Grace".to_string()]);
/// assert_eq!(names.get().len(), 2);
/// ```
pub struct Binding<T> {
    value: RwLock<T>,
    callback: Mutex<Option<Callback<T>>>,
}

impl<T: Clone> Binding<T> {
    #[must_use]
    pub fn new(value: T) -> Self {
        Self {
            value: RwLock::new(value),
            callback: Mutex::new(None),
        }
    }

    /// Returns a copy of the current value.
    #[must_use]
    pub fn get(&self) -> T {
        self.value.read().clone()
    }

    /// Borrows the current value.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.value.read())
    }

    /// Replaces the value and notifies the observer.
    pub fn set(&self, value: T) {
        self.update(|current| *current = value);
    }

    /// Mutates the value in place and notifies the observer.
    pub fn update(&self, f: impl FnOnce(&mut T)) {
        let snapshot = {
            let mut value = self.value.write();
            f(&mut value);
            value.clone()
        };
        // Callback runs without any lock held so it may read the binding.
        let callback = self.callback.lock().clone();
        if let Some(callback) = callback {
            callback(&snapshot);
        }
    }

    /// Registers the observer, replacing any previous one.
    pub fn on_value_change(&self, callback: impl Fn(&T) + Send + Sync + 'static) {
        *self.callback.lock() = Some(Arc::new(callback));
    }

    /// Removes the observer.
    pub fn clear_observer(&self) {
        *self.callback.lock() = None;
    }
}

impl<T: Clone + Default> Default for Binding<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for Binding<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Binding")
            .field("value", &*self.value.read())
            .field("observed", &self.callback.lock().is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_set_notifies_with_new_value() {
        let binding = Binding::new(1);
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        binding.on_value_change(move |v| sink.lock().push(*v));

        binding.set(2);
        binding.update(|v| *v += 40);

        assert_eq!(*seen.lock(), vec![2, 42]);
        assert_eq!(binding.get(), 42);
    }

    #[test]
    fn test_no_observer_is_fine() {
        let binding = Binding::new(String::from("a"));
        binding.set("b".to_string());
        assert_eq!(binding.with(String::len), 1);
    }

    #[test]
    fn test_registering_replaces_observer() {
        let binding = Binding::new(0);
        let first = Arc::new(AtomicUsize::new(0));
        let second = Arc::new(AtomicUsize::new(0));

        let f = first.clone();
        binding.on_value_change(move |_| {
            f.fetch_add(1, Ordering::SeqCst);
        });
        let s = second.clone();
        binding.on_value_change(move |_| {
            s.fetch_add(1, Ordering::SeqCst);
        });
        binding.set(1);

        assert_eq!(first.load(Ordering::SeqCst), 0);
        assert_eq!(second.load(Ordering::SeqCst), 1);

        binding.clear_observer();
        binding.set(2);
        assert_eq!(second.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_observer_may_read_binding() {
        let binding = Arc::new(Binding::new(0));
        let reader = binding.clone();
        let observed = Arc::new(AtomicUsize::new(0));
        let sink = observed.clone();
        binding.on_value_change(move |_| {
            sink.store(reader.get(), Ordering::SeqCst);
        });

        binding.set(7);
        assert_eq!(observed.load(Ordering::SeqCst), 7);
    }
}
