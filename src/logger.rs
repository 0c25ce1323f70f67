use crate::action::{ActionHandle, ActionHost, ActionKind};
use std::collections::HashMap;

/// Wraps a host and logs every command call by name before forwarding it.
pub struct LoggingHost<H> {
    inner: H,
    names: HashMap<ActionHandle, String>,
}

impl<H: ActionHost> LoggingHost<H> {
    pub fn new(inner: H) -> Self {
        Self {
            inner,
            names: HashMap::new(),
        }
    }

    pub fn into_inner(self) -> H {
        self.inner
    }

    /// Name a handle was resolved from, if it came through this wrapper.
    pub fn name_of(&self, handle: ActionHandle) -> Option<&str> {
        self.names.get(&handle).map(String::as_str)
    }
}

impl<H: ActionHost> ActionHost for LoggingHost<H> {
    fn resolve(&mut self, name: &str) -> Option<ActionHandle> {
        let handle = self.inner.resolve(name)?;
        self.names.insert(handle, name.to_string());
        Some(handle)
    }

    fn invoke(&mut self, kind: ActionKind, handle: ActionHandle) {
        match self.names.get(&handle) {
            Some(name) => log::info!("[Action] {kind} {name}"),
            None => log::info!("[Action] {kind} {handle}"),
        }
        self.inner.invoke(kind, handle);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Counter {
        next: u64,
        invoked: usize,
    }

    impl ActionHost for Counter {
        fn resolve(&mut self, name: &str) -> Option<ActionHandle> {
            if name.is_empty() {
                return None;
            }
            self.next += 1;
            Some(ActionHandle::from_raw(self.next))
        }

        fn invoke(&mut self, _kind: ActionKind, _handle: ActionHandle) {
            self.invoked += 1;
        }
    }

    #[test]
    fn test_names_are_remembered_and_calls_forwarded() {
        let mut host = LoggingHost::new(Counter::default());
        let h = host.resolve("sim/flaps_up").unwrap();
        assert!(host.resolve("").is_none());
        assert_eq!(host.name_of(h), Some("sim/flaps_up"));

        host.invoke(ActionKind::Begin, h);
        host.invoke(ActionKind::End, ActionHandle::from_raw(99));
        assert_eq!(host.into_inner().invoked, 2);
    }
}
