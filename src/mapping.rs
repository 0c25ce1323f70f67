//! Per-device routing table: input identifier → resolved host command.
//!
//! Built once when a device is opened and never touched again except for
//! lookups, so ticks never go back to the host's name resolver.

use crate::action::{ActionHandle, ActionHost};
use crate::config::MappingTarget;
use std::collections::HashMap;

/// Resolved mapping of one device.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Mapping {
    entries: HashMap<String, ActionHandle>,
}

impl Mapping {
    /// Resolve every configured `(identifier, command name)` pair.
    ///
    /// Non-string targets are skipped silently. Names the host cannot
    /// resolve are skipped with one warning each; `device` is the 1-based
    /// device number used in that warning.
    pub fn build<'a, I, H>(device: usize, config: I, host: &mut H) -> Self
    where
        I: IntoIterator<Item = (&'a String, &'a MappingTarget)>,
        H: ActionHost + ?Sized,
    {
        let mut entries = HashMap::new();

        for (input, target) in config {
            let Some(name) = target.action_name() else {
                continue;
            };

            match host.resolve(name) {
                Some(handle) => {
                    entries.insert(input.clone(), handle);
                }
                None => {
                    log::warn!("Device {device}: Unknown command: {name}");
                }
            }
        }

        Self { entries }
    }

    /// Exact, case-sensitive lookup.
    #[inline]
    pub fn lookup(&self, input: &str) -> Option<ActionHandle> {
        self.entries.get(input).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate `(identifier, handle)` pairs in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, ActionHandle)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

impl FromIterator<(String, ActionHandle)> for Mapping {
    fn from_iter<T: IntoIterator<Item = (String, ActionHandle)>>(iter: T) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::ActionKind;
    use serde::de::IgnoredAny;
    use std::collections::BTreeMap;

    /// Resolves names from a fixed table and counts lookups.
    struct TableHost {
        known: HashMap<&'static str, u64>,
        resolved: Vec<String>,
    }

    impl TableHost {
        fn new(known: &[(&'static str, u64)]) -> Self {
            Self {
                known: known.iter().copied().collect(),
                resolved: Vec::new(),
            }
        }
    }

    impl ActionHost for TableHost {
        fn resolve(&mut self, name: &str) -> Option<ActionHandle> {
            self.resolved.push(name.to_string());
            self.known.get(name).copied().map(ActionHandle::from_raw)
        }

        fn invoke(&mut self, _kind: ActionKind, _handle: ActionHandle) {}
    }

    fn action(name: &str) -> MappingTarget {
        MappingTarget::Action(name.to_string())
    }

    #[test]
    fn test_build_resolves_and_skips() {
        let mut cfg = BTreeMap::new();
        cfg.insert("FLAP_UP".to_string(), action("sim/flaps_up"));
        cfg.insert("FLAP_DN".to_string(), action("sim/flaps_down"));
        cfg.insert("BOGUS".to_string(), action("sim/not_a_command"));
        cfg.insert("NUMBER".to_string(), MappingTarget::Ignored(IgnoredAny));

        let mut host = TableHost::new(&[("sim/flaps_up", 1), ("sim/flaps_down", 2)]);
        let mapping = Mapping::build(1, &cfg, &mut host);

        assert_eq!(mapping.len(), 2);
        assert_eq!(mapping.lookup("FLAP_UP"), Some(ActionHandle::from_raw(1)));
        assert_eq!(mapping.lookup("FLAP_DN"), Some(ActionHandle::from_raw(2)));
        assert_eq!(mapping.lookup("BOGUS"), None);
        assert_eq!(mapping.lookup("NUMBER"), None);
        // The non-string entry never reaches the resolver; the unknown one is tried once.
        assert_eq!(host.resolved.len(), 3);
        assert_eq!(
            host.resolved.iter().filter(|n| *n == "sim/not_a_command").count(),
            1
        );
    }

    #[test]
    fn test_lookup_is_case_sensitive() {
        let mapping: Mapping = [("Flap".to_string(), ActionHandle::from_raw(9))]
            .into_iter()
            .collect();
        assert_eq!(mapping.lookup("Flap"), Some(ActionHandle::from_raw(9)));
        assert_eq!(mapping.lookup("FLAP"), None);
        assert_eq!(mapping.lookup("flap"), None);
    }

    #[test]
    fn test_build_is_order_independent() {
        let pairs = [
            ("A".to_string(), action("x/a")),
            ("B".to_string(), action("x/b")),
            ("C".to_string(), action("x/missing")),
        ];
        let known = [("x/a", 10), ("x/b", 11)];

        let forward = Mapping::build(1, pairs.iter().map(|(k, v)| (k, v)), &mut TableHost::new(&known));
        let backward = Mapping::build(
            1,
            pairs.iter().rev().map(|(k, v)| (k, v)),
            &mut TableHost::new(&known),
        );
        assert_eq!(forward, backward);
    }
}
