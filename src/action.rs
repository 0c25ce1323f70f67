//! Host action surface.
//!
//! The simulator owns its command namespace. `gearbridge` only ever sees
//! opaque handles that it stores, compares and hands back; it never looks
//! inside them.

use std::fmt;

/// Opaque token identifying a resolved host command.
///
/// Hosts that hand out pointers can stash the address in here via
/// [`ActionHandle::from_raw`]; the bridge never dereferences it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ActionHandle(u64);

impl ActionHandle {
    #[inline]
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    #[inline]
    pub const fn into_raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ActionHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:x}", self.0)
    }
}

/// How a command is driven.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ActionKind {
    /// Fire once (bare `IDENT` line).
    Once,
    /// Start holding (`IDENT=1`).
    Begin,
    /// Stop holding (`IDENT=0`).
    End,
}

impl ActionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ActionKind::Once => "once",
            ActionKind::Begin => "begin",
            ActionKind::End => "end",
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// The simulator side of the bridge.
///
/// `resolve` is consulted only while devices are being opened; `invoke` is
/// called from inside [`Bridge::tick`](crate::bridge::Bridge::tick) and must
/// not block.
pub trait ActionHost {
    /// Look up a command by name. `None` means the host does not know it.
    fn resolve(&mut self, name: &str) -> Option<ActionHandle>;

    /// Drive a previously resolved command.
    fn invoke(&mut self, kind: ActionKind, handle: ActionHandle);
}

impl<H: ActionHost + ?Sized> ActionHost for &mut H {
    fn resolve(&mut self, name: &str) -> Option<ActionHandle> {
        (**self).resolve(name)
    }

    fn invoke(&mut self, kind: ActionKind, handle: ActionHandle) {
        (**self).invoke(kind, handle)
    }
}
