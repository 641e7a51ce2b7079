//! Hook-set composition
//!
//! This module provides the merge that lets several independently registered
//! hook sets observe the same operation:
//! - **`compose_slot`**: Merge one callback slot of a newer set with the older one
//! - **`HookSet`**: The trait every hook-set shape implements (usually derived)
//! - **`composed`**: Build a merged copy without touching the newer set
//!
//! For a slot set in both hook sets, the merged callback runs the newer
//! callback first and the older one second. Slots set in only one of the two
//! pass through unchanged.
//!
//! # Examples
//!
//! ```
//! use reqtrace_core::{Hook, HookSet};
//! use std::sync::{Arc, Mutex};
//!
//! #[derive(Debug, Clone)]
//! struct Finished(u32);
//!
//! #[derive(HookSet, Clone, Default)]
//! struct JobTrace {
//!     finished: Option<Hook<Finished>>,
//! }
//!
//! let log = Arc::new(Mutex::new(Vec::new()));
//!
//! let first = {
//!     let log = Arc::clone(&log);
//!     JobTrace::default().on_finished(move |_| log.lock().unwrap().push("first"))
//! };
//! let second = {
//!     let log = Arc::clone(&log);
//!     JobTrace::default().on_finished(move |_| log.lock().unwrap().push("second"))
//! };
//!
//! let merged = reqtrace_core::composed(&second, Some(&first));
//! merged.emit_finished(&Finished(1));
//!
//! assert_eq!(*log.lock().unwrap(), vec!["second", "first"]);
//! ```

use std::fmt;
use std::sync::Arc;

/// A single lifecycle callback.
///
/// Callbacks may be invoked concurrently from different threads, and some
/// may run after the operation they observe has finished.
pub type Hook<P> = Arc<dyn Fn(&P) + Send + Sync>;

/// Wraps a closure into a [`Hook`].
#[must_use]
pub fn hook<P, F>(f: F) -> Hook<P>
where
    F: Fn(&P) + Send + Sync + 'static,
{
    Arc::new(f)
}

/// An aggregate of named, optional lifecycle callbacks.
///
/// Implement this with `#[derive(HookSet)]`: every field typed
/// `Option<Hook<P>>` becomes a slot, and the generated [`compose`](Self::compose)
/// runs [`compose_slot`] over each of them.
pub trait HookSet: Clone + Send + Sync + 'static {
    /// Slot names in declaration order.
    const SLOTS: &'static [&'static str];

    /// Merges `old` into `self` slot by slot.
    ///
    /// After this call every slot of `self` holds the composition of the
    /// callbacks previously in `self` and `old`, newer first.
    fn compose(&mut self, old: &Self);

    /// Returns true if the named slot holds a callback.
    ///
    /// Unknown slot names report `false`.
    fn is_set(&self, slot: &str) -> bool;

    /// Names of the slots holding a callback.
    fn set_slots(&self) -> Vec<&'static str> {
        Self::SLOTS
            .iter()
            .copied()
            .filter(|slot| self.is_set(slot))
            .collect()
    }

    /// Returns true if no slot holds a callback.
    fn is_empty(&self) -> bool {
        !Self::SLOTS.iter().any(|slot| self.is_set(slot))
    }
}

/// Merges one slot of a newer hook set with the same slot of an older one.
///
/// - `old` unset: `new` is left as it is, set or not
/// - `new` unset: `new` takes `old`'s callback
/// - both set: `new` becomes a callback invoking the previous `new` callback,
///   then `old`'s, with the same payload
///
/// The synthesized callback owns its own handles to both callbacks, so
/// composing the same slot again later never makes it call itself.
pub fn compose_slot<P: 'static>(new: &mut Option<Hook<P>>, old: Option<&Hook<P>>) {
    let Some(old) = old else {
        return;
    };

    *new = match new.take() {
        None => Some(Arc::clone(old)),
        Some(first) => {
            let second = Arc::clone(old);
            let chained: Hook<P> = Arc::new(move |payload: &P| {
                first(payload);
                second(payload);
            });
            Some(chained)
        },
    };
}

/// Returns `new` composed over `old`, leaving both inputs untouched.
#[must_use]
pub fn composed<H: HookSet>(new: &H, old: Option<&H>) -> H {
    let mut merged = new.clone();
    if let Some(old) = old {
        merged.compose(old);
    }
    merged
}

/// Whether a slot holds a callback, for `Debug` output.
#[derive(Clone, Copy, PartialEq, Eq)]
pub enum SlotState {
    /// The slot holds a callback
    Set,
    /// The slot is empty
    Unset,
}

impl SlotState {
    /// Reports the state of `slot`.
    #[must_use]
    pub const fn of<P>(slot: &Option<Hook<P>>) -> Self {
        if slot.is_some() { Self::Set } else { Self::Unset }
    }
}

impl fmt::Debug for SlotState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Set => f.write_str("set"),
            Self::Unset => f.write_str("unset"),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn recorder(log: &Arc<Mutex<Vec<String>>>, label: &str) -> Hook<u32> {
        let log = Arc::clone(log);
        let label = label.to_string();
        hook(move |value: &u32| log.lock().unwrap().push(format!("{label}:{value}")))
    }

    #[test]
    fn test_old_unset_leaves_new() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut slot = Some(recorder(&log, "new"));
        compose_slot(&mut slot, None);

        slot.as_ref().unwrap()(&1);
        assert_eq!(*log.lock().unwrap(), vec!["new:1"]);

        let mut empty: Option<Hook<u32>> = None;
        compose_slot(&mut empty, None);
        assert!(empty.is_none());
    }

    #[test]
    fn test_new_unset_takes_old() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let old = recorder(&log, "old");
        let mut slot: Option<Hook<u32>> = None;
        compose_slot(&mut slot, Some(&old));

        assert!(Arc::ptr_eq(slot.as_ref().unwrap(), &old));
    }

    #[test]
    fn test_both_set_runs_new_then_old() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let old = recorder(&log, "old");
        let mut slot = Some(recorder(&log, "new"));
        compose_slot(&mut slot, Some(&old));

        slot.as_ref().unwrap()(&7);
        assert_eq!(*log.lock().unwrap(), vec!["new:7", "old:7"]);
    }

    #[test]
    fn test_repeated_composition_terminates() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counting = {
            let calls = Arc::clone(&calls);
            hook(move |_: &u32| {
                calls.fetch_add(1, Ordering::SeqCst);
            })
        };

        // Compose the same slot location over and over; each round must
        // capture the previous value, never the slot itself.
        let mut slot = Some(Arc::clone(&counting));
        for _ in 0..4 {
            compose_slot(&mut slot, Some(&counting));
        }

        slot.as_ref().unwrap()(&0);
        assert_eq!(calls.load(Ordering::SeqCst), 5);
    }

    #[test]
    fn test_slot_state_debug() {
        let set: Option<Hook<u32>> = Some(hook(|_: &u32| {}));
        let unset: Option<Hook<u32>> = None;
        assert_eq!(format!("{:?}", SlotState::of(&set)), "set");
        assert_eq!(format!("{:?}", SlotState::of(&unset)), "unset");
    }
}
