//! Binding hook sets to a [`Context`]
//!
//! Each hook-set type gets its own reserved key, private to this module.
//! Binding looks up whatever hook set of the same type is visible from the
//! context, composes the new set over it and stores the merged result in a
//! child context. Looking up therefore always yields a single hook set that
//! already chains every set bound along the ancestry, newest first.
//!
//! # Example
//!
//! ```
//! use reqtrace_core::{Context, Hook, HookSet};
//! use std::sync::{Arc, Mutex};
//!
//! #[derive(HookSet, Clone, Default)]
//! struct JobTrace {
//!     done: Option<Hook<()>>,
//! }
//!
//! let log = Arc::new(Mutex::new(Vec::new()));
//! let record = |label: &'static str| {
//!     let log = Arc::clone(&log);
//!     JobTrace::default().on_done(move |_| log.lock().unwrap().push(label))
//! };
//!
//! let ctx = Context::background()
//!     .with_hooks(&record("A"))
//!     .with_hooks(&record("B"));
//!
//! if let Some(trace) = ctx.hooks::<JobTrace>() {
//!     trace.emit_done(&());
//! }
//! assert_eq!(*log.lock().unwrap(), vec!["B", "A"]);
//! ```

use std::any::type_name;
use std::marker::PhantomData;

use crate::compose::{HookSet, composed};
use crate::context::{Context, ContextKey};
use crate::error::HookError;

/// Reserved context key for hook sets of type `H`.
struct HookKey<H>(PhantomData<fn() -> H>);

impl<H: HookSet> ContextKey for HookKey<H> {
    type Value = H;
}

impl Context {
    /// Returns a child context carrying `hooks` composed over any hook set of
    /// the same type already visible from `self`.
    ///
    /// `hooks` is cloned before composition, so the caller's value keeps its
    /// own callbacks. Callbacks in `hooks` run before the ones bound earlier.
    #[must_use]
    pub fn with_hooks<H: HookSet>(&self, hooks: &H) -> Self {
        let merged = composed(hooks, self.hooks::<H>());
        tracing::trace!(
            hook_set = type_name::<H>(),
            depth = self.depth() + 1,
            slots = ?merged.set_slots(),
            "bound hook set"
        );
        self.with_value::<HookKey<H>>(merged)
    }

    /// Like [`with_hooks`](Self::with_hooks), but takes an optional hook set.
    ///
    /// # Panics
    ///
    /// Panics if `hooks` is `None`. Binding nothing is a contract violation:
    /// callers rely on a successful bind meaning their hooks are live.
    #[must_use]
    #[track_caller]
    #[allow(clippy::panic)] // Documented precondition, mirrors a null-argument check
    pub fn with_optional_hooks<H: HookSet>(&self, hooks: Option<&H>) -> Self {
        match hooks {
            Some(hooks) => self.with_hooks(hooks),
            None => panic!("nil hook set: cannot bind a missing {}", type_name::<H>()),
        }
    }

    /// Like [`with_optional_hooks`](Self::with_optional_hooks), but reports a
    /// missing hook set as an error instead of panicking.
    ///
    /// # Errors
    ///
    /// Returns [`HookError::MissingHookSet`] if `hooks` is `None`.
    pub fn try_with_hooks<H: HookSet>(&self, hooks: Option<&H>) -> Result<Self, HookError> {
        let hooks = hooks.ok_or(HookError::MissingHookSet { hook_set: type_name::<H>() })?;
        Ok(self.with_hooks(hooks))
    }

    /// Returns the hook set of type `H` visible from this context, if any was
    /// ever bound along its chain.
    #[must_use]
    pub fn hooks<H: HookSet>(&self) -> Option<&H> {
        self.value::<HookKey<H>>()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::compose::Hook;
    use std::sync::{Arc, Mutex};

    #[derive(crate::HookSet, Clone, Default)]
    struct Probe {
        hit: Option<Hook<u8>>,
        miss: Option<Hook<u8>>,
    }

    fn labelled(log: &Arc<Mutex<Vec<&'static str>>>, label: &'static str) -> Probe {
        let log = Arc::clone(log);
        Probe::default().on_hit(move |_| log.lock().unwrap().push(label))
    }

    #[test]
    fn test_lookup_absent_on_background() {
        assert!(Context::background().hooks::<Probe>().is_none());
    }

    #[test]
    fn test_bound_empty_set_is_present() {
        let ctx = Context::background().with_hooks(&Probe::default());
        let probe = ctx.hooks::<Probe>().unwrap();
        assert!(probe.is_empty());
    }

    #[test]
    fn test_bind_composes_newest_first() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let ctx = Context::background()
            .with_hooks(&labelled(&log, "A"))
            .with_hooks(&labelled(&log, "B"));

        ctx.hooks::<Probe>().unwrap().emit_hit(&0);
        assert_eq!(*log.lock().unwrap(), vec!["B", "A"]);
    }

    #[test]
    fn test_bind_leaves_parent_unchanged() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let parent = Context::background().with_hooks(&labelled(&log, "A"));
        let _child = parent.with_hooks(&labelled(&log, "B"));

        parent.hooks::<Probe>().unwrap().emit_hit(&0);
        assert_eq!(*log.lock().unwrap(), vec!["A"]);
    }

    #[test]
    fn test_try_with_hooks_rejects_none() {
        let err = Context::background().try_with_hooks::<Probe>(None).unwrap_err();
        assert!(matches!(err, HookError::MissingHookSet { .. }));
        assert!(err.to_string().contains("Probe"));
    }

    #[test]
    #[should_panic(expected = "nil hook set")]
    fn test_with_optional_hooks_panics_on_none() {
        let _ = Context::background().with_optional_hooks::<Probe>(None);
    }

    #[test]
    fn test_with_optional_hooks_binds_some() {
        let ctx = Context::background().with_optional_hooks(Some(&Probe::default()));
        assert!(ctx.hooks::<Probe>().is_some());
    }
}
