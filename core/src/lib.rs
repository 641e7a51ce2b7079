//! # reqtrace core
//!
//! Composable lifecycle hooks carried on an immutable request context.
//!
//! An application that wants to observe a request builds a hook set with
//! only the callbacks it cares about and binds it to the request's
//! [`Context`]. Several observers can bind independently: each bind
//! composes the new set over the one already visible, so the pipeline that
//! eventually looks the set up sees every registered callback.
//!
//! ## Core Concepts
//!
//! - **Hook Set**: A struct of optional callbacks, one slot per event ([`HookSet`])
//! - **Composition**: Per slot, newer callback first, then older ([`compose_slot`])
//! - **Context**: Immutable, parent-linked key/value chain ([`Context`])
//! - **Binding**: Compose and store under a key private to each hook-set type
//!   ([`Context::with_hooks`], [`Context::hooks`])
//!
//! ## Example
//!
//! ```
//! use reqtrace_core::Context;
//! use reqtrace_core::server::{HandlerDoneInfo, ServerTrace, server_trace, with_server_trace};
//! use std::sync::{Arc, Mutex};
//!
//! let log = Arc::new(Mutex::new(Vec::new()));
//! let observer = |label: &'static str| {
//!     let log = Arc::clone(&log);
//!     ServerTrace::default().on_handler_done(move |_| log.lock().unwrap().push(label))
//! };
//!
//! let ctx = with_server_trace(&Context::background(), &observer("A"));
//! let ctx = with_server_trace(&ctx, &observer("B"));
//!
//! // Inside the pipeline, once the handler returns:
//! if let Some(trace) = server_trace(&ctx) {
//!     trace.emit_handler_done(&HandlerDoneInfo::default());
//! }
//!
//! assert_eq!(*log.lock().unwrap(), vec!["B", "A"]);
//! ```

// Generated hook-set impls name this crate by its external path.
extern crate self as reqtrace_core;

/// Hook-set trait and slot composition
pub mod compose;

/// Immutable request context chain
pub mod context;

/// Binding hook sets to a context
pub mod binding;

/// Server response hooks
pub mod server;

/// Client request hooks
pub mod client;

/// Logging observers
pub mod logging;

/// Logging observer configuration
pub mod config;

/// Error types
pub mod error;

pub use compose::{Hook, HookSet, SlotState, compose_slot, composed, hook};
pub use context::{Context, ContextKey};
pub use error::{ConfigError, HookError};
pub use reqtrace_macros::HookSet;

/// Shapes `#[derive(HookSet)]` rejects at compile time.
///
/// Enums carry no slots:
///
/// ```compile_fail
/// use reqtrace_core::{Hook, HookSet};
///
/// #[derive(HookSet, Clone)]
/// enum Phase {
///     Start(Option<Hook<()>>),
/// }
/// ```
///
/// Nor do unions:
///
/// ```compile_fail
/// use reqtrace_core::HookSet;
///
/// #[derive(HookSet, Clone, Copy)]
/// union Raw {
///     bits: u32,
/// }
/// ```
///
/// Tuple structs have no slot names:
///
/// ```compile_fail
/// use reqtrace_core::{Hook, HookSet};
///
/// #[derive(HookSet, Clone)]
/// struct Unnamed(Option<Hook<()>>);
/// ```
///
/// A struct without any `Option<Hook<_>>` field:
///
/// ```compile_fail
/// use reqtrace_core::HookSet;
///
/// #[derive(HookSet, Clone)]
/// struct NoSlots {
///     retries: u32,
/// }
/// ```
///
/// A hook set that cannot be shared across threads is not a `HookSet`:
///
/// ```compile_fail
/// use reqtrace_core::{Context, Hook, HookSet};
/// use std::rc::Rc;
///
/// #[derive(HookSet, Clone)]
/// struct Local {
///     done: Option<Hook<()>>,
///     owner: Rc<str>,
/// }
///
/// let local = Local { done: None, owner: Rc::from("main") };
/// let _ = Context::background().with_hooks(&local);
/// ```
///
/// The accepted form, for contrast. Type parameters need no bounds:
///
/// ```
/// use reqtrace_core::{Context, Hook, HookSet};
///
/// #[derive(HookSet, Clone)]
/// struct Seen<T> {
///     seen: Option<Hook<T>>,
/// }
///
/// let ctx = Context::background().with_hooks(&Seen::<u8> { seen: None });
/// assert!(ctx.hooks::<Seen<u8>>().is_some());
/// ```
#[cfg(doctest)]
pub struct RejectedHookSets;
