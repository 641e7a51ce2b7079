//! Immutable request context chain
//!
//! A [`Context`] is a linked list of key/value nodes threaded through nested
//! calls. Deriving a child never touches the parent, so a context can be
//! cloned and shared across threads freely.
//!
//! Keys are types: each [`ContextKey`] implementor names exactly one slot and
//! fixes the type of value stored under it. A key type kept private to a
//! module cannot be read or overwritten from anywhere else.
//!
//! # Example
//!
//! ```
//! use reqtrace_core::context::{Context, ContextKey};
//!
//! struct RequestId;
//!
//! impl ContextKey for RequestId {
//!     type Value = u64;
//! }
//!
//! let root = Context::background();
//! let child = root.with_value::<RequestId>(42);
//!
//! assert_eq!(child.value::<RequestId>(), Some(&42));
//! assert_eq!(root.value::<RequestId>(), None);
//! ```

use std::any::{Any, TypeId, type_name};
use std::fmt;
use std::sync::Arc;

/// A type-distinct key for values stored in a [`Context`].
pub trait ContextKey: 'static {
    /// The type of value stored under this key
    type Value: Send + Sync + 'static;
}

struct Node {
    parent: Option<Arc<Node>>,
    key: TypeId,
    key_name: &'static str,
    value: Box<dyn Any + Send + Sync>,
}

/// An immutable, parent-linked key/value chain.
///
/// Cloning is a reference-count bump.
#[derive(Clone, Default)]
pub struct Context {
    head: Option<Arc<Node>>,
}

impl Context {
    /// The empty root context.
    #[must_use]
    pub const fn background() -> Self {
        Self { head: None }
    }

    /// Returns a child context mapping `K` to `value`.
    ///
    /// The child shadows any value already stored under `K` further up the
    /// chain; `self` is unchanged.
    #[must_use]
    pub fn with_value<K: ContextKey>(&self, value: K::Value) -> Self {
        Self {
            head: Some(Arc::new(Node {
                parent: self.head.clone(),
                key: TypeId::of::<K>(),
                key_name: type_name::<K>(),
                value: Box::new(value),
            })),
        }
    }

    /// Returns the value nearest to this context stored under `K`.
    #[must_use]
    pub fn value<K: ContextKey>(&self) -> Option<&K::Value> {
        let key = TypeId::of::<K>();
        self.nodes()
            .find(|node| node.key == key)
            .and_then(|node| node.value.downcast_ref::<K::Value>())
    }

    /// Number of values stored along the chain, shadowed ones included.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.nodes().count()
    }

    fn nodes(&self) -> impl Iterator<Item = &Node> {
        std::iter::successors(self.head.as_deref(), |node| node.parent.as_deref())
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.nodes().map(|node| node.key_name))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Tenant;
    impl ContextKey for Tenant {
        type Value = String;
    }

    struct Region;
    impl ContextKey for Region {
        type Value = String;
    }

    #[test]
    fn test_background_is_empty() {
        let ctx = Context::background();
        assert_eq!(ctx.depth(), 0);
        assert!(ctx.value::<Tenant>().is_none());
    }

    #[test]
    fn test_child_does_not_mutate_parent() {
        let parent = Context::background().with_value::<Tenant>("acme".to_string());
        let child = parent.with_value::<Tenant>("globex".to_string());

        assert_eq!(parent.value::<Tenant>().map(String::as_str), Some("acme"));
        assert_eq!(child.value::<Tenant>().map(String::as_str), Some("globex"));
        assert_eq!(parent.depth(), 1);
        assert_eq!(child.depth(), 2);
    }

    #[test]
    fn test_keys_with_same_value_type_do_not_collide() {
        let ctx = Context::background()
            .with_value::<Tenant>("acme".to_string())
            .with_value::<Region>("eu-west".to_string());

        assert_eq!(ctx.value::<Tenant>().map(String::as_str), Some("acme"));
        assert_eq!(ctx.value::<Region>().map(String::as_str), Some("eu-west"));
    }

    #[test]
    fn test_siblings_are_independent() {
        let root = Context::background().with_value::<Tenant>("root".to_string());
        let left = root.with_value::<Region>("left".to_string());
        let right = root.with_value::<Region>("right".to_string());

        assert_eq!(left.value::<Region>().map(String::as_str), Some("left"));
        assert_eq!(right.value::<Region>().map(String::as_str), Some("right"));
        assert_eq!(left.value::<Tenant>(), right.value::<Tenant>());
    }

    #[test]
    fn test_debug_lists_keys_nearest_first() {
        let ctx = Context::background()
            .with_value::<Tenant>("acme".to_string())
            .with_value::<Region>("eu".to_string());
        let rendered = format!("{ctx:?}");

        let region = rendered.find("Region").unwrap_or(usize::MAX);
        let tenant = rendered.find("Tenant").unwrap_or(usize::MAX);
        assert!(region < tenant, "{rendered}");
    }
}
