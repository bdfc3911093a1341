//! Mapping stack values back to identifier names
//!
//! A successful compilation reports which identifiers resolved to which bytes
//! (keys, constants, other scripts). [`StackItemIdentifier`] indexes those
//! bindings by value so the stack pane can print `owner.public_key` instead of
//! 33 bytes of hex.
//!
//! # Collisions
//!
//! Two identifiers may resolve to the same bytes. The winner is picked by
//! [`BindingScope`] precedence, most specific first:
//!
//! ```text
//! entity > script > global
//! ```
//!
//! Within one scope the lexicographically smallest identifier wins. The result
//! does not depend on the order bindings were reported in.
//!
//! # Retention
//!
//! [`IdentifierSlot`] keeps the last identifier built from a successful
//! compilation. An update carrying no identifier (every compilation failed)
//! leaves the previous one in place.

use crate::vm::StackItem;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Where an identifier was declared
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BindingScope {
    /// Template-wide variable
    Global,
    /// Another script referenced by the compiled one
    Script,
    /// Variable owned by an entity (e.g. a signer's key)
    Entity(String),
}

impl BindingScope {
    /// Higher wins
    fn precedence(&self) -> u8 {
        match self {
            BindingScope::Global => 0,
            BindingScope::Script => 1,
            BindingScope::Entity(_) => 2,
        }
    }
}

/// An identifier and the bytes it compiled to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Binding {
    pub identifier: String,
    pub scope: BindingScope,
    pub value: StackItem,
}

impl Binding {
    pub fn new(
        identifier: impl Into<String>,
        scope: BindingScope,
        value: impl Into<StackItem>,
    ) -> Self {
        Binding {
            identifier: identifier.into(),
            scope,
            value: value.into(),
        }
    }
}

/// Exact-match lookup from stack value to identifier name
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StackItemIdentifier {
    by_value: FxHashMap<Vec<u8>, (u8, String)>,
}

impl StackItemIdentifier {
    pub fn new<'a>(bindings: impl IntoIterator<Item = &'a Binding>) -> Self {
        let mut by_value: FxHashMap<Vec<u8>, (u8, String)> = FxHashMap::default();

        for binding in bindings {
            let candidate = (binding.scope.precedence(), binding.identifier.as_str());
            match by_value.get_mut(binding.value.as_bytes()) {
                Some(current) => {
                    if outranks(candidate, (current.0, current.1.as_str())) {
                        *current = (candidate.0, candidate.1.to_string());
                    }
                }
                None => {
                    by_value.insert(
                        binding.value.as_bytes().to_vec(),
                        (candidate.0, candidate.1.to_string()),
                    );
                }
            }
        }

        StackItemIdentifier { by_value }
    }

    /// Name bound to exactly these bytes, if any
    pub fn identify(&self, value: &[u8]) -> Option<&str> {
        self.by_value.get(value).map(|(_, name)| name.as_str())
    }

    pub fn identify_item(&self, item: &StackItem) -> Option<&str> {
        self.identify(item.as_bytes())
    }

    pub fn len(&self) -> usize {
        self.by_value.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_value.is_empty()
    }
}

fn outranks(candidate: (u8, &str), current: (u8, &str)) -> bool {
    candidate.0 > current.0 || (candidate.0 == current.0 && candidate.1 < current.1)
}

/// Holder for the last identifier built from a successful compilation
#[derive(Debug, Clone, Default)]
pub struct IdentifierSlot {
    current: Option<Arc<StackItemIdentifier>>,
}

impl IdentifierSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install `next`, or keep the previous identifier when `next` is `None`.
    ///
    /// Returns whether the slot changed. Readers holding the previous `Arc`
    /// keep a complete, valid identifier either way.
    pub fn update(&mut self, next: Option<StackItemIdentifier>) -> bool {
        match next {
            Some(identifier) => {
                self.current = Some(Arc::new(identifier));
                true
            }
            None => {
                tracing::debug!(
                    retained = self.current.is_some(),
                    "no successful compilation, keeping previous stack item identifier"
                );
                false
            }
        }
    }

    pub fn get(&self) -> Option<Arc<StackItemIdentifier>> {
        self.current.clone()
    }

    pub fn identify(&self, value: &[u8]) -> Option<&str> {
        self.current.as_deref().and_then(|identifier| identifier.identify(value))
    }
}
