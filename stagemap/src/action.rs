//! Action registry: which methods on a domain type emit storable data, under
//! which keys, and into which groups.
//!
//! Registries are declarative tables built once at program initialization
//! (typically inside a `once_cell::sync::Lazy`) and immutable afterwards.
//! "Inheritance" is structural: a base type exposes a
//! `declare<D: AsRef<Base>>(builder) -> builder` function contributing its
//! block, and a derived type's registry chains the base block before its own
//! declarations, so later declarations override earlier ones exactly as a
//! derived class would override an inherited key.

use crate::row::Row;
use std::collections::HashMap;

/// Named bucket of actions sharing a storage target. `Default` is the
/// reserved group a key lands in when declared with no groups at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Group {
    Default,
    Named(&'static str),
}

impl Group {
    pub fn name(&self) -> &'static str {
        match self {
            Group::Default => "default",
            Group::Named(name) => name,
        }
    }
}

impl std::fmt::Display for Group {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Group-index entry: an explicitly keyed action, or the marker for the
/// group's wildcard handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionKey {
    Named(&'static str),
    Wildcard,
}

/// Handler for an explicitly keyed action.
pub type NamedFn<D> = fn(&D) -> Option<Row>;

/// Handler for a wildcard (implicit) action; receives the key it was invoked
/// under so it can disambiguate.
pub type WildcardFn<D> = fn(&D, &str) -> Option<Row>;

enum Decl<D> {
    Named { key: &'static str, groups: Vec<Group>, handler: NamedFn<D> },
    Wildcard { group: &'static str, handler: WildcardFn<D> },
}

/// Ordered declaration list; `build` folds it into an immutable registry with
/// override semantics (later declaration sharing a key or wildcard group wins
/// wholesale).
pub struct RegistryBuilder<D> {
    decls: Vec<Decl<D>>,
}

impl<D> RegistryBuilder<D> {
    pub fn new() -> Self {
        RegistryBuilder { decls: Vec::new() }
    }

    /// Declares an explicitly keyed action. An empty group list puts the key
    /// in the reserved default group.
    pub fn named(mut self, key: &'static str, groups: &[&'static str], handler: NamedFn<D>) -> Self {
        let groups = if groups.is_empty() {
            vec![Group::Default]
        } else {
            groups.iter().map(|g| Group::Named(g)).collect()
        };
        self.decls.push(Decl::Named { key, groups, handler });
        self
    }

    /// Declares a wildcard action: under the given group, any key resolves to
    /// this handler — but only when a caller names the group explicitly.
    pub fn wildcard(mut self, group: &'static str, handler: WildcardFn<D>) -> Self {
        self.decls.push(Decl::Wildcard { group, handler });
        self
    }

    pub fn build(self) -> ActionRegistry<D> {
        let mut named: HashMap<&'static str, NamedAction<D>> = HashMap::new();
        let mut named_order: Vec<&'static str> = Vec::new();
        let mut wildcards: HashMap<&'static str, WildcardFn<D>> = HashMap::new();
        let mut wildcard_order: Vec<&'static str> = Vec::new();

        for decl in self.decls {
            match decl {
                Decl::Named { key, groups, handler } => {
                    if named.insert(key, NamedAction { handler, groups }).is_none() {
                        named_order.push(key);
                    }
                }
                Decl::Wildcard { group, handler } => {
                    if wildcards.insert(group, handler).is_none() {
                        wildcard_order.push(group);
                    }
                }
            }
        }

        // The group index is derived from the surviving declarations, so a
        // key overridden with a different group set leaves no stale entries
        // behind and both registries stay in bidirectional agreement.
        let mut keys = HashMap::new();
        let mut groups: HashMap<Group, Vec<ActionKey>> = HashMap::new();
        for &key in &named_order {
            let action = &named[key];
            keys.insert(key, action.groups.clone());
            for group in &action.groups {
                groups.entry(*group).or_default().push(ActionKey::Named(key));
            }
        }
        for &group in &wildcard_order {
            groups.entry(Group::Named(group)).or_default().push(ActionKey::Wildcard);
        }

        ActionRegistry {
            named,
            wildcards,
            meta: ActionMeta { keys, wildcard_groups: wildcard_order, groups },
        }
    }
}

impl<D> Default for RegistryBuilder<D> {
    fn default() -> Self {
        Self::new()
    }
}

struct NamedAction<D> {
    handler: NamedFn<D>,
    groups: Vec<Group>,
}

/// Outcome of a collation dispatch. Misses are data, not errors; callers
/// decide whether silence is acceptable.
#[derive(Debug, Clone, PartialEq)]
pub enum Collation {
    /// The action ran and produced data.
    Data(Row),
    /// The action ran and had nothing to store.
    Empty,
    /// Key not registered and no group context was given; wildcard handlers
    /// are deliberately not consulted here.
    UnknownKey,
    /// A group was named but carries no wildcard handler.
    NoWildcard,
}

impl Collation {
    pub fn data(self) -> Option<Row> {
        match self {
            Collation::Data(row) => Some(row),
            _ => None,
        }
    }

    pub fn is_miss(&self) -> bool {
        matches!(self, Collation::UnknownKey | Collation::NoWildcard)
    }
}

/// Key/group structure of a registry with the handlers erased; this is what
/// the mapper reads when routing action output to collation components.
pub struct ActionMeta {
    keys: HashMap<&'static str, Vec<Group>>,
    wildcard_groups: Vec<&'static str>,
    groups: HashMap<Group, Vec<ActionKey>>,
}

impl ActionMeta {
    pub fn contains_key(&self, key: &str) -> bool {
        self.keys.contains_key(key)
    }

    /// Groups recorded for an explicit key; `None` for unregistered keys
    /// (wildcard-only keys have no fixed group list).
    pub fn groups_of(&self, key: &str) -> Option<&[Group]> {
        self.keys.get(key).map(|groups| groups.as_slice())
    }

    /// Every group present in the registry, named and default alike.
    pub fn groups(&self) -> impl Iterator<Item = Group> + '_ {
        self.groups.keys().copied()
    }

    /// Keys registered under a group, the wildcard marker included.
    pub fn keys_in(&self, group: Group) -> &[ActionKey] {
        self.groups.get(&group).map(|keys| keys.as_slice()).unwrap_or(&[])
    }

    pub fn has_wildcard(&self, group: &str) -> bool {
        self.wildcard_groups.iter().any(|g| *g == group)
    }
}

/// Immutable per-type action registry; dispatch rules:
///
/// - a registered key invokes its handler, any supplied group is ignored
///   (explicit registrations are group-agnostic at call time);
/// - an unregistered key with a named group falls back to that group's
///   wildcard handler, which receives the key;
/// - an unregistered key without a group is a soft miss, even when a wildcard
///   exists somewhere — wildcard resolution is opt-in by the caller.
pub struct ActionRegistry<D> {
    named: HashMap<&'static str, NamedAction<D>>,
    wildcards: HashMap<&'static str, WildcardFn<D>>,
    meta: ActionMeta,
}

impl<D> ActionRegistry<D> {
    pub fn collate(&self, obj: &D, key: &str, group: Option<&str>) -> Collation {
        if let Some(action) = self.named.get(key) {
            return match (action.handler)(obj) {
                Some(row) => Collation::Data(row),
                None => Collation::Empty,
            };
        }
        let Some(group) = group else {
            crate::debug!("collation for '{key}' not supported, or implicit group not specified");
            return Collation::UnknownKey;
        };
        let Some(handler) = self.wildcards.get(group) else {
            crate::debug!("collation key '{key}' not registered and group '{group}' not implicit");
            return Collation::NoWildcard;
        };
        match handler(obj, key) {
            Some(row) => Collation::Data(row),
            None => Collation::Empty,
        }
    }

    pub fn meta(&self) -> &ActionMeta {
        &self.meta
    }
}
