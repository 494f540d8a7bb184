use crate::action::{ActionMeta, Collation, Group};
use crate::row::Row;

/// Descriptor for one level of a domain hierarchy. Tags are declared as
/// consts next to the type and listed base-to-derived in its lineage; the
/// mapper walks that list instead of introspecting anything at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TypeTag(&'static str);

impl TypeTag {
    pub const fn new(name: &'static str) -> Self {
        TypeTag(name)
    }

    pub fn name(&self) -> &'static str {
        self.0
    }
}

impl std::fmt::Display for TypeTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.0)
    }
}

/// A domain object the mapper can collect from. Implementations delegate
/// `collate` and `actions` to a `Lazy` static [`ActionRegistry`] built for
/// the concrete type.
///
/// [`ActionRegistry`]: crate::action::ActionRegistry
pub trait Domain {
    /// Ancestor chain, most-base first, the type's own tag last. Never empty.
    fn lineage(&self) -> &'static [TypeTag];

    /// Runtime type of the instance.
    fn type_tag(&self) -> TypeTag {
        *self.lineage().last().expect("lineage must not be empty")
    }

    /// Canonical attribute data, in storage order. Each ancestor's attribute
    /// component restricts this row to its own columns at staging time.
    fn attributes(&self) -> Row;

    /// Nested domain objects collected into the same session.
    fn components(&self) -> Vec<&dyn Domain> {
        Vec::new()
    }

    /// Connective data tying a collation row back to its owning attribute
    /// row; merged under the action's own output.
    fn collation_attributes(&self, _key: &str, _group: Group) -> Row {
        Row::new()
    }

    /// Dispatches an action through the type's registry. `group` opts in to
    /// wildcard resolution; without it, unregistered keys miss softly.
    fn collate(&self, key: &str, group: Option<&str>) -> Collation;

    /// The type's registry structure, handlers erased.
    fn actions(&self) -> &ActionMeta;
}
