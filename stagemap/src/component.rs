use std::sync::Arc;

/// A named storage target registered in a [`Schema`](crate::schema::Schema).
///
/// The payload behind a component (a table definition, an index handle, a
/// key-value namespace) is opaque to the mapping core; all the core needs is
/// a schema-unique name and the ordered attribute list rows are restricted to
/// at staging time.
pub trait Component {
    fn name(&self) -> &str;

    /// Ordered attribute (column) names this target accepts.
    fn attributes(&self) -> &[String];
}

/// Structural pairwise join. Implementations describe the join, they never
/// execute it; associativity of a fold is the caller's concern.
pub trait Joinable: Sized {
    type On;

    fn compose(self, other: Self, on: Self::On, outer: bool) -> Self;
}

/// Components that can participate in read composition. `View` is the derived
/// join-tree form a component is lifted into before folding.
pub trait Compose: Component + Sized {
    type On;
    type View: Joinable<On = Self::On> + From<Arc<Self>> + Clone;
}
