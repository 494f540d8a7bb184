use crate::component::{Component, Compose, Joinable};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Table-like component: a name plus ordered column names. The heavy lifting
/// (constraints, storage layout, execution) belongs to whatever backend the
/// flushed inserts are handed to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relation {
    name: String,
    columns: Vec<String>,
}

impl Relation {
    pub fn new(name: impl Into<String>, columns: &[&str]) -> Self {
        Relation {
            name: name.into(),
            columns: columns.iter().map(|c| c.to_string()).collect(),
        }
    }
}

impl Component for Relation {
    fn name(&self) -> &str {
        &self.name
    }

    fn attributes(&self) -> &[String] {
        &self.columns
    }
}

/// Equality join condition between one column on each side. The core does not
/// verify the columns exist on the joined shapes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JoinOn {
    pub left: String,
    pub right: String,
}

impl JoinOn {
    pub fn columns(left: impl Into<String>, right: impl Into<String>) -> Self {
        JoinOn { left: left.into(), right: right.into() }
    }

    /// Same column name on both sides.
    pub fn natural(column: impl Into<String>) -> Self {
        let column = column.into();
        JoinOn { left: column.clone(), right: column }
    }
}

/// Derived relation: either a base table or a binary join of two views.
/// Purely structural; building one never touches storage.
#[derive(Debug, Clone)]
pub enum View {
    Table(Arc<Relation>),
    Join {
        left: Box<View>,
        right: Box<View>,
        on: JoinOn,
        outer: bool,
    },
}

impl View {
    /// Number of joins in the tree; a hierarchy of N attribute components
    /// composes to exactly N-1 vertical joins before any group is folded in.
    pub fn join_count(&self) -> usize {
        match self {
            View::Table(_) => 0,
            View::Join { left, right, .. } => 1 + left.join_count() + right.join_count(),
        }
    }

    /// Base relations in left-to-right order.
    pub fn relations(&self) -> Vec<Arc<Relation>> {
        match self {
            View::Table(relation) => vec![relation.clone()],
            View::Join { left, right, .. } => {
                let mut out = left.relations();
                out.extend(right.relations());
                out
            }
        }
    }

    /// Column names of every base relation, left to right, duplicates kept.
    pub fn columns(&self) -> Vec<String> {
        self.relations()
            .iter()
            .flat_map(|r| r.attributes().iter().cloned())
            .collect()
    }
}

impl From<Arc<Relation>> for View {
    fn from(relation: Arc<Relation>) -> Self {
        View::Table(relation)
    }
}

impl Joinable for View {
    type On = JoinOn;

    fn compose(self, other: Self, on: JoinOn, outer: bool) -> Self {
        View::Join {
            left: Box::new(self),
            right: Box::new(other),
            on,
            outer,
        }
    }
}

impl Compose for Relation {
    type On = JoinOn;
    type View = View;
}

/// Key-value component for non-relational targets. Collectable like any other
/// component, but it does not implement [`Compose`] and so cannot take part
/// in read composition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dictionary {
    name: String,
    keys: Vec<String>,
}

impl Dictionary {
    pub fn new(name: impl Into<String>, keys: &[&str]) -> Self {
        Dictionary {
            name: name.into(),
            keys: keys.iter().map(|k| k.to_string()).collect(),
        }
    }
}

impl Component for Dictionary {
    fn name(&self) -> &str {
        &self.name
    }

    fn attributes(&self) -> &[String] {
        &self.keys
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rel(name: &str, columns: &[&str]) -> Arc<Relation> {
        Arc::new(Relation::new(name, columns))
    }

    #[test]
    fn left_fold_counts_joins() {
        let a = rel("a", &["id"]);
        let b = rel("b", &["id"]);
        let c = rel("c", &["id"]);

        let view = View::from(a)
            .compose(View::from(b), JoinOn::natural("id"), false)
            .compose(View::from(c), JoinOn::natural("id"), true);

        assert_eq!(view.join_count(), 2);
        let names: Vec<String> = view.relations().iter().map(|r| r.name().to_string()).collect();
        assert_eq!(names, ["a", "b", "c"]);
    }

    #[test]
    fn nesting_shape_differs_but_leaves_agree() {
        let a = rel("a", &["id"]);
        let b = rel("b", &["id"]);
        let c = rel("c", &["id"]);

        let left_assoc = View::from(a.clone())
            .compose(View::from(b.clone()), JoinOn::natural("id"), false)
            .compose(View::from(c.clone()), JoinOn::natural("id"), false);
        let right_assoc = View::from(a).compose(
            View::from(b).compose(View::from(c), JoinOn::natural("id"), false),
            JoinOn::natural("id"),
            false,
        );

        assert_eq!(left_assoc.join_count(), right_assoc.join_count());
        let l: Vec<String> = left_assoc.relations().iter().map(|r| r.name().to_string()).collect();
        let r: Vec<String> = right_assoc.relations().iter().map(|r| r.name().to_string()).collect();
        assert_eq!(l, r);
    }
}
