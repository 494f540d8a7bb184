//! Demonstration domain: a two-level vegetable hierarchy mapped onto a
//! relational-style schema.
//!
//! ```text
//! VEGETABLE
//! |
//! TOMATO -- AGING
//!        |
//!        -- COOKING
//! ```
//!
//! Foreign keys here carry values an object can know without talking to a
//! database first, so `name` (unique) is the connective column rather than an
//! engine-assigned integer id.

use once_cell::sync::Lazy;
use rand::Rng;
use stagemap::*;

pub const VEGETABLE: TypeTag = TypeTag::new("vegetable");
pub const TOMATO: TypeTag = TypeTag::new("tomato");

pub const VEGETABLE_LINEAGE: &[TypeTag] = &[VEGETABLE];
pub const TOMATO_LINEAGE: &[TypeTag] = &[VEGETABLE, TOMATO];

pub struct Vegetable {
    pub name: String,
    pub color: String,
}

impl Vegetable {
    pub fn new(name: impl Into<String>, color: impl Into<String>) -> Self {
        Vegetable { name: name.into(), color: color.into() }
    }

    /// Base declaration block: every vegetable supports `ripe` (freshness
    /// bookkeeping) and a wildcard `cut` group that concrete vegetables are
    /// expected to override with something edible.
    pub fn declare<D: AsRef<Vegetable>>(builder: RegistryBuilder<D>) -> RegistryBuilder<D> {
        builder
            .named("ripe", &["freshness"], |d: &D| {
                let v = d.as_ref();
                Some(row! { "fresh": v.color != "brown" })
            })
            .wildcard("cut", |_: &D, _key| None)
    }
}

static VEGETABLE_ACTIONS: Lazy<ActionRegistry<Vegetable>> =
    Lazy::new(|| Vegetable::declare(RegistryBuilder::new()).build());

impl AsRef<Vegetable> for Vegetable {
    fn as_ref(&self) -> &Vegetable {
        self
    }
}

impl Domain for Vegetable {
    fn lineage(&self) -> &'static [TypeTag] {
        VEGETABLE_LINEAGE
    }

    fn attributes(&self) -> Row {
        row! { "name": self.name.clone(), "color": self.color.clone() }
    }

    fn collation_attributes(&self, key: &str, _group: Group) -> Row {
        row! { "name": self.name.clone(), "state": key }
    }

    fn collate(&self, key: &str, group: Option<&str>) -> Collation {
        VEGETABLE_ACTIONS.collate(self, key, group)
    }

    fn actions(&self) -> &ActionMeta {
        VEGETABLE_ACTIONS.meta()
    }
}

pub struct Tomato {
    pub vegetable: Vegetable,
    pub radius: u32,
}

impl Tomato {
    pub fn new(name: impl Into<String>, radius: u32) -> Self {
        Tomato { vegetable: Vegetable::new(name, "red"), radius }
    }

    pub fn ripen(&self) -> Option<Row> {
        Some(row! { "age": rand::rng().random_range(1..=6) })
    }

    pub fn rot(&self) -> Option<Row> {
        Some(row! { "age": rand::rng().random_range(4..=9) })
    }

    pub fn dice(&self) -> Option<Row> {
        Some(row! { "pieces": rand::rng().random_range(2..=12) })
    }

    pub fn cut(&self, method: &str) -> Option<Row> {
        match method {
            "slice" => Some(row! { "pieces": rand::rng().random_range(2..=5) }),
            "dice" => self.dice(),
            _ => None,
        }
    }
}

impl AsRef<Vegetable> for Tomato {
    fn as_ref(&self) -> &Vegetable {
        &self.vegetable
    }
}

/// Tomato's registry: the inherited block first, then its own declarations.
/// `ripe` overrides the base registration wholesale (the `freshness` group is
/// not re-specified, so it is dropped for tomatoes), and the `cut` wildcard
/// replaces the base placeholder.
static TOMATO_ACTIONS: Lazy<ActionRegistry<Tomato>> = Lazy::new(|| {
    Vegetable::declare(RegistryBuilder::new())
        .named("ripe", &["aging"], |t: &Tomato| t.ripen())
        .named("rotten", &["aging"], |t: &Tomato| t.rot())
        .named("diced", &["cooking"], |t: &Tomato| t.dice())
        .wildcard("cut", |t: &Tomato, method| t.cut(method))
        .build()
});

impl Domain for Tomato {
    fn lineage(&self) -> &'static [TypeTag] {
        TOMATO_LINEAGE
    }

    fn attributes(&self) -> Row {
        row! {
            "name": self.vegetable.name.clone(),
            "color": self.vegetable.color.clone(),
            "radius": self.radius,
        }
    }

    fn collation_attributes(&self, key: &str, _group: Group) -> Row {
        row! { "name": self.vegetable.name.clone(), "state": key }
    }

    fn collate(&self, key: &str, group: Option<&str>) -> Collation {
        TOMATO_ACTIONS.collate(self, key, group)
    }

    fn actions(&self) -> &ActionMeta {
        TOMATO_ACTIONS.meta()
    }
}

/// Schema backing the hierarchy: one attribute relation per type plus one
/// collation relation per (type, group), named by convention.
pub fn vegetable_schema() -> Schema<Relation> {
    let mut schema = Schema::new();
    schema.add(Relation::new("vegetable", &["name", "color"])).expect("schema");
    schema.add(Relation::new("tomato", &["name", "radius"])).expect("schema");
    schema
        .add(Relation::new("vegetable_freshness_states", &["name", "state", "fresh"]))
        .expect("schema");
    schema
        .add(Relation::new("vegetable_cut_states", &["name", "state", "pieces"]))
        .expect("schema");
    schema
        .add(Relation::new("tomato_aging_states", &["name", "state", "age"]))
        .expect("schema");
    schema
        .add(Relation::new("tomato_cooking_states", &["name", "state", "pieces"]))
        .expect("schema");
    schema
        .add(Relation::new("tomato_cut_states", &["name", "state", "pieces"]))
        .expect("schema");
    schema
}

fn attr_name(tag: TypeTag) -> String {
    tag.name().to_string()
}

fn coll_name(tag: TypeTag, group: Group) -> String {
    format!("{}_{}_states", tag.name(), group.name())
}

/// Composable mapper over [`vegetable_schema`], every type wired up through
/// the naming convention. Both join directions connect on `name`.
pub fn vegetable_mapper() -> ComposableMapper<Relation> {
    let mut mapper = ComposableMapper::new(
        vegetable_schema(),
        |_: &Relation, _: &Relation| JoinOn::natural("name"),
        |_: &Relation, _: &Relation| JoinOn::natural("name"),
    );
    mapper
        .attach_many(
            &[
                (VEGETABLE, VEGETABLE_ACTIONS.meta()),
                (TOMATO, TOMATO_ACTIONS.meta()),
            ],
            attr_name,
            coll_name,
        )
        .expect("attach vegetable hierarchy");
    mapper
}
