//! stagemap maps domain-type hierarchies onto named storage targets: an
//! action registry tags what a type can emit, a [`Mapper`] walks the ancestor
//! chain to stage insert-ready rows into a session [`Collector`], and the
//! same walk run the other way composes one joined read target over the same
//! components.
//!
//! Storage execution is out of scope by design: the collector's flushed
//! batches are handed to whatever engine owns persistence, and composed
//! [`View`]s are join descriptions, never queries in flight.

pub mod action;
pub mod collector;
pub mod component;
pub mod composer;
pub mod domain;
pub mod error;
pub mod logger;
pub mod mapper;
pub mod relation;
pub mod row;
pub mod schema;

pub use action::{ActionKey, ActionMeta, ActionRegistry, Collation, Group, NamedFn, RegistryBuilder, WildcardFn};
pub use collector::{Collector, Inserts, Receipt};
pub use component::{Component, Compose, Joinable};
pub use composer::Composer;
pub use domain::{Domain, TypeTag};
pub use error::MapError;
pub use mapper::{CompRef, ComposableMapper, Mapper, OnFn};
pub use relation::{Dictionary, JoinOn, Relation, View};
pub use row::{merged, restricted, Row};
pub use schema::Schema;

pub use once_cell;
pub use once_cell::sync::Lazy;
pub use serde_json;
pub use serde_json::Value;
pub use std::sync::Arc;
