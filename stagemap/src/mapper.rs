//! Binds a schema to a domain-type hierarchy and drives the two walks over
//! it: `collect` stages session-scoped writes, `compose` builds one joined
//! read target. Attachment errors are raised eagerly here so schema/type
//! mismatches surface at startup, never mid-session.

use crate::action::{Collation, Group};
use crate::collector::{Collector, Receipt};
use crate::component::{Component, Compose, Joinable};
use crate::domain::{Domain, TypeTag};
use crate::error::MapError;
use crate::row;
use crate::schema::Schema;
use std::collections::HashMap;
use std::ops::{Deref, DerefMut};
use std::sync::Arc;

/// Component argument to [`Mapper::attach`]: by schema name or by handle.
pub enum CompRef<C> {
    Name(String),
    Instance(Arc<C>),
}

impl<C> From<&str> for CompRef<C> {
    fn from(name: &str) -> Self {
        CompRef::Name(name.to_string())
    }
}

impl<C> From<String> for CompRef<C> {
    fn from(name: String) -> Self {
        CompRef::Name(name)
    }
}

impl<C> From<Arc<C>> for CompRef<C> {
    fn from(component: Arc<C>) -> Self {
        CompRef::Instance(component)
    }
}

impl<C> From<&Arc<C>> for CompRef<C> {
    fn from(component: &Arc<C>) -> Self {
        CompRef::Instance(component.clone())
    }
}

/// Maps type tags to storage components within one schema and collects
/// insert-ready data from attached domain instances into its collector.
///
/// Attachment is deliberately open to unrelated hierarchies: a collected
/// instance recurses into nested components that are usually not part of its
/// own ancestor chain, so all of them need a home in the same mapper.
pub struct Mapper<C: Component> {
    schema: Schema<C>,
    collector: Collector<C>,
    attribute_comps: HashMap<TypeTag, Arc<C>>,
    collation_groups: HashMap<TypeTag, HashMap<Group, Arc<C>>>,
}

impl<C: Component> Mapper<C> {
    pub fn new(schema: Schema<C>) -> Self {
        Mapper {
            schema,
            collector: Collector::new(),
            attribute_comps: HashMap::new(),
            collation_groups: HashMap::new(),
        }
    }

    pub fn schema(&self) -> &Schema<C> {
        &self.schema
    }

    pub fn collector(&self) -> &Collector<C> {
        &self.collector
    }

    pub fn collector_mut(&mut self) -> &mut Collector<C> {
        &mut self.collector
    }

    fn resolve(&self, comp: CompRef<C>) -> Result<Arc<C>, MapError> {
        match comp {
            CompRef::Name(name) => {
                self.schema.get(&name).ok_or(MapError::ComponentNotFound(name))
            }
            CompRef::Instance(component) => {
                if self.schema.contains(&component) {
                    Ok(component)
                } else {
                    Err(MapError::ForeignComponent(component.name().to_string()))
                }
            }
        }
    }

    /// Maps a type to its attribute component and, optionally, to collation
    /// components: `coll` lands under the reserved default group, the pairs
    /// in `coll_groups` under their own groups (merging into any existing
    /// per-type group map, last write per group wins). Every argument is
    /// resolved against the bound schema before anything is recorded.
    pub fn attach(
        &mut self,
        tag: TypeTag,
        attr: impl Into<CompRef<C>>,
        coll: Option<CompRef<C>>,
        coll_groups: Option<Vec<(Group, CompRef<C>)>>,
    ) -> Result<(), MapError> {
        let attr = self.resolve(attr.into())?;

        let mut resolved: Vec<(Group, Arc<C>)> = Vec::new();
        if let Some(coll) = coll {
            resolved.push((Group::Default, self.resolve(coll)?));
        }
        for (group, comp) in coll_groups.unwrap_or_default() {
            resolved.push((group, self.resolve(comp)?));
        }

        if self.attribute_comps.insert(tag, attr).is_some() {
            crate::warn!("re-attaching {tag}: previous attribute mapping replaced");
        }
        let groups = self.collation_groups.entry(tag).or_default();
        for (group, comp) in resolved {
            groups.insert(group, comp);
        }
        Ok(())
    }

    /// Maps a single (type, group) pair to a collation component without
    /// touching the type's attribute mapping. Collation attachment is
    /// independent of attribute attachment: a purely virtual ancestor can
    /// hold real collation targets.
    pub fn attach_collation(
        &mut self,
        tag: TypeTag,
        group: Group,
        comp: impl Into<CompRef<C>>,
    ) -> Result<(), MapError> {
        let comp = self.resolve(comp.into())?;
        self.collation_groups.entry(tag).or_default().insert(group, comp);
        Ok(())
    }

    /// Attaches a whole set of types by naming convention: the attribute
    /// component name derives from the tag, and one collation target is
    /// derived per group present in the type's registry.
    pub fn attach_many<A, G>(
        &mut self,
        types: &[(TypeTag, &crate::action::ActionMeta)],
        attr_name: A,
        coll_name: G,
    ) -> Result<(), MapError>
    where
        A: Fn(TypeTag) -> String,
        G: Fn(TypeTag, Group) -> String,
    {
        for (tag, meta) in types {
            let attr = attr_name(*tag);
            let coll_groups: Vec<(Group, CompRef<C>)> = meta
                .groups()
                .map(|group| (group, CompRef::Name(coll_name(*tag, group))))
                .collect();
            let group_count = coll_groups.len();
            self.attach(*tag, attr.as_str(), None, Some(coll_groups))?;
            crate::info!("attached {tag} to '{attr}' with {group_count} collation target(s)");
        }
        Ok(())
    }

    pub fn attribute_component(&self, tag: TypeTag) -> Option<&Arc<C>> {
        self.attribute_comps.get(&tag)
    }

    pub fn collation_component(&self, tag: TypeTag, group: Group) -> Option<&Arc<C>> {
        self.collation_groups.get(&tag).and_then(|groups| groups.get(&group))
    }

    /// Stages inserts for an instance up its ancestor chain and down through
    /// its nested components, returning every receipt minted so the caller
    /// can later withdraw exactly this session's inserts.
    ///
    /// Per ancestor (base to derived): the attribute row first, then one
    /// collation row per fired key and registered (group, component) pair —
    /// connective data under the action's output, action output winning
    /// collisions. Each requested key fires at most once per instance; the
    /// same action output is reused for every ancestor's collation insert, so
    /// one collection stages one consistent sample even from a
    /// nondeterministic handler. An ancestor without an attribute component skips the
    /// attribute insert but is still considered for collation inserts; a key
    /// the instance does not support fires nothing. With an empty key list
    /// this is attribute-only collection.
    pub fn collect(&mut self, obj: &dyn Domain, keys: &[&str]) -> Vec<Receipt> {
        let mut receipts = Vec::new();
        self.collect_into(obj, keys, &mut receipts);
        receipts
    }

    fn collect_into(&mut self, obj: &dyn Domain, keys: &[&str], receipts: &mut Vec<Receipt>) {
        // fire each requested action once; wildcard handlers stay out of
        // collection walks since no group context is supplied here
        let mut fired: Vec<(&str, row::Row, &[Group])> = Vec::new();
        for &key in keys {
            let data = match obj.collate(key, None) {
                Collation::Data(data) => data,
                Collation::Empty => continue,
                miss => {
                    crate::debug!("collect: skipping key '{key}' on {}: {miss:?}", obj.type_tag());
                    continue;
                }
            };
            let Some(groups) = obj.actions().groups_of(key) else { continue };
            fired.push((key, data, groups));
        }

        let attributes = obj.attributes();
        for tag in obj.lineage() {
            if let Some(component) = self.attribute_comps.get(tag).cloned() {
                self.collector.add_insert(&component, attributes.clone(), Some(receipts));
            }

            for (key, data, groups) in &fired {
                for group in *groups {
                    let Some(component) = self
                        .collation_groups
                        .get(tag)
                        .and_then(|groups| groups.get(group))
                        .cloned()
                    else {
                        continue;
                    };
                    let connective = obj.collation_attributes(key, *group);
                    let merged = row::merged(connective, data.clone());
                    self.collector.add_insert(&component, merged, Some(receipts));
                }
            }
        }

        for child in obj.components() {
            self.collect_into(child, keys, receipts);
        }
    }
}

/// Join-condition function: given the two components being composed, produce
/// the condition joining them.
pub type OnFn<C> = Box<dyn Fn(&C, &C) -> <C as Compose>::On + Send + Sync>;

/// A [`Mapper`] that can also build read targets. The two condition
/// functions are fixed at construction and reused for every composition:
/// `attr_on` joins consecutive ancestors' attribute components (vertical),
/// `coll_on` joins an attribute component to one of its collation components
/// (horizontal).
pub struct ComposableMapper<C: Compose> {
    mapper: Mapper<C>,
    attr_on: OnFn<C>,
    coll_on: OnFn<C>,
}

impl<C: Compose> ComposableMapper<C> {
    pub fn new<FA, FC>(schema: Schema<C>, attr_on: FA, coll_on: FC) -> Self
    where
        FA: Fn(&C, &C) -> C::On + Send + Sync + 'static,
        FC: Fn(&C, &C) -> C::On + Send + Sync + 'static,
    {
        ComposableMapper {
            mapper: Mapper::new(schema),
            attr_on: Box::new(attr_on),
            coll_on: Box::new(coll_on),
        }
    }

    /// Builds the joined read target for a hierarchy: per ancestor holding an
    /// attribute component, the requested groups' collation components are
    /// folded in horizontally (outer — collation rows are optional), then the
    /// per-ancestor aggregate folds into the running view vertically (inner).
    /// Purely structural; nothing executes. `None` when no ancestor in the
    /// lineage holds an attribute component.
    pub fn compose(&self, lineage: &[TypeTag], groups: &[Group]) -> Option<C::View> {
        let mut aggregate: Option<(Arc<C>, C::View)> = None;

        for tag in lineage {
            let Some(attr) = self.mapper.attribute_component(*tag) else { continue };

            let mut level: C::View = attr.clone().into();
            for group in groups {
                if let Some(coll) = self.mapper.collation_component(*tag, *group) {
                    let on = (self.coll_on)(attr, coll);
                    level = level.compose(coll.clone().into(), on, true);
                }
            }

            aggregate = Some(match aggregate {
                None => (attr.clone(), level),
                Some((previous, view)) => {
                    let on = (self.attr_on)(&previous, attr);
                    (attr.clone(), view.compose(level, on, false))
                }
            });
        }

        aggregate.map(|(_, view)| view)
    }

    /// Composes for an instance's runtime type.
    pub fn compose_instance(&self, obj: &dyn Domain, groups: &[Group]) -> Option<C::View> {
        self.compose(obj.lineage(), groups)
    }
}

impl<C: Compose> Deref for ComposableMapper<C> {
    type Target = Mapper<C>;

    fn deref(&self) -> &Mapper<C> {
        &self.mapper
    }
}

impl<C: Compose> DerefMut for ComposableMapper<C> {
    fn deref_mut(&mut self) -> &mut Mapper<C> {
        &mut self.mapper
    }
}
