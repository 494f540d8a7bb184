use crate::component::Component;
use crate::error::MapError;
use std::collections::HashMap;
use std::sync::Arc;

/// Named collection of storage components, usually the shape of one whole
/// database. Names are unique within a schema, and membership here is the
/// authority [`Mapper::attach`](crate::mapper::Mapper::attach) consults when
/// validating component arguments.
pub struct Schema<C> {
    components: HashMap<String, Arc<C>>,
    order: Vec<String>,
}

impl<C: Component> Schema<C> {
    pub fn new() -> Self {
        Schema { components: HashMap::new(), order: Vec::new() }
    }

    /// Registers a component under its name, handing back the shared handle.
    /// Components are never removed once added; their lifetime is the
    /// schema's.
    pub fn add(&mut self, component: C) -> Result<Arc<C>, MapError> {
        let name = component.name().to_string();
        if self.components.contains_key(&name) {
            return Err(MapError::DuplicateComponent(name));
        }
        let handle = Arc::new(component);
        self.components.insert(name.clone(), handle.clone());
        self.order.push(name);
        Ok(handle)
    }

    pub fn get(&self, name: &str) -> Option<Arc<C>> {
        self.components.get(name).cloned()
    }

    /// Identity-based membership: the handle must be the very component
    /// registered here, not a lookalike sharing its name.
    pub fn contains(&self, component: &Arc<C>) -> bool {
        self.components
            .get(component.name())
            .map_or(false, |held| Arc::ptr_eq(held, component))
    }

    /// Components in registration order.
    pub fn components(&self) -> impl Iterator<Item = Arc<C>> + '_ {
        self.order.iter().filter_map(|name| self.components.get(name).cloned())
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }
}

impl<C: Component> Default for Schema<C> {
    fn default() -> Self {
        Self::new()
    }
}
