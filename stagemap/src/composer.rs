use crate::component::Compose;
use crate::error::MapError;
use crate::schema::Schema;
use std::collections::HashMap;

/// Catalog of named composite views beyond those natural to a hierarchy walk
/// (chained joins a query layer wants to reference by name). Views are built
/// once, at registration, against the schema they draw from.
pub struct Composer<C: Compose> {
    views: HashMap<String, C::View>,
}

impl<C: Compose> Composer<C> {
    pub fn new() -> Self {
        Composer { views: HashMap::new() }
    }

    /// Builds and stores a view under the given name. The builder returns
    /// `None` when a component it needs is missing from the schema, which
    /// surfaces here as a configuration error.
    pub fn register<F>(
        &mut self,
        name: impl Into<String>,
        schema: &Schema<C>,
        build: F,
    ) -> Result<(), MapError>
    where
        F: FnOnce(&Schema<C>) -> Option<C::View>,
    {
        let name = name.into();
        match build(schema) {
            Some(view) => {
                self.views.insert(name, view);
                Ok(())
            }
            None => Err(MapError::ViewUnavailable(name)),
        }
    }

    pub fn view(&self, name: &str) -> Option<&C::View> {
        self.views.get(name)
    }
}

impl<C: Compose> Default for Composer<C> {
    fn default() -> Self {
        Self::new()
    }
}
