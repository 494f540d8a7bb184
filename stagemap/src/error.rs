use thiserror::Error;

/// Configuration errors raised eagerly at attach/registration time.
///
/// Soft misses (an unregistered collation key, an ancestor without an
/// attribute component) never surface here; they yield empty results so a
/// single mis-keyed action cannot abort a collection walk.
#[derive(Debug, Error)]
pub enum MapError {
    #[error("component '{0}' not found in schema")]
    ComponentNotFound(String),

    #[error("component '{0}' is not registered to the mapper schema")]
    ForeignComponent(String),

    #[error("duplicate component name '{0}' in schema")]
    DuplicateComponent(String),

    #[error("composer view '{0}' could not be built")]
    ViewUnavailable(String),
}
