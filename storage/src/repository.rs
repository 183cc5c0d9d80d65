use async_trait::async_trait;

use crate::error::Result;

/// Read-modify-write step for [`Repository::update`]. Receives the stored entity, if any, and
/// returns the entity to store; `None` leaves the store untouched.
pub type Update<T> = Box<dyn FnOnce(Option<T>) -> Option<T> + Send>;

/// Keyed entity store. `JsonRepository` is the file-backed implementation; callers only see this trait.
#[async_trait]
pub trait Repository<T>: Send + Sync
where
    T: Send + Sync + 'static,
{
    async fn get(&self, id: &str) -> Result<Option<T>>;
    /// Inserts or overwrites the entity stored under `id` and returns it.
    async fn save(&self, id: &str, entity: T) -> Result<T>;
    /// Returns true if an entity was removed.
    async fn delete(&self, id: &str) -> Result<bool>;
    async fn list(&self) -> Result<Vec<T>>;
    /// Applies `f` to the entity under `id` and stores its result, as one step with respect to
    /// every other operation on this store. Returns what was stored, or `None` if `f` declined.
    async fn update(&self, id: &str, f: Update<T>) -> Result<Option<T>>;
}
