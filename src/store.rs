use crate::helpers::sanitize_title;
use crate::models::{Item, ItemId, ItemQuery};

/// Persistence boundary the slug guard calls into.
///
/// Every method takes `&self`: hosts usually re-run their own uniqueness step
/// (and with it [`crate::SlugGuard::unique_slug`]) from inside `persist`, so
/// implementations must tolerate being re-entered.
pub trait ContentStore {
    /// Returns the first item matching the query. Implementations should
    /// return the lowest id so lookups are reproducible.
    fn find_item(&self, query: &ItemQuery) -> crate::Result<Option<Item>>;

    /// Loads an item by id.
    fn get_item(&self, id: ItemId) -> crate::Result<Option<Item>>;

    /// Commits slug and status changes of an existing item.
    fn persist(&self, item: &Item) -> crate::Result<()>;

    /// Reads a metadata value.
    fn get_metadata(&self, id: ItemId, key: &str) -> crate::Result<Option<String>>;

    /// Writes a metadata value. With `write_once` an existing value is kept.
    fn set_metadata(
        &self,
        id: ItemId,
        key: &str,
        value: &str,
        write_once: bool,
    ) -> crate::Result<()>;

    /// Removes a metadata value. Absent keys are not an error.
    fn delete_metadata(&self, id: ItemId, key: &str) -> crate::Result<()>;

    /// Host slug derivation for titles and raw slugs.
    fn normalize_title_to_slug(&self, title: &str) -> String {
        sanitize_title(title)
    }
}
