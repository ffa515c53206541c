//! In-memory reference host.
//!
//! Mirrors the save path of a typical CMS: every save derives the wanted
//! slug, runs the host's own uniqueness step across all statuses, hands the
//! result to [`SlugGuard::unique_slug`], stores the item and finally fires
//! [`SlugGuard::on_status_transition`]. Single-threaded by construction.

use crate::config::ScopeContext;
use crate::errors::CoreError;
use crate::helpers::{sanitize_title, suffixed_slug};
use crate::models::{Item, ItemId, ItemQuery, ItemStatus, SlugRequest};
use crate::resolver::SlugGuard;
use crate::scope::slug_is_held;
use crate::store::ContentStore;
use crate::validator::ValidatorSet;
use chrono::{DateTime, Utc};
use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, BTreeSet};
use tracing::trace;

/// Metadata key remembering the status an item had before it was trashed.
pub const TRASH_STATUS_META_KEY: &str = "_trash_meta_status";

#[derive(Debug)]
pub struct MemoryStore {
    context: ScopeContext,
    validators: ValidatorSet,
    items: RefCell<BTreeMap<ItemId, Item>>,
    metadata: RefCell<BTreeMap<(ItemId, String), String>>,
    next_id: Cell<u64>,
    failing: RefCell<BTreeSet<ItemId>>,
    failing_metadata: RefCell<BTreeSet<ItemId>>,
}

impl MemoryStore {
    pub fn new(context: ScopeContext, validators: ValidatorSet) -> Self {
        Self {
            context,
            validators,
            items: RefCell::new(BTreeMap::new()),
            metadata: RefCell::new(BTreeMap::new()),
            next_id: Cell::new(1),
            failing: RefCell::new(BTreeSet::new()),
            failing_metadata: RefCell::new(BTreeSet::new()),
        }
    }

    pub fn context(&self) -> &ScopeContext {
        &self.context
    }

    pub fn validators(&self) -> &ValidatorSet {
        &self.validators
    }

    pub fn guard(&self) -> SlugGuard<'_, Self> {
        SlugGuard::new(self, &self.context, &self.validators)
    }

    pub fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    /// Creates an item. An id of `0` asks the store to allocate one.
    pub fn insert(&self, mut item: Item) -> crate::Result<Item> {
        if item.id.0 == 0 {
            item.id = ItemId(self.next_id.get());
        }
        if self.items.borrow().contains_key(&item.id) {
            return Err(CoreError::persistence(item.id, "an item with this id already exists"));
        }
        self.next_id.set(self.next_id.get().max(item.id.0 + 1));
        self.save(item, ItemStatus::New)
    }

    /// Saves changes to an existing item. Unknown ids yield `None`.
    pub fn update(&self, item: Item) -> crate::Result<Option<Item>> {
        let Some(old_status) = self.item(item.id).map(|stored| stored.status) else {
            return Ok(None);
        };
        self.save(item, old_status).map(Some)
    }

    /// Moves an item to the trash, remembering its live status.
    pub fn trash(&self, id: ItemId) -> crate::Result<Option<Item>> {
        let Some(mut item) = self.item(id) else {
            return Ok(None);
        };
        if item.status.is_trashed() {
            return Ok(Some(item));
        }
        self.set_metadata(id, TRASH_STATUS_META_KEY, item.status.as_str(), false)?;
        item.status = ItemStatus::Trashed;
        self.update(item)
    }

    /// Takes an item out of the trash, back to the status it had before.
    pub fn untrash(&self, id: ItemId) -> crate::Result<Option<Item>> {
        let Some(mut item) = self.item(id) else {
            return Ok(None);
        };
        if !item.status.is_trashed() {
            return Ok(Some(item));
        }
        let previous = self
            .get_metadata(id, TRASH_STATUS_META_KEY)?
            .map(|status| ItemStatus::from(status.as_str()))
            .unwrap_or(ItemStatus::Draft);
        self.delete_metadata(id, TRASH_STATUS_META_KEY)?;
        item.status = previous;
        self.update(item)
    }

    pub fn item(&self, id: ItemId) -> Option<Item> {
        self.items.borrow().get(&id).cloned()
    }

    pub fn items(&self) -> Vec<Item> {
        self.items.borrow().values().cloned().collect()
    }

    pub fn metadata(&self, id: ItemId, key: &str) -> Option<String> {
        self.metadata.borrow().get(&(id, key.to_string())).cloned()
    }

    /// Stores an item verbatim, bypassing uniqueness and status hooks.
    pub fn import(&self, item: Item) {
        self.next_id.set(self.next_id.get().max(item.id.0 + 1));
        self.items.borrow_mut().insert(item.id, item);
    }

    /// Makes every later `persist` of `id` fail.
    pub fn fail_persist_for(&self, id: ItemId) {
        self.failing.borrow_mut().insert(id);
    }

    /// Makes every later metadata write or delete on `id` fail.
    pub fn fail_metadata_for(&self, id: ItemId) {
        self.failing_metadata.borrow_mut().insert(id);
    }

    fn check_metadata_write(&self, id: ItemId, key: &str) -> crate::Result<()> {
        if self.failing_metadata.borrow().contains(&id) {
            return Err(CoreError::metadata(id, key, "store rejected the write"));
        }
        Ok(())
    }

    fn save(&self, mut item: Item, old_status: ItemStatus) -> crate::Result<Item> {
        let source = if item.slug.is_empty() {
            item.title.as_str()
        } else {
            item.slug.as_str()
        };
        let mut desired = self.normalize_title_to_slug(source);
        if desired.is_empty() {
            desired = item.id.to_string();
        }

        let final_slug = self.host_unique_slug(&desired, &item)?;
        let request = SlugRequest::new(final_slug, &item).with_desired(desired);
        item.slug = self.guard().unique_slug(&request)?;
        item.modified_at = Some(self.now());

        trace!(item = %item.id, slug = %item.slug, status = %item.status, "saving item");
        let id = item.id;
        self.items.borrow_mut().insert(id, item.clone());

        self.guard()
            .on_status_transition(&item.status, &old_status, &item)?;

        self.item(id)
            .ok_or_else(|| CoreError::persistence(id, "item vanished during save"))
    }

    /// The host's own disambiguation: competitors of any status count,
    /// attachments count in every scope, and reserved slugs are always
    /// suffixed.
    fn host_unique_slug(&self, slug: &str, item: &Item) -> crate::Result<String> {
        let taken = |candidate: &str| -> crate::Result<bool> {
            if self
                .context
                .is_unusable(&self.validators, candidate, &item.content_type, item.parent)
            {
                return Ok(true);
            }
            slug_is_held(
                self,
                &self.context,
                candidate,
                item.id,
                &item.content_type,
                item.parent,
            )
        };

        if !taken(slug)? {
            return Ok(slug.to_string());
        }
        let mut suffix = 2;
        loop {
            let candidate = suffixed_slug(slug, suffix);
            if !taken(&candidate)? {
                return Ok(candidate);
            }
            suffix += 1;
        }
    }
}

impl ContentStore for MemoryStore {
    fn find_item(&self, query: &ItemQuery) -> crate::Result<Option<Item>> {
        Ok(self
            .items
            .borrow()
            .values()
            .find(|item| query.matches(item))
            .cloned())
    }

    fn get_item(&self, id: ItemId) -> crate::Result<Option<Item>> {
        Ok(self.item(id))
    }

    fn persist(&self, item: &Item) -> crate::Result<()> {
        if self.failing.borrow().contains(&item.id) {
            return Err(CoreError::persistence(item.id, "store rejected the write"));
        }
        match self.update(item.clone())? {
            Some(_) => Ok(()),
            None => Err(CoreError::persistence(item.id, "no such item")),
        }
    }

    fn get_metadata(&self, id: ItemId, key: &str) -> crate::Result<Option<String>> {
        Ok(self.metadata(id, key))
    }

    fn set_metadata(
        &self,
        id: ItemId,
        key: &str,
        value: &str,
        write_once: bool,
    ) -> crate::Result<()> {
        self.check_metadata_write(id, key)?;
        let mut metadata = self.metadata.borrow_mut();
        let entry = (id, key.to_string());
        if write_once && metadata.contains_key(&entry) {
            return Ok(());
        }
        metadata.insert(entry, value.to_string());
        Ok(())
    }

    fn delete_metadata(&self, id: ItemId, key: &str) -> crate::Result<()> {
        self.check_metadata_write(id, key)?;
        self.metadata.borrow_mut().remove(&(id, key.to_string()));
        Ok(())
    }

    fn normalize_title_to_slug(&self, title: &str) -> String {
        sanitize_title(title)
    }
}
