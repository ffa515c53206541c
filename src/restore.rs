//! Reclaims a displaced item's original slug when it leaves the trash.

use crate::models::{Item, ItemStatus, SlugRequest};
use crate::resolver::SlugGuard;
use crate::scope::slug_is_free;
use crate::store::ContentStore;
use tracing::{debug, info};

/// What happened when an item's status changed.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum Reclamation {
    /// The transition was not trash -> live.
    NotApplicable,
    /// The item was never displaced.
    NoAnnotation,
    /// The item already carries its original slug.
    AlreadyOriginal,
    /// The original slug was free (or only held by a trashed item, which was
    /// moved aside) and has been put back.
    Restored(String),
    /// Something live holds the original slug; the item keeps its current one.
    Unreclaimable { original: String, kept: String },
}

impl<S: ContentStore> SlugGuard<'_, S> {
    /// Host event hook, called on every status transition.
    pub fn on_status_transition(
        &self,
        new_status: &ItemStatus,
        old_status: &ItemStatus,
        item: &Item,
    ) -> crate::Result<()> {
        self.reconcile(new_status, old_status, item).map(|_| ())
    }

    /// Same as [`Self::on_status_transition`] but reports the outcome.
    pub fn reconcile(
        &self,
        new_status: &ItemStatus,
        old_status: &ItemStatus,
        item: &Item,
    ) -> crate::Result<Reclamation> {
        if !old_status.is_trashed() || new_status.is_trashed() {
            return Ok(Reclamation::NotApplicable);
        }

        let key = self.meta_key();
        let original = match self.store.get_metadata(item.id, key)? {
            Some(original) if !original.is_empty() => original,
            _ => return Ok(Reclamation::NoAnnotation),
        };

        // The item is live again; the record goes whatever happens next.
        self.store.delete_metadata(item.id, key)?;

        if original == item.slug {
            return Ok(Reclamation::AlreadyOriginal);
        }

        let request = SlugRequest {
            final_slug: item.slug.clone(),
            item_id: item.id,
            status: new_status.clone(),
            content_type: item.content_type.clone(),
            parent: item.parent,
            desired_slug: Some(original.clone()),
        };
        let resolved = self.unique_slug(&request)?;

        // Nothing trashed was in the way; the slug may simply be unclaimed.
        let reclaimable = resolved == original
            || slug_is_free(
                self.store,
                self.context,
                self.validators,
                &original,
                item.id,
                &item.content_type,
                item.parent,
            )?;

        if !reclaimable {
            debug!(
                item = %item.id,
                original = %original,
                kept = %item.slug,
                "original slug is taken"
            );
            return Ok(Reclamation::Unreclaimable {
                original,
                kept: item.slug.clone(),
            });
        }

        let mut restored = item.clone();
        restored.slug = original.clone();
        self.store.persist(&restored)?;

        info!(item = %item.id, slug = %original, "restored original slug");
        Ok(Reclamation::Restored(original))
    }
}
