//! Conflict resolution between a newly saved item and a trashed one.

use crate::config::ScopeContext;
use crate::helpers::is_supplied;
use crate::models::SlugRequest;
use crate::scope::find_trashed_occupant;
use crate::store::ContentStore;
use crate::validator::ValidatorSet;
use tracing::{debug, info, warn};

/// Version of the slug guard.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Service object wiring the collaborators together for one request scope.
#[derive(Debug)]
pub struct SlugGuard<'a, S: ContentStore> {
    pub(crate) store: &'a S,
    pub(crate) context: &'a ScopeContext,
    pub(crate) validators: &'a ValidatorSet,
}

impl<'a, S: ContentStore> SlugGuard<'a, S> {
    pub fn new(store: &'a S, context: &'a ScopeContext, validators: &'a ValidatorSet) -> Self {
        Self {
            store,
            context,
            validators,
        }
    }

    /// Metadata key under which displaced items keep their original slug.
    pub fn meta_key(&self) -> &'a str {
        self.context.meta_key()
    }

    /// Host filter, called right after the host's own uniqueness step.
    ///
    /// Returns the slug the host should actually store. When the slug the
    /// item wanted is only blocked by a trashed item, the trashed item is
    /// moved to `final_slug` and the wanted slug is returned instead.
    pub fn unique_slug(&self, request: &SlugRequest) -> crate::Result<String> {
        let final_slug = request.final_slug.as_str();

        let desired = if is_supplied(request.desired_slug.as_deref()) {
            request.desired_slug.clone().unwrap_or_default()
        } else {
            match self.derive_desired_slug(request)? {
                Some(derived) => derived,
                None => return Ok(request.final_slug.clone()),
            }
        };

        if desired == final_slug {
            return Ok(request.final_slug.clone());
        }

        let occupant = find_trashed_occupant(
            self.store,
            self.context,
            self.validators,
            &desired,
            request.item_id,
            &request.content_type,
            request.parent,
        )?;

        let Some(mut trashed) = occupant else {
            debug!(
                item = %request.item_id,
                desired = %desired,
                final_slug,
                "desired slug held by a live item"
            );
            return Ok(request.final_slug.clone());
        };

        let trashed_id = trashed.id;
        trashed.slug = request.final_slug.clone();
        if let Err(err) = self.store.persist(&trashed) {
            warn!(item = %trashed_id, error = %err, "could not move trashed item off its slug");
            return Err(err);
        }

        self.store
            .set_metadata(trashed_id, self.meta_key(), &desired, true)?;

        info!(
            item = %request.item_id,
            trashed = %trashed_id,
            slug = %desired,
            displaced_to = final_slug,
            "reclaimed slug from trashed item"
        );
        Ok(desired)
    }

    /// Recovers the desired slug for hosts that do not pass it. `None` means
    /// the slug was not changed (or the item is unknown) and nothing is to do.
    fn derive_desired_slug(&self, request: &SlugRequest) -> crate::Result<Option<String>> {
        let Some(item) = self.store.get_item(request.item_id)? else {
            return Ok(None);
        };

        let source = if item.slug.is_empty() {
            &item.title
        } else {
            &item.slug
        };
        let derived = self.store.normalize_title_to_slug(source);

        if derived.is_empty() || derived == request.final_slug {
            return Ok(None);
        }
        Ok(Some(derived))
    }
}
