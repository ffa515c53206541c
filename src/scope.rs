//! Scope lookup: which trashed item, if any, sits on a slug an item wants.

use crate::config::ScopeContext;
use crate::models::{Item, ItemId, ItemQuery, ItemStatus, Scope, TypeFilter};
use crate::store::ContentStore;
use crate::validator::{ValidationInput, ValidatorSet};
use tracing::debug;

impl ScopeContext {
    /// Builds the query for items that compete with `slug` in the scope of
    /// `content_type`. A `None` status matches every status.
    pub fn occupancy_query(
        &self,
        slug: &str,
        status: Option<ItemStatus>,
        content_type: &str,
        parent: Option<ItemId>,
        exclude: ItemId,
    ) -> ItemQuery {
        let (types, parent) = match self.classify(content_type) {
            Scope::Attachment => (TypeFilter::Any, None),
            Scope::Hierarchical => (TypeFilter::OneOf(self.hierarchical_types()), Some(parent)),
            Scope::Flat => (TypeFilter::Exactly(content_type.to_string()), None),
        };
        ItemQuery {
            slug: slug.to_string(),
            status,
            types,
            parent,
            exclude,
        }
    }

    /// Attachments of any status that hold `slug`. Attachment slugs are
    /// unique across every content type, so these compete in all scopes.
    pub fn attachment_query(&self, slug: &str, exclude: ItemId) -> ItemQuery {
        ItemQuery {
            slug: slug.to_string(),
            status: None,
            types: TypeFilter::Exactly(self.rules().attachment_type.clone()),
            parent: None,
            exclude,
        }
    }

    /// Reserved slugs and validator rejections, i.e. slugs the host's own
    /// uniqueness step never lets an item keep.
    pub fn is_unusable(
        &self,
        validators: &ValidatorSet,
        slug: &str,
        content_type: &str,
        parent: Option<ItemId>,
    ) -> bool {
        let scope = self.classify(content_type);
        let input = ValidationInput {
            scope,
            content_type,
            parent,
        };
        self.is_reserved(scope, slug) || validators.is_invalid(slug, &input)
    }
}

/// Finds the trashed item holding `slug` in the same scope as the item being
/// saved, skipping slugs that could never have been validly assigned.
pub fn find_trashed_occupant<S: ContentStore>(
    store: &S,
    ctx: &ScopeContext,
    validators: &ValidatorSet,
    slug: &str,
    exclude: ItemId,
    content_type: &str,
    parent: Option<ItemId>,
) -> crate::Result<Option<Item>> {
    let scope = ctx.classify(content_type);

    if scope == Scope::Hierarchical && ctx.is_ignored(content_type) {
        return Ok(None);
    }

    if ctx.is_unusable(validators, slug, content_type, parent) {
        debug!(slug, %scope, "slug is reserved or rejected; not searching trash");
        return Ok(None);
    }

    let query = ctx.occupancy_query(slug, Some(ItemStatus::Trashed), content_type, parent, exclude);
    store.find_item(&query)
}

/// True when an item of any status holds `slug` in the scope of
/// `content_type`, or an attachment holds it anywhere.
pub fn slug_is_held<S: ContentStore>(
    store: &S,
    ctx: &ScopeContext,
    slug: &str,
    exclude: ItemId,
    content_type: &str,
    parent: Option<ItemId>,
) -> crate::Result<bool> {
    let query = ctx.occupancy_query(slug, None, content_type, parent, exclude);
    if store.find_item(&query)?.is_some() {
        return Ok(true);
    }
    if ctx.classify(content_type) == Scope::Attachment {
        return Ok(false);
    }
    Ok(store.find_item(&ctx.attachment_query(slug, exclude))?.is_some())
}

/// True when nothing holds `slug` (see [`slug_is_held`]) and the slug is one
/// the host would accept.
pub fn slug_is_free<S: ContentStore>(
    store: &S,
    ctx: &ScopeContext,
    validators: &ValidatorSet,
    slug: &str,
    exclude: ItemId,
    content_type: &str,
    parent: Option<ItemId>,
) -> crate::Result<bool> {
    if ctx.is_unusable(validators, slug, content_type, parent) {
        return Ok(false);
    }
    Ok(!slug_is_held(store, ctx, slug, exclude, content_type, parent)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SlugRules;
    use crate::memory::MemoryStore;

    fn ctx() -> ScopeContext {
        let rules = SlugRules {
            hierarchical_types: vec!["page".into(), "nav_menu_item".into()],
            ..SlugRules::default()
        };
        ScopeContext::new(rules).unwrap()
    }

    fn trashed(store: &MemoryStore, content_type: &str, slug: &str) -> Item {
        let item = store.insert(Item::new(0, content_type, slug)).unwrap();
        store.trash(item.id).unwrap().unwrap()
    }

    #[test]
    fn hierarchical_query_pins_parent_and_types() {
        let query = ctx().occupancy_query("about", None, "page", Some(ItemId(4)), ItemId(9));
        assert_eq!(
            query.types,
            TypeFilter::OneOf(vec!["nav_menu_item".into(), "page".into()])
        );
        assert_eq!(query.parent, Some(Some(ItemId(4))));
    }

    #[test]
    fn attachment_query_spans_all_types() {
        let query = ctx().occupancy_query("about", None, "attachment", Some(ItemId(4)), ItemId(9));
        assert_eq!(query.types, TypeFilter::Any);
        assert_eq!(query.parent, None);
    }

    #[test]
    fn finds_trashed_flat_item_of_same_type_only() {
        let store = MemoryStore::new(ctx(), ValidatorSet::new());
        let post = trashed(&store, "post", "hello");
        trashed(&store, "product", "hello");

        let found = find_trashed_occupant(
            &store,
            store.context(),
            store.validators(),
            "hello",
            ItemId(999),
            "post",
            None,
        )
        .unwrap();
        assert_eq!(found.map(|item| item.id), Some(post.id));
    }

    #[test]
    fn ignores_live_items() {
        let store = MemoryStore::new(ctx(), ValidatorSet::new());
        store.insert(Item::new(0, "post", "hello")).unwrap();

        let found = find_trashed_occupant(
            &store,
            store.context(),
            store.validators(),
            "hello",
            ItemId(999),
            "post",
            None,
        )
        .unwrap();
        assert!(found.is_none());
    }

    #[test]
    fn skips_reserved_and_ignored_slugs() {
        let store = MemoryStore::new(ctx(), ValidatorSet::new());
        trashed(&store, "post", "feed");
        trashed(&store, "nav_menu_item", "home");

        let lookup = |slug: &str, content_type: &str| {
            find_trashed_occupant(
                &store,
                store.context(),
                store.validators(),
                slug,
                ItemId(999),
                content_type,
                None,
            )
            .unwrap()
        };
        assert!(lookup("feed", "post").is_none());
        assert!(lookup("home", "nav_menu_item").is_none());
    }

    #[test]
    fn free_slug_check_sees_every_status() {
        let store = MemoryStore::new(ctx(), ValidatorSet::new());
        trashed(&store, "post", "taken");
        let free = |slug: &str| {
            slug_is_free(
                &store,
                store.context(),
                store.validators(),
                slug,
                ItemId(999),
                "post",
                None,
            )
            .unwrap()
        };
        assert!(!free("taken"));
        assert!(free("open"));
        assert!(!free("rss"));
    }

    #[test]
    fn skips_slugs_flagged_by_validators() {
        let validators = ValidatorSet::new().with(
            Scope::Flat,
            |slug: &str, _: &ValidationInput<'_>| slug == "blocked",
        );
        let store = MemoryStore::new(ctx(), validators);
        trashed(&store, "post", "blocked");

        let found = find_trashed_occupant(
            &store,
            store.context(),
            store.validators(),
            "blocked",
            ItemId(999),
            "post",
            None,
        )
        .unwrap();
        assert!(found.is_none());
    }

    #[test]
    fn pagination_slugs_are_never_searched_for_pages() {
        let store = MemoryStore::new(ctx(), ValidatorSet::new());
        store.import(Item::new(20, "page", "page2").with_status(ItemStatus::Trashed));
        store.import(Item::new(21, "page", "42").with_status(ItemStatus::Trashed));
        store.import(Item::new(22, "post", "page2").with_status(ItemStatus::Trashed));

        let lookup = |slug: &str, content_type: &str| {
            find_trashed_occupant(
                &store,
                store.context(),
                store.validators(),
                slug,
                ItemId(999),
                content_type,
                None,
            )
            .unwrap()
            .map(|item| item.id)
        };
        assert_eq!(lookup("page2", "page"), None);
        assert_eq!(lookup("42", "page"), None);
        // The pattern only guards hierarchical scope.
        assert_eq!(lookup("page2", "post"), Some(ItemId(22)));
    }

    #[test]
    fn validators_apply_to_attachment_and_hierarchical_scopes() {
        let validators = ValidatorSet::new()
            .with(Scope::Attachment, |slug: &str, _: &ValidationInput<'_>| {
                slug == "logo"
            })
            .with(Scope::Hierarchical, |slug: &str, input: &ValidationInput<'_>| {
                slug == "contact" && input.parent.is_none()
            });
        let store = MemoryStore::new(ctx(), validators);
        store.import(Item::new(30, "post", "logo").with_status(ItemStatus::Trashed));
        store.import(Item::new(31, "page", "contact").with_status(ItemStatus::Trashed));

        let lookup = |slug: &str, content_type: &str| {
            find_trashed_occupant(
                &store,
                store.context(),
                store.validators(),
                slug,
                ItemId(999),
                content_type,
                None,
            )
            .unwrap()
            .map(|item| item.id)
        };
        assert_eq!(lookup("logo", "attachment"), None);
        assert_eq!(lookup("logo", "post"), Some(ItemId(30)));
        assert_eq!(lookup("contact", "page"), None);
        assert_eq!(lookup("contact", "post"), None);
    }

    #[test]
    fn attachments_hold_slugs_in_every_scope() {
        let store = MemoryStore::new(ctx(), ValidatorSet::new());
        store.import(Item::new(40, "attachment", "logo"));

        let held = |content_type: &str| {
            slug_is_held(&store, store.context(), "logo", ItemId(999), content_type, None)
                .unwrap()
        };
        assert!(held("page"));
        assert!(held("post"));
        assert!(held("attachment"));
        assert!(!slug_is_held(&store, store.context(), "logo", ItemId(40), "page", None).unwrap());
    }
}
