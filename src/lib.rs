//! Keeps trashed content from blocking the slug a new item asks for.
//! When the only thing in the way is a trashed item, that item is moved to the
//! disambiguated slug instead, and gets its original slug back on untrash if
//! it is still free.

pub mod config;
pub mod errors;
pub mod helpers;
pub mod memory;
pub mod models;
pub mod resolver;
pub mod restore;
pub mod scope;
pub mod store;
pub mod validator;

pub use config::{ScopeContext, SlugRules, DEFAULT_META_KEY};
pub use errors::{CoreError, Result};
pub use helpers::{sanitize_title, suffixed_slug};
pub use memory::{MemoryStore, TRASH_STATUS_META_KEY};
pub use models::{
    Item,
    ItemId,
    ItemQuery,
    ItemStatus,
    Scope,
    SlugRequest,
    TypeFilter,
};
pub use resolver::{SlugGuard, VERSION};
pub use restore::Reclamation;
pub use scope::{find_trashed_occupant, slug_is_free, slug_is_held};
pub use store::ContentStore;
pub use validator::{AcceptAll, SlugValidator, ValidationInput, ValidatorSet};

/// Re-export the stable API surface for hosts.
pub mod prelude {
    pub use crate::{
        config::{ScopeContext, SlugRules},
        errors::{CoreError, Result},
        models::*,
        resolver::SlugGuard,
        restore::Reclamation,
        store::ContentStore,
        validator::{SlugValidator, ValidationInput, ValidatorSet},
    };
}
