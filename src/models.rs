use chrono::{DateTime, Utc};
use std::fmt;

/// Stable identifier of a content item. Survives status changes.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct ItemId(pub u64);

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for ItemId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

/// Publication status of an item. Only `Trashed` carries meaning for slug
/// reclamation; every other status counts as live.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub enum ItemStatus {
    /// Pseudo status reported as the previous status when an item is created.
    New,
    Draft,
    Pending,
    Private,
    Published,
    Trashed,
    Other(String),
}

impl ItemStatus {
    pub fn as_str(&self) -> &str {
        match self {
            Self::New => "new",
            Self::Draft => "draft",
            Self::Pending => "pending",
            Self::Private => "private",
            Self::Published => "publish",
            Self::Trashed => "trash",
            Self::Other(status) => status.as_str(),
        }
    }

    pub fn is_trashed(&self) -> bool {
        matches!(self, Self::Trashed)
    }
}

impl From<&str> for ItemStatus {
    fn from(value: &str) -> Self {
        match value {
            "new" => Self::New,
            "draft" => Self::Draft,
            "pending" => Self::Pending,
            "private" => Self::Private,
            "publish" | "published" => Self::Published,
            "trash" | "trashed" => Self::Trashed,
            other => Self::Other(other.to_string()),
        }
    }
}

impl fmt::Display for ItemStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A content record as seen by the slug guard.
#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    pub id: ItemId,
    pub slug: String,
    pub title: String,
    pub status: ItemStatus,
    pub content_type: String,
    /// Only meaningful for hierarchical content types. `None` is top level.
    pub parent: Option<ItemId>,
    pub modified_at: Option<DateTime<Utc>>,
}

impl Item {
    pub fn new(id: u64, content_type: impl Into<String>, slug: impl Into<String>) -> Self {
        Self {
            id: ItemId(id),
            slug: slug.into(),
            title: String::new(),
            status: ItemStatus::Published,
            content_type: content_type.into(),
            parent: None,
            modified_at: None,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_parent(mut self, parent: ItemId) -> Self {
        self.parent = Some(parent);
        self
    }

    pub fn with_status(mut self, status: ItemStatus) -> Self {
        self.status = status;
        self
    }
}

/// Uniqueness namespace an item's slug competes in.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum Scope {
    /// Unique across every content type.
    Attachment,
    /// Unique across all hierarchical types, among siblings of the same parent.
    Hierarchical,
    /// Unique within a single content type.
    Flat,
}

impl Scope {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Attachment => "attachment",
            Self::Hierarchical => "hierarchical",
            Self::Flat => "flat",
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Inputs the host hands over right after computing a unique slug.
#[derive(Debug, Clone)]
pub struct SlugRequest {
    /// The slug the host's uniqueness algorithm settled on.
    pub final_slug: String,
    pub item_id: ItemId,
    pub status: ItemStatus,
    pub content_type: String,
    pub parent: Option<ItemId>,
    /// The slug requested before disambiguation. Empty or `None` means the
    /// host did not pass it and it must be derived from the stored item.
    pub desired_slug: Option<String>,
}

impl SlugRequest {
    pub fn new(final_slug: impl Into<String>, item: &Item) -> Self {
        Self {
            final_slug: final_slug.into(),
            item_id: item.id,
            status: item.status.clone(),
            content_type: item.content_type.clone(),
            parent: item.parent,
            desired_slug: None,
        }
    }

    pub fn with_desired(mut self, desired: impl Into<String>) -> Self {
        self.desired_slug = Some(desired.into());
        self
    }
}

/// Which content types a lookup may match.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum TypeFilter {
    Any,
    OneOf(Vec<String>),
    Exactly(String),
}

impl TypeFilter {
    pub fn matches(&self, content_type: &str) -> bool {
        match self {
            Self::Any => true,
            Self::OneOf(types) => types.iter().any(|t| t == content_type),
            Self::Exactly(expected) => expected == content_type,
        }
    }
}

/// Query handed to [`crate::ContentStore::find_item`].
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct ItemQuery {
    pub slug: String,
    /// `None` matches every status.
    pub status: Option<ItemStatus>,
    pub types: TypeFilter,
    /// `None` skips the parent check; `Some(parent)` requires equality.
    pub parent: Option<Option<ItemId>>,
    pub exclude: ItemId,
}

impl ItemQuery {
    pub fn matches(&self, item: &Item) -> bool {
        item.id != self.exclude
            && item.slug == self.slug
            && self.status.as_ref().map_or(true, |status| &item.status == status)
            && self.types.matches(&item.content_type)
            && self.parent.map_or(true, |parent| item.parent == parent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_round_trips_host_names() {
        assert_eq!(ItemStatus::from("trash"), ItemStatus::Trashed);
        assert_eq!(ItemStatus::from("publish"), ItemStatus::Published);
        assert_eq!(ItemStatus::from("future").as_str(), "future");
        assert!(ItemStatus::Trashed.is_trashed());
        assert!(!ItemStatus::Other("inherit".into()).is_trashed());
    }

    #[test]
    fn query_excludes_self_and_respects_parent() {
        let item = Item::new(3, "page", "about")
            .with_parent(ItemId(1))
            .with_status(ItemStatus::Trashed);
        let mut query = ItemQuery {
            slug: "about".into(),
            status: Some(ItemStatus::Trashed),
            types: TypeFilter::OneOf(vec!["page".into()]),
            parent: Some(Some(ItemId(1))),
            exclude: ItemId(9),
        };
        assert!(query.matches(&item));

        query.parent = Some(None);
        assert!(!query.matches(&item));

        query.parent = None;
        query.exclude = ItemId(3);
        assert!(!query.matches(&item));
    }
}
