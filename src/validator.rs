//! Pluggable "is this slug invalid" checks, one registry slot per scope.

use crate::models::{ItemId, Scope};
use std::collections::HashMap;

/// Context passed to validators alongside the slug.
#[derive(Debug, Clone, Copy)]
pub struct ValidationInput<'a> {
    pub scope: Scope,
    pub content_type: &'a str,
    pub parent: Option<ItemId>,
}

pub trait SlugValidator {
    fn is_invalid(&self, slug: &str, input: &ValidationInput<'_>) -> bool;
}

impl<F> SlugValidator for F
where
    F: Fn(&str, &ValidationInput<'_>) -> bool,
{
    fn is_invalid(&self, slug: &str, input: &ValidationInput<'_>) -> bool {
        self(slug, input)
    }
}

/// Validator that never flags anything.
#[derive(Debug, Default, Clone, Copy)]
pub struct AcceptAll;

impl SlugValidator for AcceptAll {
    fn is_invalid(&self, _slug: &str, _input: &ValidationInput<'_>) -> bool {
        false
    }
}

#[derive(Default)]
pub struct ValidatorSet {
    by_scope: HashMap<Scope, Vec<Box<dyn SlugValidator>>>,
}

impl ValidatorSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, scope: Scope, validator: Box<dyn SlugValidator>) -> &mut Self {
        self.by_scope.entry(scope).or_default().push(validator);
        self
    }

    pub fn with(mut self, scope: Scope, validator: impl SlugValidator + 'static) -> Self {
        self.register(scope, Box::new(validator));
        self
    }

    /// True when any validator registered for the input's scope flags the slug.
    pub fn is_invalid(&self, slug: &str, input: &ValidationInput<'_>) -> bool {
        self.by_scope
            .get(&input.scope)
            .is_some_and(|validators| validators.iter().any(|v| v.is_invalid(slug, input)))
    }
}

impl std::fmt::Debug for ValidatorSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let counts: HashMap<&str, usize> = self
            .by_scope
            .iter()
            .map(|(scope, validators)| (scope.as_str(), validators.len()))
            .collect();
        f.debug_struct("ValidatorSet").field("by_scope", &counts).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(scope: Scope) -> ValidationInput<'static> {
        ValidationInput {
            scope,
            content_type: "post",
            parent: None,
        }
    }

    #[test]
    fn empty_set_accepts_everything() {
        let set = ValidatorSet::new().with(Scope::Flat, AcceptAll);
        assert!(!set.is_invalid("anything", &input(Scope::Flat)));
        assert!(!set.is_invalid("anything", &input(Scope::Attachment)));
    }

    #[test]
    fn validators_only_apply_to_their_scope() {
        let set = ValidatorSet::new()
            .with(Scope::Flat, |slug: &str, _: &ValidationInput<'_>| slug.starts_with("wp-"));
        assert!(set.is_invalid("wp-admin", &input(Scope::Flat)));
        assert!(!set.is_invalid("wp-admin", &input(Scope::Hierarchical)));
        assert!(!set.is_invalid("about", &input(Scope::Flat)));
    }
}
