use std::borrow::Cow;

use crate::error::{model_err, Result};
use crate::kind::TagId;
use crate::tag_space::TagSpace;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ExtensionRegistry {
    kinds: Vec<Cow<'static, str>>,
}

impl ExtensionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_kinds(names: &[&'static str]) -> Self {
        Self {
            kinds: names.iter().map(|&n| Cow::Borrowed(n)).collect(),
        }
    }

    pub fn push(&mut self, name: impl Into<Cow<'static, str>>) -> &mut Self {
        self.kinds.push(name.into());
        self
    }

    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.kinds.iter().map(|k| k.as_ref())
    }

    pub fn append_to(&self, space: TagSpace) -> Result<TagSpace> {
        append_internal_tags(space, self)
    }
}

/// Appends `internal` after the last normal kind of `space`.
/// Fails with `AlreadyFrozen` once the space is frozen and with
/// `ExtensionDisabled` when the space was built without the internal tier.
/// On failure no tag is added.
pub fn append_internal_tags(mut space: TagSpace, internal: &ExtensionRegistry) -> Result<TagSpace> {
    space.ensure_mutable()?;
    if !space.include_internal_tags() {
        return Err(model_err!(
            ExtensionDisabled,
            "tag space was built without internal tags ({} internal kinds offered)",
            internal.len()
        ));
    }

    let mut seen = std::collections::BTreeSet::new();
    for name in internal.names() {
        if !seen.insert(name) || space.tag_of(name).is_ok() {
            return Err(model_err!(DuplicateKind, "internal kind {name:?} is already declared"));
        }
    }

    let mut first: Option<TagId> = None;
    for name in &internal.kinds {
        let tag = space.push_internal(name.clone())?;
        first.get_or_insert(tag);
    }
    tracing::debug!(
        appended = internal.len(),
        first = ?first,
        last = %space.last(),
        "internal tags appended"
    );
    Ok(space)
}
