use std::borrow::Cow;
use std::collections::BTreeMap;

use serde::Serialize;

use crate::error::{model_err, Result};
use crate::kind::{Boundary, Catalog, CatalogEntry, Category, KindDecl, TagId};

/// The four boundary values that partition `[0, last)` into categories.
///
/// `values` and `compiled_values` are reserved slots; `last_normal` and `last`
/// are exclusive ends. `0 <= values < compiled_values < last_normal <= last`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct Boundaries {
    pub values: TagId,
    pub compiled_values: TagId,
    pub last_normal: TagId,
    pub last: TagId,
}

impl Boundaries {
    pub fn is_ordered(&self) -> bool {
        self.values < self.compiled_values
            && self.compiled_values < self.last_normal
            && self.last_normal <= self.last
    }

    pub fn range_of(&self, category: Category) -> (TagId, TagId) {
        match category {
            Category::CompiledSyntaxForm => (TagId::new(0), self.values),
            Category::RegisteredValueOrSlot => (self.values, self.compiled_values),
            Category::RuntimeKind => (self.compiled_values, self.last_normal),
            Category::InternalOnly => (self.last_normal, self.last),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Lifecycle {
    Built,
    Frozen,
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum Slot {
    Kind {
        name: Cow<'static, str>,
        category: Category,
    },
    Reserved(Boundary),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KindInfo<'a> {
    pub tag: TagId,
    pub name: &'a str,
    pub category: Category,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct KindRange {
    pub start: TagId,
    pub end: TagId,
}

impl KindRange {
    #[inline]
    pub fn contains(&self, tag: TagId) -> bool {
        self.start <= tag && tag < self.end
    }

    pub fn count(&self) -> usize {
        (self.end.get() - self.start.get()) as usize
    }
}

#[derive(Clone, Debug)]
pub struct TagSpace {
    slots: Vec<Slot>,
    by_name: BTreeMap<String, TagId>,
    values: TagId,
    compiled_values: TagId,
    last_normal: TagId,
    include_internal_tags: bool,
    lifecycle: Lifecycle,
}

fn tag_at(position: usize) -> Result<TagId> {
    u32::try_from(position)
        .map(TagId::new)
        .map_err(|_| model_err!(MisplacedKind, "catalog position {position} does not fit a tag"))
}

impl TagSpace {
    pub fn build(catalog: &Catalog, include_internal_tags: bool) -> Result<TagSpace> {
        let mut slots: Vec<Slot> = Vec::with_capacity(catalog.len());
        let mut by_name: BTreeMap<String, TagId> = BTreeMap::new();
        let mut values: Option<TagId> = None;
        let mut compiled_values: Option<TagId> = None;
        let mut current = Category::CompiledSyntaxForm;

        for entry in catalog.entries() {
            let tag = tag_at(slots.len())?;
            match entry {
                CatalogEntry::Boundary(boundary) => {
                    let in_order = match boundary {
                        Boundary::Values => values.is_none() && compiled_values.is_none(),
                        Boundary::CompiledValues => {
                            values.is_some() && compiled_values.is_none()
                        }
                    };
                    if !in_order {
                        return Err(model_err!(
                            MisplacedKind,
                            "boundary {} at position {tag} is out of order",
                            boundary.as_str()
                        ));
                    }
                    match boundary {
                        Boundary::Values => values = Some(tag),
                        Boundary::CompiledValues => compiled_values = Some(tag),
                    }
                    current = boundary.opens();
                    slots.push(Slot::Reserved(*boundary));
                }
                CatalogEntry::Kind(decl) => {
                    if decl.category != current {
                        return Err(model_err!(
                            MisplacedKind,
                            "kind {:?} is declared {} but position {tag} lies in the {current} range",
                            decl.name,
                            decl.category
                        ));
                    }
                    insert_name(&mut by_name, &decl.name, tag)?;
                    slots.push(Slot::Kind {
                        name: decl.name.clone(),
                        category: decl.category,
                    });
                }
            }
        }

        let values = values
            .ok_or_else(|| model_err!(MissingBoundary, "catalog has no values boundary"))?;
        let compiled_values = compiled_values.ok_or_else(|| {
            model_err!(MissingBoundary, "catalog has no compiled-values boundary")
        })?;
        let last_normal = tag_at(slots.len())?;

        let space = TagSpace {
            slots,
            by_name,
            values,
            compiled_values,
            last_normal,
            include_internal_tags,
            lifecycle: Lifecycle::Built,
        };
        debug_assert!(space.boundaries().is_ordered());
        tracing::debug!(
            kinds = space.by_name.len(),
            values = %space.values,
            compiled_values = %space.compiled_values,
            last_normal = %space.last_normal,
            include_internal_tags,
            "tag space built"
        );
        Ok(space)
    }

    /// Appends a runtime kind to the end of the primary numbering.
    pub fn register(&mut self, decl: KindDecl) -> Result<TagId> {
        self.ensure_mutable()?;
        if decl.category != Category::RuntimeKind {
            return Err(model_err!(
                MisplacedKind,
                "only runtime kinds can be registered after build, got {} for {:?}",
                decl.category,
                decl.name
            ));
        }
        if self.slots.len() != self.last_normal.index() {
            return Err(model_err!(
                MisplacedKind,
                "cannot register {:?} after internal kinds were appended",
                decl.name
            ));
        }
        let tag = tag_at(self.slots.len())?;
        insert_name(&mut self.by_name, &decl.name, tag)?;
        self.slots.push(Slot::Kind {
            name: decl.name,
            category: Category::RuntimeKind,
        });
        self.last_normal = tag_at(self.slots.len())?;
        Ok(tag)
    }

    pub(crate) fn push_internal(&mut self, name: Cow<'static, str>) -> Result<TagId> {
        self.ensure_mutable()?;
        let tag = tag_at(self.slots.len())?;
        insert_name(&mut self.by_name, &name, tag)?;
        self.slots.push(Slot::Kind {
            name,
            category: Category::InternalOnly,
        });
        Ok(tag)
    }

    pub(crate) fn ensure_mutable(&self) -> Result<()> {
        if self.lifecycle == Lifecycle::Frozen {
            return Err(model_err!(AlreadyFrozen, "tag space is frozen"));
        }
        Ok(())
    }

    pub(crate) fn ensure_frozen(&self, what: &str) -> Result<()> {
        if self.lifecycle != Lifecycle::Frozen {
            return Err(model_err!(
                NotFrozen,
                "{what} can only be derived from a frozen tag space"
            ));
        }
        Ok(())
    }

    /// Makes the space immutable. Freezing twice is a no-op.
    pub fn freeze(&mut self) {
        if self.lifecycle == Lifecycle::Frozen {
            return;
        }
        self.lifecycle = Lifecycle::Frozen;
        tracing::debug!(last = %self.last(), "tag space frozen");
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    pub fn is_frozen(&self) -> bool {
        self.lifecycle == Lifecycle::Frozen
    }

    pub fn include_internal_tags(&self) -> bool {
        self.include_internal_tags
    }

    pub fn boundaries(&self) -> Boundaries {
        Boundaries {
            values: self.values,
            compiled_values: self.compiled_values,
            last_normal: self.last_normal,
            last: self.last(),
        }
    }

    pub fn last(&self) -> TagId {
        // `slots.len()` was checked against u32 on every push.
        TagId::new(self.slots.len() as u32)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    #[inline]
    pub fn is_valid(&self, tag: TagId) -> bool {
        tag.index() < self.slots.len()
    }

    pub fn is_reserved(&self, tag: TagId) -> bool {
        matches!(self.slots.get(tag.index()), Some(Slot::Reserved(_)))
    }

    pub fn boundary_at(&self, tag: TagId) -> Option<Boundary> {
        match self.slots.get(tag.index()) {
            Some(Slot::Reserved(b)) => Some(*b),
            _ => None,
        }
    }

    pub fn name_of(&self, tag: TagId) -> Option<&str> {
        match self.slots.get(tag.index()) {
            Some(Slot::Kind { name, .. }) => Some(&**name),
            _ => None,
        }
    }

    pub fn kind(&self, tag: TagId) -> Option<KindInfo<'_>> {
        match self.slots.get(tag.index()) {
            Some(Slot::Kind { name, category }) => Some(KindInfo {
                tag,
                name: &**name,
                category: *category,
            }),
            _ => None,
        }
    }

    pub fn tag_of(&self, name: &str) -> Result<TagId> {
        self.by_name
            .get(name)
            .copied()
            .ok_or_else(|| model_err!(UnknownKindName, "no kind named {name:?}"))
    }

    /// Declared kinds in tag order; reserved boundary slots are skipped.
    pub fn kinds(&self) -> impl Iterator<Item = KindInfo<'_>> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| match slot {
                Slot::Kind { name, category } => Some(KindInfo {
                    tag: TagId::new(i as u32),
                    name: &**name,
                    category: *category,
                }),
                Slot::Reserved(_) => None,
            })
    }

    /// Half-open range covering `first ..= last`. Both kinds must share a
    /// category and `first` must not come after `last`.
    pub fn range(&self, first: &str, last: &str) -> Result<KindRange> {
        let start = self.tag_of(first)?;
        let end_incl = self.tag_of(last)?;
        if start > end_incl {
            return Err(model_err!(
                MisplacedKind,
                "range {first:?} ..= {last:?} is inverted ({start} > {end_incl})"
            ));
        }
        let a = self.kind(start).map(|k| k.category);
        let b = self.kind(end_incl).map(|k| k.category);
        if a != b {
            return Err(model_err!(
                MisplacedKind,
                "range {first:?} ..= {last:?} crosses a category boundary"
            ));
        }
        Ok(KindRange {
            start,
            end: TagId::new(end_incl.get() + 1),
        })
    }
}

fn insert_name(by_name: &mut BTreeMap<String, TagId>, name: &str, tag: TagId) -> Result<()> {
    if let Some(prev) = by_name.get(name) {
        return Err(model_err!(
            DuplicateKind,
            "kind {name:?} declared at {prev} and again at {tag}"
        ));
    }
    by_name.insert(name.to_string(), tag);
    Ok(())
}
