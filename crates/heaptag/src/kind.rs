use std::borrow::Cow;
use std::fmt;

use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
#[repr(transparent)]
pub struct TagId(u32);

impl TagId {
    pub const fn new(raw: u32) -> Self {
        TagId(raw)
    }

    pub const fn get(self) -> u32 {
        self.0
    }

    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl From<u32> for TagId {
    fn from(raw: u32) -> Self {
        TagId(raw)
    }
}

impl fmt::Display for TagId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    CompiledSyntaxForm,
    RegisteredValueOrSlot,
    RuntimeKind,
    InternalOnly,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::CompiledSyntaxForm,
        Category::RegisteredValueOrSlot,
        Category::RuntimeKind,
        Category::InternalOnly,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Category::CompiledSyntaxForm => "compiled-syntax-form",
            Category::RegisteredValueOrSlot => "registered-value-or-slot",
            Category::RuntimeKind => "runtime-kind",
            Category::InternalOnly => "internal-only",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "compiled-syntax-form" => Some(Category::CompiledSyntaxForm),
            "registered-value-or-slot" => Some(Category::RegisteredValueOrSlot),
            "runtime-kind" => Some(Category::RuntimeKind),
            "internal-only" => Some(Category::InternalOnly),
            _ => None,
        }
    }

    pub fn is_observable(self) -> bool {
        matches!(self, Category::RuntimeKind)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A boundary that occupies a reserved slot inside the primary numbering.
///
/// The two end markers (`last_normal`, `last`) are exclusive ends and take no
/// slot, so they are not listed here.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Boundary {
    Values,
    CompiledValues,
}

impl Boundary {
    pub fn as_str(self) -> &'static str {
        match self {
            Boundary::Values => "values",
            Boundary::CompiledValues => "compiled-values",
        }
    }

    pub fn opens(self) -> Category {
        match self {
            Boundary::Values => Category::RegisteredValueOrSlot,
            Boundary::CompiledValues => Category::RuntimeKind,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KindDecl {
    pub name: Cow<'static, str>,
    pub category: Category,
}

impl KindDecl {
    pub fn new(name: impl Into<Cow<'static, str>>, category: Category) -> Self {
        Self {
            name: name.into(),
            category,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CatalogEntry {
    Kind(KindDecl),
    Boundary(Boundary),
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn kind(mut self, name: impl Into<Cow<'static, str>>, category: Category) -> Self {
        self.entries
            .push(CatalogEntry::Kind(KindDecl::new(name, category)));
        self
    }

    pub fn kinds(mut self, category: Category, names: &[&'static str]) -> Self {
        self.entries.extend(
            names
                .iter()
                .map(|&name| CatalogEntry::Kind(KindDecl::new(name, category))),
        );
        self
    }

    pub fn boundary(mut self, boundary: Boundary) -> Self {
        self.entries.push(CatalogEntry::Boundary(boundary));
        self
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
