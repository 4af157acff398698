use std::fmt;
use std::hash::Hasher;
use std::sync::Arc;

use serde::Serialize;

use crate::error::{model_err, Result};
use crate::header::HeapObject;
use crate::kind::{Category, TagId};
use crate::scan::ScanDescriptor;
use crate::tag_space::TagSpace;

/// Writes the external representation of an object. `kind` is the name the
/// object's tag was declared with.
pub type DescribeFn = fn(obj: &dyn HeapObject, kind: &str, out: &mut dyn fmt::Write) -> fmt::Result;
pub type EqualsFn = fn(&dyn HeapObject, &dyn HeapObject) -> bool;
pub type HashFn = fn(&dyn HeapObject, &mut dyn Hasher);
pub type FinalizerFn = fn(&dyn HeapObject);

#[derive(Clone, Copy)]
pub struct EqualsAndHash {
    pub equals: EqualsFn,
    pub hash: HashFn,
}

#[derive(Clone, Copy, Default)]
pub struct DispatchEntry {
    pub describe: Option<DescribeFn>,
    pub equals_and_hash: Option<EqualsAndHash>,
    pub scan: Option<ScanDescriptor>,
    pub finalizer: Option<FinalizerFn>,
}

impl DispatchEntry {
    pub fn has(&self, op: Op) -> bool {
        match op {
            Op::Describe => self.describe.is_some(),
            Op::EqualsAndHash => self.equals_and_hash.is_some(),
            Op::Scan => self.scan.is_some(),
            Op::Finalizer => self.finalizer.is_some(),
        }
    }
}

impl fmt::Debug for DispatchEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DispatchEntry")
            .field("describe", &self.describe.is_some())
            .field("equals_and_hash", &self.equals_and_hash.is_some())
            .field("scan", &self.scan)
            .field("finalizer", &self.finalizer.is_some())
            .finish()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Op {
    Describe,
    EqualsAndHash,
    Scan,
    Finalizer,
}

impl Op {
    pub const ALL: [Op; 4] = [Op::Describe, Op::EqualsAndHash, Op::Scan, Op::Finalizer];

    pub fn as_str(self) -> &'static str {
        match self {
            Op::Describe => "describe",
            Op::EqualsAndHash => "equals_and_hash",
            Op::Scan => "scan",
            Op::Finalizer => "finalizer",
        }
    }

    fn slot(self) -> usize {
        match self {
            Op::Describe => 0,
            Op::EqualsAndHash => 1,
            Op::Scan => 2,
            Op::Finalizer => 3,
        }
    }
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub fn required_ops(category: Category) -> &'static [Op] {
    match category {
        Category::RuntimeKind => &[Op::Describe, Op::EqualsAndHash, Op::Scan],
        Category::CompiledSyntaxForm
        | Category::RegisteredValueOrSlot
        | Category::InternalOnly => &[Op::Scan],
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DispatchGap {
    pub tag: TagId,
    pub name: String,
    pub category: Category,
    pub missing: Vec<Op>,
}

impl fmt::Display for DispatchGap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let missing: Vec<&str> = self.missing.iter().map(|op| op.as_str()).collect();
        write!(
            f,
            "tag {} ({}, {}): missing {}",
            self.tag,
            self.name,
            self.category,
            missing.join(", ")
        )
    }
}

pub trait Subsystem {
    fn name(&self) -> &str;

    fn register(&self, registrar: &mut Registrar<'_>) -> Result<()>;
}

const CORE_OWNER: &str = "core";

fn describe_reserved(_: &dyn HeapObject, _: &str, out: &mut dyn fmt::Write) -> fmt::Result {
    out.write_str("#<reserved>")
}

pub fn identity_equals(a: &dyn HeapObject, b: &dyn HeapObject) -> bool {
    std::ptr::addr_eq(a, b)
}

pub fn identity_hash(obj: &dyn HeapObject, state: &mut dyn Hasher) {
    state.write_usize(std::ptr::from_ref(obj).cast::<()>() as usize);
}

pub const IDENTITY: EqualsAndHash = EqualsAndHash {
    equals: identity_equals,
    hash: identity_hash,
};

// Boundary slots can never be stamped, but keeping them populated makes every
// tag in [0, last) resolvable.
const RESERVED_ENTRY: DispatchEntry = DispatchEntry {
    describe: Some(describe_reserved),
    equals_and_hash: Some(IDENTITY),
    scan: Some(ScanDescriptor::Atomic { words: 1 }),
    finalizer: None,
};

pub struct DispatchTableBuilder {
    space: Arc<TagSpace>,
    entries: Vec<DispatchEntry>,
    owners: Vec<[Option<String>; 4]>,
}

impl DispatchTableBuilder {
    pub fn new(space: Arc<TagSpace>) -> Result<Self> {
        space.ensure_frozen("dispatch table")?;
        let n = space.len();
        let mut entries = vec![DispatchEntry::default(); n];
        let mut owners: Vec<[Option<String>; 4]> = vec![Default::default(); n];
        for i in 0..n {
            if space.is_reserved(TagId::new(i as u32)) {
                entries[i] = RESERVED_ENTRY;
                owners[i] = [
                    Some(CORE_OWNER.to_string()),
                    Some(CORE_OWNER.to_string()),
                    Some(CORE_OWNER.to_string()),
                    None,
                ];
            }
        }
        Ok(Self {
            space,
            entries,
            owners,
        })
    }

    pub fn space(&self) -> &Arc<TagSpace> {
        &self.space
    }

    /// Runs `subsystem`'s registrations. If any of them fails, none of the
    /// subsystem's registrations are kept.
    pub fn install(&mut self, subsystem: &dyn Subsystem) -> Result<()> {
        let name = subsystem.name().to_string();
        let entries = self.entries.clone();
        let owners = self.owners.clone();
        let mut registrar = Registrar {
            builder: self,
            subsystem: &name,
        };
        if let Err(err) = subsystem.register(&mut registrar) {
            self.entries = entries;
            self.owners = owners;
            tracing::debug!(subsystem = %name, error = %err, "dispatch subsystem rolled back");
            return Err(err);
        }
        tracing::debug!(subsystem = %name, "dispatch subsystem installed");
        Ok(())
    }

    fn claim(&mut self, subsystem: &str, kind: &str, op: Op) -> Result<usize> {
        let tag = self.space.tag_of(kind)?;
        let owner = &mut self.owners[tag.index()][op.slot()];
        if let Some(prev) = owner {
            return Err(model_err!(
                DuplicateRegistration,
                "{op} for kind {kind:?} registered by both {prev:?} and {subsystem:?}"
            ));
        }
        *owner = Some(subsystem.to_string());
        Ok(tag.index())
    }

    pub fn gaps(&self) -> Vec<DispatchGap> {
        let bounds = self.space.boundaries();
        let mut gaps = Vec::new();
        for kind in self.space.kinds() {
            debug_assert!({
                let (lo, hi) = bounds.range_of(kind.category);
                lo <= kind.tag && kind.tag < hi
            });
            let entry = &self.entries[kind.tag.index()];
            let missing: Vec<Op> = required_ops(kind.category)
                .iter()
                .copied()
                .filter(|op| !entry.has(*op))
                .collect();
            if !missing.is_empty() {
                gaps.push(DispatchGap {
                    tag: kind.tag,
                    name: kind.name.to_string(),
                    category: kind.category,
                    missing,
                });
            }
        }
        gaps
    }

    pub fn finish(self) -> Result<DispatchTable> {
        let gaps = self.gaps();
        if !gaps.is_empty() {
            let lines: Vec<String> = gaps.iter().map(|g| format!("  - {g}")).collect();
            return Err(model_err!(
                IncompleteDispatch,
                "{} kind(s) lack required operations:\n{}",
                gaps.len(),
                lines.join("\n")
            ));
        }
        tracing::debug!(entries = self.entries.len(), "dispatch table built");
        Ok(DispatchTable {
            space: self.space,
            entries: self.entries.into_boxed_slice(),
        })
    }
}

pub struct Registrar<'a> {
    builder: &'a mut DispatchTableBuilder,
    subsystem: &'a str,
}

impl Registrar<'_> {
    pub fn space(&self) -> Arc<TagSpace> {
        Arc::clone(&self.builder.space)
    }

    pub fn describe(&mut self, kind: &str, f: DescribeFn) -> Result<&mut Self> {
        let i = self.builder.claim(self.subsystem, kind, Op::Describe)?;
        self.builder.entries[i].describe = Some(f);
        Ok(self)
    }

    pub fn equals_and_hash(&mut self, kind: &str, eh: EqualsAndHash) -> Result<&mut Self> {
        let i = self.builder.claim(self.subsystem, kind, Op::EqualsAndHash)?;
        self.builder.entries[i].equals_and_hash = Some(eh);
        Ok(self)
    }

    pub fn scan(&mut self, kind: &str, descriptor: ScanDescriptor) -> Result<&mut Self> {
        descriptor
            .validate()
            .map_err(|e| model_err!(InvalidDescriptor, "kind {kind:?}: {}", e.message))?;
        let i = self.builder.claim(self.subsystem, kind, Op::Scan)?;
        self.builder.entries[i].scan = Some(descriptor);
        Ok(self)
    }

    pub fn finalizer(&mut self, kind: &str, f: FinalizerFn) -> Result<&mut Self> {
        let i = self.builder.claim(self.subsystem, kind, Op::Finalizer)?;
        self.builder.entries[i].finalizer = Some(f);
        Ok(self)
    }
}

pub struct DispatchTable {
    space: Arc<TagSpace>,
    entries: Box<[DispatchEntry]>,
}

impl DispatchTable {
    pub fn build(space: Arc<TagSpace>, subsystems: &[&dyn Subsystem]) -> Result<Self> {
        let mut builder = DispatchTableBuilder::new(space)?;
        for s in subsystems {
            builder.install(*s)?;
        }
        builder.finish()
    }

    pub fn space(&self) -> &Arc<TagSpace> {
        &self.space
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[inline]
    pub fn lookup(&self, tag: TagId) -> Result<&DispatchEntry> {
        self.entries.get(tag.index()).ok_or_else(|| {
            model_err!(
                UnknownTag,
                "no dispatch entry for tag {tag}: outside [0, {})",
                self.entries.len()
            )
        })
    }
}

impl fmt::Debug for DispatchTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DispatchTable")
            .field("entries", &self.entries.len())
            .finish()
    }
}
