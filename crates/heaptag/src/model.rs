use std::hash::Hasher;
use std::sync::Arc;

use crate::classify::CategoryClassifier;
use crate::config::ModelConfig;
use crate::dispatch::{DispatchEntry, DispatchTable, Subsystem};
use crate::error::{model_err, Result};
use crate::hashing::StableHasher;
use crate::header::{HeapObject, ObjectHeader};
use crate::kind::{Category, TagId};
use crate::scan::ScanDescriptor;
use crate::standard::{self, OpaqueBehaviors, StandardLayouts};
use crate::tag_space::TagSpace;

pub struct ObjectModel {
    space: Arc<TagSpace>,
    classifier: CategoryClassifier,
    dispatch: DispatchTable,
}

impl ObjectModel {
    pub fn new(dispatch: DispatchTable) -> Result<Self> {
        let space = Arc::clone(dispatch.space());
        let classifier = CategoryClassifier::new(&space)?;
        Ok(Self {
            space,
            classifier,
            dispatch,
        })
    }

    /// Standard catalog with the given extra subsystems installed ahead of the
    /// default layouts and opaque behaviors.
    ///
    /// Kinds named in `structural` are left out of the opaque behaviors so one
    /// of `extra` can provide their printer and equality.
    pub fn standard_with(
        config: &ModelConfig,
        extra: &[&dyn Subsystem],
        structural: &[&'static str],
    ) -> Result<Self> {
        let space = Arc::new(standard::standard_space(config.include_internal_tags)?);
        let opaque = OpaqueBehaviors::except(structural);
        let mut subsystems: Vec<&dyn Subsystem> = extra.to_vec();
        subsystems.push(&StandardLayouts);
        subsystems.push(&opaque);
        Self::new(DispatchTable::build(space, &subsystems)?)
    }

    pub fn standard(config: &ModelConfig) -> Result<Self> {
        Self::standard_with(config, &[], &[])
    }

    pub fn space(&self) -> &Arc<TagSpace> {
        &self.space
    }

    pub fn classifier(&self) -> &CategoryClassifier {
        &self.classifier
    }

    pub fn dispatch(&self) -> &DispatchTable {
        &self.dispatch
    }

    pub fn allocate_header(&self, kind: TagId) -> Result<ObjectHeader> {
        ObjectHeader::stamp(&self.space, kind)
    }

    #[inline]
    pub fn classify(&self, tag: TagId) -> Result<Category> {
        self.classifier.classify(tag)
    }

    #[inline]
    pub fn lookup(&self, tag: TagId) -> Result<&DispatchEntry> {
        self.dispatch.lookup(tag)
    }

    #[inline]
    pub fn is_valid(&self, tag: TagId) -> bool {
        self.classifier.is_valid(tag)
    }

    pub fn scan_descriptor(&self, tag: TagId) -> Result<ScanDescriptor> {
        self.lookup(tag)?
            .scan
            .ok_or_else(|| model_err!(IncompleteDispatch, "tag {tag} has no scan descriptor"))
    }

    fn observable_entry(&self, obj: &dyn HeapObject, op: &str) -> Result<&DispatchEntry> {
        let tag = obj.tag();
        let category = self.classify(tag)?;
        if !category.is_observable() {
            return Err(model_err!(
                WrongCategory,
                "{op} of tag {tag} ({}): {category} objects are not language values",
                self.space.name_of(tag).unwrap_or("reserved")
            ));
        }
        self.lookup(tag)
    }

    pub fn describe(&self, obj: &dyn HeapObject) -> Result<String> {
        let entry = self.observable_entry(obj, "describe")?;
        let tag = obj.tag();
        let describe = entry
            .describe
            .ok_or_else(|| model_err!(IncompleteDispatch, "tag {tag} has no printer"))?;
        let kind = self.space.name_of(tag).unwrap_or("reserved");
        let mut out = String::new();
        describe(obj, kind, &mut out)
            .map_err(|_| model_err!(PrinterFailed, "printer for {kind} failed"))?;
        Ok(out)
    }

    /// Structural equality. Objects of different kinds are never equal.
    pub fn equals(&self, a: &dyn HeapObject, b: &dyn HeapObject) -> Result<bool> {
        let entry = self.observable_entry(a, "equals")?;
        if a.tag() != b.tag() {
            return Ok(false);
        }
        let eh = entry.equals_and_hash.ok_or_else(|| {
            model_err!(IncompleteDispatch, "tag {} has no equality", a.tag())
        })?;
        Ok((eh.equals)(a, b))
    }

    pub fn hash(&self, obj: &dyn HeapObject) -> Result<u64> {
        let entry = self.observable_entry(obj, "hash")?;
        let eh = entry.equals_and_hash.ok_or_else(|| {
            model_err!(IncompleteDispatch, "tag {} has no hash", obj.tag())
        })?;
        let mut hasher = StableHasher::new();
        hasher.write_u32(obj.tag().get());
        (eh.hash)(obj, &mut hasher);
        Ok(hasher.finish())
    }

    /// Runs the kind's finalizer, if it has one. Returns whether one ran.
    pub fn finalize(&self, obj: &dyn HeapObject) -> Result<bool> {
        match self.lookup(obj.tag())?.finalizer {
            Some(f) => {
                f(obj);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

impl std::fmt::Debug for ObjectModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObjectModel")
            .field("boundaries", &self.space.boundaries())
            .field("dispatch", &self.dispatch)
            .finish()
    }
}
