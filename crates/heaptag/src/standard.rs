use std::fmt;
use std::sync::Arc;

use crate::dispatch::{Registrar, Subsystem, IDENTITY};
use crate::error::Result;
use crate::extension::ExtensionRegistry;
use crate::header::HeapObject;
use crate::kind::{Boundary, Catalog, Category};
use crate::scan::ScanDescriptor;
use crate::tag_space::{KindRange, TagSpace};

pub const COMPILED_SYNTAX_FORMS: [&str; 16] = [
    "toplevel", "local", "local-unbox", "syntax", "application", "application2", "application3",
    "sequence", "branch", "unclosed-procedure", "let-value", "let-void", "letrec", "let-one",
    "with-cont-mark", "quote-syntax",
];

pub const REGISTERED_VALUES_AND_SLOTS: [&str; 9] = [
    "compiled-unclosed-procedure", "compiled-let-value", "compiled-let-void", "compiled-syntax",
    "compiled-toplevel", "compiled-quote-syntax", "quote-compilation", "variable",
    "module-variable",
];

pub const RUNTIME_KINDS: [&str; 114] = [
    "prim", "closed-prim", "closure", "case-closure", "cont", "escaping-cont", "proc-struct",
    "native-closure", "structure", "char", "integer", "bignum", "rational", "float", "double",
    "complex-izi", "complex", "char-string", "byte-string", "unix-path", "windows-path",
    "symbol", "keyword", "null", "pair", "vector", "inspector", "input-port", "output-port",
    "eof", "true", "false", "void", "syntax-compiler", "macro", "box", "thread", "stx-offset",
    "cont-mark-set", "sema", "hash-table", "cpointer", "weak-box", "ephemeron", "struct-type",
    "module-index", "set-macro", "listener", "namespace", "config", "stx", "will-executor",
    "custodian", "random-state", "regexp", "bucket", "bucket-table", "subprocess",
    "compilation-top", "wrap-chunk", "eval-waiting", "tail-call-waiting", "undefined",
    "struct-property", "multiple-values", "placeholder", "case-lambda-sequence",
    "begin0-sequence", "rename-table", "module", "svector", "lazy-macro", "resolve-prefix",
    "security-guard", "indent", "udp", "udp-evt", "tcp-accept-evt", "id-macro", "evt-set",
    "wrap-evt", "handle-evt", "nack-guard-evt", "semaphore-repost", "channel", "channel-put",
    "thread-resume", "thread-suspend", "thread-dead", "poll-evt", "nack-evt", "module-registry",
    "thread-set", "string-converter", "alarm", "thread-cell", "channel-syncer",
    "special-comment", "write-evt", "always-evt", "never-evt", "progress-evt", "certifications",
    "already-comp", "readtable", "intdef-context", "lexical-rib", "thread-cell-values",
    "global-ref", "cont-mark-chain", "raw-pair", "prompt", "prompt-tag", "delay-syntax",
];

pub const INTERNAL_KINDS: [&str; 66] = [
    "weak-array", "comp-env", "constant-binding", "resolve-info", "optimize-info",
    "compile-info", "cont-mark", "saved-stack", "reply-item", "closure-info", "overflow",
    "overflow-jmp", "meta-cont", "dyn-wind-cell", "dyn-wind-info", "dyn-wind", "dup-check",
    "thread-memory", "input-file", "input-fd", "oskit-console-input", "tested-input-file",
    "tested-output-file", "indexed-string", "output-file", "load-handler-data", "pipe",
    "beos-process", "system-child", "tcp", "write-data", "tcp-select-info", "namespace-option",
    "param-data", "will", "will-registration", "struct-proc-info", "linker-name", "param-map",
    "finalization", "finalizations", "cpp-object", "cpp-array-object", "stack-object",
    "preallocated-object", "thread-hop", "srcloc", "evt", "syncing", "comp-prefix",
    "user-input", "user-output", "compact-port", "read-special-dw", "regwork", "buf-holder",
    "parameterization", "print-params", "read-params", "native-code", "native-code-plus-case",
    "jitter-data", "module-exports", "delay-load-info", "marshal-info", "unmarshal-info",
];

pub fn standard_catalog() -> Catalog {
    Catalog::new()
        .kinds(Category::CompiledSyntaxForm, &COMPILED_SYNTAX_FORMS)
        .boundary(Boundary::Values)
        .kinds(Category::RegisteredValueOrSlot, &REGISTERED_VALUES_AND_SLOTS)
        .boundary(Boundary::CompiledValues)
        .kinds(Category::RuntimeKind, &RUNTIME_KINDS)
}

pub fn internal_kinds() -> ExtensionRegistry {
    ExtensionRegistry::with_kinds(&INTERNAL_KINDS)
}

pub fn standard_space(include_internal_tags: bool) -> Result<TagSpace> {
    let space = TagSpace::build(&standard_catalog(), include_internal_tags)?;
    let mut space = if include_internal_tags {
        internal_kinds().append_to(space)?
    } else {
        space
    };
    space.freeze();
    Ok(space)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StandardRanges {
    pub procedure: KindRange,
    pub procedure_or_struct: KindRange,
    pub number: KindRange,
}

impl StandardRanges {
    pub fn resolve(space: &TagSpace) -> Result<Self> {
        Ok(Self {
            procedure: space.range("prim", "native-closure")?,
            procedure_or_struct: space.range("prim", "structure")?,
            number: space.range("integer", "complex")?,
        })
    }
}

const UNIT: ScanDescriptor = ScanDescriptor::Atomic { words: 1 };
const WORD: ScanDescriptor = ScanDescriptor::Atomic { words: 2 };
const CELL: ScanDescriptor = ScanDescriptor::Fixed {
    words: 3,
    pointers: &[1, 2],
};
const BOX: ScanDescriptor = ScanDescriptor::Fixed {
    words: 2,
    pointers: &[1],
};
// Weak referents are cleared by the collector, never traced.
const WEAK_BOX: ScanDescriptor = ScanDescriptor::Fixed {
    words: 2,
    pointers: &[],
};
const EPHEMERON: ScanDescriptor = ScanDescriptor::Fixed {
    words: 3,
    pointers: &[],
};
const BYTES: ScanDescriptor = ScanDescriptor::Array {
    prefix: 2,
    len_word: 1,
    traced: false,
};
const RECORD: ScanDescriptor = ScanDescriptor::Array {
    prefix: 2,
    len_word: 1,
    traced: true,
};

/// Collector layout of a standard kind. Kinds without a dedicated layout are
/// length-prefixed records whose payload words are all traced.
pub fn standard_layout(kind: &str) -> ScanDescriptor {
    match kind {
        "null" | "eof" | "true" | "false" | "void" | "undefined" | "always-evt"
        | "never-evt" => UNIT,
        "char" | "integer" | "float" | "double" | "cpointer" => WORD,
        "pair" | "raw-pair" | "rational" | "complex" | "complex-izi" => CELL,
        "box" => BOX,
        "weak-box" => WEAK_BOX,
        "ephemeron" => EPHEMERON,
        "bignum" | "char-string" | "byte-string" | "unix-path" | "windows-path" | "symbol"
        | "keyword" | "random-state" | "weak-array" | "indexed-string" => BYTES,
        _ => RECORD,
    }
}

pub struct StandardLayouts;

impl Subsystem for StandardLayouts {
    fn name(&self) -> &str {
        "standard-layouts"
    }

    fn register(&self, r: &mut Registrar<'_>) -> Result<()> {
        let space = r.space();
        for kind in space.kinds() {
            r.scan(kind.name, standard_layout(kind.name))?;
        }
        Ok(())
    }
}

fn describe_opaque(_: &dyn HeapObject, kind: &str, out: &mut dyn fmt::Write) -> fmt::Result {
    write!(out, "#<{kind}>")
}

pub struct OpaqueBehaviors {
    skip: Vec<&'static str>,
}

impl OpaqueBehaviors {
    pub fn new() -> Self {
        Self { skip: Vec::new() }
    }

    pub fn except(kinds: &[&'static str]) -> Self {
        Self {
            skip: kinds.to_vec(),
        }
    }
}

impl Default for OpaqueBehaviors {
    fn default() -> Self {
        Self::new()
    }
}

impl Subsystem for OpaqueBehaviors {
    fn name(&self) -> &str {
        "opaque-behaviors"
    }

    fn register(&self, r: &mut Registrar<'_>) -> Result<()> {
        let space: Arc<TagSpace> = r.space();
        for kind in space.kinds() {
            let skipped = self.skip.iter().any(|s| *s == kind.name);
            if kind.category != Category::RuntimeKind || skipped {
                continue;
            }
            r.describe(kind.name, describe_opaque)?
                .equals_and_hash(kind.name, IDENTITY)?;
        }
        Ok(())
    }
}
