use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    DuplicateKind,
    AlreadyFrozen,
    NotFrozen,
    MisplacedKind,
    MissingBoundary,
    ExtensionDisabled,
    InvalidDescriptor,
    DuplicateRegistration,
    UnknownKindName,
    IncompleteDispatch,
    AlreadyInstalled,
    UnknownTag,
    InvalidKind,
    WrongCategory,
    PrinterFailed,
}

/// Build-time errors are registration defects and must abort initialization.
/// Runtime errors mean heap corruption or a caller bug and are never retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    BuildTime,
    Runtime,
}

impl ErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::DuplicateKind => "duplicate-kind",
            ErrorKind::AlreadyFrozen => "already-frozen",
            ErrorKind::NotFrozen => "not-frozen",
            ErrorKind::MisplacedKind => "misplaced-kind",
            ErrorKind::MissingBoundary => "missing-boundary",
            ErrorKind::ExtensionDisabled => "extension-disabled",
            ErrorKind::InvalidDescriptor => "invalid-descriptor",
            ErrorKind::DuplicateRegistration => "duplicate-registration",
            ErrorKind::UnknownKindName => "unknown-kind-name",
            ErrorKind::IncompleteDispatch => "incomplete-dispatch",
            ErrorKind::AlreadyInstalled => "already-installed",
            ErrorKind::UnknownTag => "unknown-tag",
            ErrorKind::InvalidKind => "invalid-kind",
            ErrorKind::WrongCategory => "wrong-category",
            ErrorKind::PrinterFailed => "printer-failed",
        }
    }

    pub fn class(self) -> ErrorClass {
        match self {
            ErrorKind::UnknownTag
            | ErrorKind::InvalidKind
            | ErrorKind::WrongCategory
            | ErrorKind::PrinterFailed => ErrorClass::Runtime,
            _ => ErrorClass::BuildTime,
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectModelError {
    pub kind: ErrorKind,
    pub message: String,
}

impl ObjectModelError {
    pub fn new(kind: ErrorKind, message: String) -> Self {
        Self { kind, message }
    }

    pub fn class(&self) -> ErrorClass {
        self.kind.class()
    }
}

impl fmt::Display for ObjectModelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

impl std::error::Error for ObjectModelError {}

pub type Result<T, E = ObjectModelError> = std::result::Result<T, E>;

macro_rules! model_err {
    ($kind:ident, $($arg:tt)+) => {
        $crate::error::ObjectModelError::new($crate::error::ErrorKind::$kind, format!($($arg)+))
    };
}

pub(crate) use model_err;
