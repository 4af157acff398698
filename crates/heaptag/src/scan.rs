use serde::Serialize;

use crate::error::{model_err, Result};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "layout", rename_all = "lowercase")]
pub enum ScanDescriptor {
    Atomic { words: usize },
    Fixed {
        words: usize,
        pointers: &'static [usize],
    },
    /// `prefix` words (header and length included) followed by as many
    /// element words as the length word at `len_word` says. Elements are
    /// traced when `traced` is set.
    Array {
        prefix: usize,
        len_word: usize,
        traced: bool,
    },
}

impl ScanDescriptor {
    pub fn validate(&self) -> Result<()> {
        match *self {
            ScanDescriptor::Atomic { words } => {
                if words == 0 {
                    return Err(model_err!(InvalidDescriptor, "atomic layout has no header word"));
                }
            }
            ScanDescriptor::Fixed { words, pointers } => {
                if words == 0 {
                    return Err(model_err!(InvalidDescriptor, "fixed layout has no header word"));
                }
                let mut prev = 0usize;
                for &off in pointers {
                    if off <= prev || off >= words {
                        return Err(model_err!(
                            InvalidDescriptor,
                            "pointer offset {off} must be increasing and inside 1..{words}"
                        ));
                    }
                    prev = off;
                }
            }
            ScanDescriptor::Array {
                prefix, len_word, ..
            } => {
                if len_word == 0 || len_word >= prefix {
                    return Err(model_err!(
                        InvalidDescriptor,
                        "length word {len_word} must be inside 1..{prefix}"
                    ));
                }
            }
        }
        Ok(())
    }

    pub fn is_atomic(&self) -> bool {
        match self {
            ScanDescriptor::Atomic { .. } => true,
            ScanDescriptor::Fixed { pointers, .. } => pointers.is_empty(),
            ScanDescriptor::Array { traced, .. } => !traced,
        }
    }

    /// Size in words of the object whose image starts at `object[0]`.
    /// `None` if the image is too short to hold what the layout describes.
    pub fn size_in_words(&self, object: &[usize]) -> Option<usize> {
        let size = match *self {
            ScanDescriptor::Atomic { words } | ScanDescriptor::Fixed { words, .. } => words,
            ScanDescriptor::Array {
                prefix, len_word, ..
            } => prefix.checked_add(*object.get(len_word)?)?,
        };
        (size <= object.len()).then_some(size)
    }

    /// Calls `visit` with the word offset of every pointer field and returns
    /// the object size, or `None` for a truncated image.
    pub fn trace(&self, object: &[usize], visit: &mut dyn FnMut(usize)) -> Option<usize> {
        let size = self.size_in_words(object)?;
        match *self {
            ScanDescriptor::Atomic { .. } => {}
            ScanDescriptor::Fixed { pointers, .. } => pointers.iter().for_each(|&p| visit(p)),
            ScanDescriptor::Array { prefix, traced, .. } => {
                if traced {
                    (prefix..size).for_each(|p| visit(p));
                }
            }
        }
        Some(size)
    }
}
