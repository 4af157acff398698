use crate::error::{model_err, Result};
use crate::kind::{Category, TagId};
use crate::tag_space::{Boundaries, TagSpace};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CategoryClassifier {
    bounds: Boundaries,
}

impl CategoryClassifier {
    pub fn new(space: &TagSpace) -> Result<Self> {
        space.ensure_frozen("category classifier")?;
        Ok(Self::from_boundaries(space.boundaries()))
    }

    pub(crate) fn from_boundaries(bounds: Boundaries) -> Self {
        debug_assert!(bounds.is_ordered());
        Self { bounds }
    }

    pub fn boundaries(&self) -> Boundaries {
        self.bounds
    }

    #[inline]
    pub fn is_valid(&self, tag: TagId) -> bool {
        tag < self.bounds.last
    }

    #[inline]
    pub fn classify(&self, tag: TagId) -> Result<Category> {
        let b = &self.bounds;
        if tag < b.values {
            Ok(Category::CompiledSyntaxForm)
        } else if tag < b.compiled_values {
            Ok(Category::RegisteredValueOrSlot)
        } else if tag < b.last_normal {
            Ok(Category::RuntimeKind)
        } else if tag < b.last {
            Ok(Category::InternalOnly)
        } else {
            Err(model_err!(
                UnknownTag,
                "tag {tag} is outside [0, {})",
                b.last
            ))
        }
    }
}
