use std::any::Any;

use crate::error::{model_err, Result};
use crate::kind::TagId;
use crate::tag_space::TagSpace;

/// Header word carried by every heap allocation. The tag is written once by
/// [`ObjectHeader::stamp`] and never changes afterwards.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct ObjectHeader {
    tag: TagId,
}

const _: () = assert!(std::mem::size_of::<ObjectHeader>() == std::mem::size_of::<u32>());
const _: () = assert!(std::mem::align_of::<ObjectHeader>() == std::mem::align_of::<u32>());

impl ObjectHeader {
    /// Stamps a header for a new allocation of kind `tag`. `space` must be
    /// frozen; reserved boundary slots never name a real object.
    pub fn stamp(space: &TagSpace, tag: TagId) -> Result<Self> {
        space.ensure_frozen("object header")?;
        if !space.is_valid(tag) {
            return Err(model_err!(
                InvalidKind,
                "cannot allocate tag {tag}: outside [0, {})",
                space.last()
            ));
        }
        if let Some(boundary) = space.boundary_at(tag) {
            return Err(model_err!(
                InvalidKind,
                "cannot allocate tag {tag}: reserved for the {} boundary",
                boundary.as_str()
            ));
        }
        Ok(Self { tag })
    }

    #[inline]
    pub fn tag(&self) -> TagId {
        self.tag
    }
}

pub trait HeapObject: Any {
    fn header(&self) -> ObjectHeader;

    fn as_any(&self) -> &dyn Any;

    fn tag(&self) -> TagId {
        self.header().tag()
    }
}
