//! Built-in classes owned by an evaluation context.

use crate::runner::ds::class::ClassRef;
use crate::runner::ds::vector::ElementType;

pub struct Intrinsics {
    pub xml: ClassRef,
    pub xml_list: ClassRef,
    pub string: ClassRef,
    pub namespace: ClassRef,
    pub vector_number: ClassRef,
    pub vector_int: ClassRef,
    pub vector_uint: ClassRef,
    pub vector_string: ClassRef,
    pub vector_any: ClassRef,
}

impl Intrinsics {
    /// The `Vector.<T>` class for an element type.
    pub fn vector(&self, element_type: ElementType) -> &ClassRef {
        match element_type {
            ElementType::Number => &self.vector_number,
            ElementType::Int => &self.vector_int,
            ElementType::Uint => &self.vector_uint,
            ElementType::String => &self.vector_string,
            ElementType::Any => &self.vector_any,
        }
    }
}
