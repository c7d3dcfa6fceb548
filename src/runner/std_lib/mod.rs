//! Standard library built-in classes.
//!
//! XML, XMLList, `Vector.<T>`, String and Namespace are defined through the
//! same class machinery as user classes, so their methods resolve like any
//! other trait.

pub mod core;
pub mod namespace;
pub mod string;
pub mod vector;
pub mod xml;
pub mod xml_list;

pub use self::core::create_intrinsics;
