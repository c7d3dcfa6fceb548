pub mod class;
pub mod error;
pub mod function;
pub mod namespace;
pub mod object;
pub mod object_property;
pub mod operations;
pub mod realm;
pub mod traits;
pub mod value;
pub mod vector;
pub mod xml;
pub mod xml_build;
