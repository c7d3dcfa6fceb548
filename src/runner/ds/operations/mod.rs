pub mod property;
pub mod type_conversion;
