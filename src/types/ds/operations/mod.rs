pub mod collection;
pub mod type_conversion;
