pub mod annotations;
pub mod class;
pub mod element;
pub mod error;
pub mod object;
pub mod operations;
pub mod simple_type;
pub mod value;
pub mod virtual_object;
