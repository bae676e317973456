pub mod bean_type;
pub mod constraint;
pub mod defined_type;
pub mod simple_bean_type;
