pub mod bean_instance;
pub mod conversion;
pub mod wrapper;
