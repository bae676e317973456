pub mod class_path;
pub mod config;
pub mod registry;
pub mod resolver;
