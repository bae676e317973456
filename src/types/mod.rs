pub mod descriptor;
pub mod ds;
pub mod instance;
pub mod plugin;
