pub mod file;
pub mod progress;
pub mod reporter;
pub mod single;
pub mod size;
