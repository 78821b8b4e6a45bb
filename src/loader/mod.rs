pub mod json_loader;
pub mod options;
