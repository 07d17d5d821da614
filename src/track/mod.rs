pub mod format;
pub mod metadata;
pub mod service;
