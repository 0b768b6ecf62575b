pub mod bundle;
pub mod demo;
pub mod model;
pub mod source;
pub mod summary;
