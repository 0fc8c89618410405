pub mod container;
pub mod version;
