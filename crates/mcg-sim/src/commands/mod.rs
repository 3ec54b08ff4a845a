pub mod analyze;
pub mod decompose;
pub mod graph;
pub mod version;
