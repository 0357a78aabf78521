pub mod plan;
pub mod translate;
