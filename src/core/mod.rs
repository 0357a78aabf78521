//! Core translation pipeline.
//!
//! - `discovery`: expand the input list into files
//! - `path_template`: map an input path to its output path
//! - `front_matter`: keep YAML front matter out of the model's way
//! - `records`: the run's job and per-file records
//! - `summary`: pull request title and body
//! - `workflow`: the sequential run tying it all together

pub mod discovery;
pub mod front_matter;
pub mod path_template;
pub mod records;
pub mod summary;
pub mod workflow;

pub use records::{FileRecord, FileStatus, TranslationJob};
pub use workflow::{Event, Reporter, RunReport, Workflow};
