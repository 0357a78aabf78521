//! Run-scoped data: the translation job and per-file records.

use std::fmt;

use crate::{config::Config, core::path_template};

/// Stage a file has reached in the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileStatus {
    Pending,
    Translated,
    Refined,
    Written,
    Failed,
}

impl fmt::Display for FileStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FileStatus::Pending => "pending",
            FileStatus::Translated => "translated",
            FileStatus::Refined => "refined",
            FileStatus::Written => "written",
            FileStatus::Failed => "failed",
        };
        f.write_str(s)
    }
}

/// One discovered input file and where its translation goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRecord {
    pub source_path: String,
    pub output_path: String,
    pub status: FileStatus,
    /// Why the file failed, when `status` is [`FileStatus::Failed`].
    pub failure: Option<String>,
    /// Whether the written output made it into a pushed commit.
    pub committed: bool,
}

impl FileRecord {
    pub fn new(source_path: String, output_path: String) -> Self {
        Self {
            source_path,
            output_path,
            status: FileStatus::Pending,
            failure: None,
            committed: false,
        }
    }

    /// Move to `status`. A failed record never moves again.
    pub fn advance(&mut self, status: FileStatus) {
        if self.status != FileStatus::Failed {
            self.status = status;
        }
    }

    pub fn fail(&mut self, reason: impl Into<String>) {
        self.status = FileStatus::Failed;
        self.failure = Some(reason.into());
    }

    pub fn is_written(&self) -> bool {
        self.status == FileStatus::Written
    }
}

/// Everything one run needs to know about what to translate and how.
#[derive(Debug, Clone)]
pub struct TranslationJob {
    pub target_lang: String,
    pub lang_tag: String,
    pub model: String,
    pub refine_model: Option<String>,
    pub temperature: f32,
    pub output_pattern: String,
    pub files: Vec<String>,
}

impl TranslationJob {
    pub fn new(config: &Config, files: Vec<String>) -> Self {
        Self {
            target_lang: config.target_lang.clone(),
            lang_tag: config.lang_tag(),
            model: config.model.clone(),
            refine_model: config
                .refine
                .as_ref()
                .map(|refine| refine.model.clone()),
            temperature: config.temperature,
            output_pattern: config.output_pattern.clone(),
            files,
        }
    }

    pub fn output_path(&self, source_path: &str) -> String {
        path_template::resolve(source_path, &self.output_pattern, &self.lang_tag)
    }

    /// Pending records for every file, in discovery order.
    pub fn records(&self) -> Vec<FileRecord> {
        self.files
            .iter()
            .map(|source| FileRecord::new(source.clone(), self.output_path(source)))
            .collect()
    }
}
