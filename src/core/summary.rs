//! Pull request title and body rendering.

use std::{fmt::Write, sync::LazyLock};

use regex::Regex;

use crate::{core::records::FileRecord, llm::TranslationStatistics, utils::pluralize};

pub const WIP_MARKER: &str = "[WIP]";

static WIP_PREFIX_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*\[WIP\]\s*").unwrap());
static PROGRESS_SUFFIX_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*\(\d+/\d+\)\s*$").unwrap());

/// `[WIP] {title} (done/total)`.
pub fn draft_title(title: &str, done: usize, total: usize) -> String {
    format!("{} {} ({}/{})", WIP_MARKER, final_title(title), done, total)
}

/// `title` without a `[WIP]` marker or progress suffix.
pub fn final_title(title: &str) -> String {
    let title = WIP_PREFIX_REGEX.replace(title, "");
    PROGRESS_SUFFIX_REGEX.replace(&title, "").trim().to_string()
}

pub fn placeholder_commit_message(target_lang: &str) -> String {
    format!("Start translation to {}", target_lang)
}

/// What the pull request body reports at one point in the run.
#[derive(Debug, Clone)]
pub struct Summary<'a> {
    pub target_lang: &'a str,
    pub records: &'a [FileRecord],
    /// Files attempted so far, failed ones included.
    pub processed: usize,
    pub total: usize,
    pub stats: TranslationStatistics,
    pub model: &'a str,
    pub refine_model: Option<&'a str>,
}

impl Summary<'_> {
    pub fn written(&self) -> impl Iterator<Item = &FileRecord> {
        self.records.iter().filter(|record| record.is_written())
    }

    pub fn written_count(&self) -> usize {
        self.written().count()
    }

    /// Markdown body. `in_progress` adds the progress line.
    pub fn body(&self, in_progress: bool) -> String {
        let written = self.written_count();
        let mut body = String::new();

        let _ = writeln!(
            body,
            "## ✅ Translated to {} - {} {}",
            self.target_lang,
            written,
            pluralize(written, "file", "files")
        );
        body.push('\n');
        body.push_str("| **Source** | **Output** | **Language** |\n");
        body.push_str("| :--- | :--- | :--- |\n");
        for record in self.written() {
            let _ = writeln!(
                body,
                "| `{}` | `{}` | {} |",
                record.source_path, record.output_path, self.target_lang
            );
        }

        if in_progress {
            let _ = write!(body, "\nProgress: {}/{} files\n", self.processed, self.total);
        }

        body.push_str("\n### Translation statistics\n\n");
        let _ = writeln!(body, "- Model: `{}`", self.model);
        if let Some(refine_model) = self.refine_model {
            let _ = writeln!(body, "- Refinement model: `{}`", refine_model);
        }
        let _ = writeln!(body, "- API calls: {}", self.stats.api_calls);
        let _ = writeln!(body, "- Input tokens: {}", self.stats.input_tokens);
        let _ = writeln!(body, "- Output tokens: {}", self.stats.output_tokens);
        body
    }

    /// Draft title while files remain, the plain title once done.
    pub fn title(&self, title: &str, in_progress: bool) -> String {
        if in_progress {
            draft_title(title, self.processed, self.total)
        } else {
            final_title(title)
        }
    }
}
