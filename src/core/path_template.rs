//! Output path templating.
//!
//! Maps an input file path to its output path using the configured output
//! pattern. Three pattern shapes are supported:
//!
//! - **Fixed**: no `*` at all. Every input maps to the pattern itself, so later
//!   files overwrite earlier ones.
//! - **Mirror**: contains `**`. The text before `**` is the base directory and the
//!   input's directory structure is preserved below it, minus the leading segments
//!   it shares with the base directory and one more (the source-language marker,
//!   e.g. `en`). Anything after `**` is ignored.
//! - **Substitution**: contains `*` but not `**`. `*`, `{name}`, `{ext}` and
//!   `{lang}` are replaced textually.
//!
//! Resolution never fails; unknown placeholders are left as written.

use std::path::Path;

/// Resolve the output path for `input_path`.
///
/// `lang_tag` is the already-normalized language tag (see [`crate::utils::lang_tag`]).
///
/// # Examples
///
/// ```
/// use doctrans::core::path_template::resolve;
///
/// assert_eq!(resolve("docs/en/a/b.md", "docs/cn/**", "simplified_chinese"), "docs/cn/a/b.md");
/// assert_eq!(resolve("README.md", "README.{lang}.md", "fr"), "README.{lang}.md");
/// assert_eq!(resolve("README.md", "i18n/*", "fr"), "i18n/README.md");
/// ```
pub fn resolve(input_path: &str, pattern: &str, lang_tag: &str) -> String {
    if !pattern.contains('*') {
        return pattern.to_string();
    }

    if let Some(index) = pattern.find("**") {
        let base_dir = pattern[..index].trim_end_matches('/');
        return mirror(input_path, base_dir);
    }

    substitute(input_path, pattern, lang_tag)
}

/// Splice the input's relative structure onto `base_dir`.
fn mirror(input_path: &str, base_dir: &str) -> String {
    let input_parts: Vec<&str> = input_path.split('/').collect();

    if base_dir.contains('/') {
        let common = base_dir
            .split('/')
            .zip(input_parts.iter())
            .take_while(|(base, input)| base == *input)
            .count();

        if common > 0 {
            let skip = (common + 1).min(input_parts.len() - 1);
            return join(base_dir, &input_parts[skip..].join("/"));
        }
    }

    if input_parts.len() > 1 {
        return join(base_dir, &input_parts[1..].join("/"));
    }

    let file_name = Path::new(input_path)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| input_path.to_string());
    join(base_dir, &file_name)
}

fn join(base_dir: &str, relative: &str) -> String {
    if base_dir.is_empty() {
        relative.to_string()
    } else {
        format!("{}/{}", base_dir, relative)
    }
}

fn substitute(input_path: &str, pattern: &str, lang_tag: &str) -> String {
    let path = Path::new(input_path);
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let stem = path
        .file_stem()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let ext = path
        .extension()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    pattern
        .replace('*', &file_name)
        .replace("{name}", &stem)
        .replace("{ext}", &ext)
        .replace("{lang}", lang_tag)
}
