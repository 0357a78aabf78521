//! YAML front matter handling for Markdown documents.
//!
//! The front matter block is kept out of the text sent to the model and
//! reattached verbatim to the translated body.

use std::path::Path;

/// A Markdown document split into its front matter and body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitDocument<'a> {
    /// The raw block including both `---` delimiter lines, or `None`.
    pub front_matter: Option<&'a str>,
    pub body: &'a str,
}

impl SplitDocument<'_> {
    /// Reattach the front matter to a (translated) body.
    pub fn reattach(&self, translated_body: &str) -> String {
        match self.front_matter {
            Some(header) => format!("{}{}", header, translated_body),
            None => translated_body.to_string(),
        }
    }
}

/// Whether front matter splitting applies to this file.
pub fn applies_to(path: &str) -> bool {
    Path::new(path)
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("md"))
}

/// Split a leading `---` delimited YAML block off `text`.
///
/// The block only counts as front matter when it is non-empty, closed, and
/// parses as YAML. Otherwise the whole text is the body.
pub fn split(text: &str) -> SplitDocument<'_> {
    let whole = SplitDocument {
        front_matter: None,
        body: text,
    };

    let Some(first_end) = text.find('\n') else {
        return whole;
    };
    if text[..first_end].trim_end() != "---" {
        return whole;
    }

    let mut offset = first_end + 1;
    let mut yaml_end = None;
    for line in text[offset..].split_inclusive('\n') {
        if line.trim_end() == "---" {
            yaml_end = Some((offset, offset + line.len()));
            break;
        }
        offset += line.len();
    }

    let Some((yaml_stop, header_end)) = yaml_end else {
        return whole;
    };

    let yaml = &text[first_end + 1..yaml_stop];
    if yaml.trim().is_empty() || serde_yaml::from_str::<serde_yaml::Value>(yaml).is_err() {
        return whole;
    }

    SplitDocument {
        front_matter: Some(&text[..header_end]),
        body: &text[header_end..],
    }
}
