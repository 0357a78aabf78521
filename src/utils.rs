//! Common utility functions shared across the codebase.

/// Derives the language tag used in output paths from a target language name.
///
/// Lower-cases the name and replaces spaces and hyphens with underscores.
///
/// # Examples
///
/// ```
/// use doctrans::utils::lang_tag;
///
/// assert_eq!(lang_tag("Simplified-Chinese"), "simplified_chinese");
/// assert_eq!(lang_tag("Brazilian Portuguese"), "brazilian_portuguese");
/// assert_eq!(lang_tag("fr"), "fr");
/// ```
pub fn lang_tag(target_lang: &str) -> String {
    target_lang.trim().to_lowercase().replace([' ', '-'], "_")
}

/// Masks a secret for display, keeping only the last four characters.
///
/// # Examples
///
/// ```
/// use doctrans::utils::mask_secret;
///
/// assert_eq!(mask_secret("sk-abcdef1234"), "********1234");
/// assert_eq!(mask_secret("abc"), "********");
/// ```
pub fn mask_secret(secret: &str) -> String {
    let chars: Vec<char> = secret.chars().collect();
    if chars.len() > 4 {
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("********{}", tail)
    } else {
        "********".to_string()
    }
}

/// Picks the singular or plural noun for a count.
pub fn pluralize<'a>(count: usize, singular: &'a str, plural: &'a str) -> &'a str {
    if count == 1 { singular } else { plural }
}

/// Converts a relative path into a forward-slash string.
///
/// Output paths and PR tables always use `/` regardless of platform.
pub fn to_slash_path(path: &std::path::Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
