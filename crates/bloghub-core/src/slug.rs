//! Slug generation for post and category identity.

/// Normalize free text into a URL-safe slug.
///
/// The text is lowercased, characters other than ASCII letters, digits,
/// whitespace, `_` and `-` are dropped, and every run of whitespace, `_` or
/// `-` becomes a single hyphen. Leading and trailing hyphens never appear.
///
/// The result is either empty or matches `[a-z0-9]+(-[a-z0-9]+)*`. An empty
/// result is not a usable slug; see [`require_slug`].
///
/// ```
/// use bloghub_core::slug::slugify;
///
/// assert_eq!(slugify("Hello, World!"), "hello-world");
/// assert_eq!(slugify("  multiple   spaces "), "multiple-spaces");
/// ```
pub fn slugify(input: &str) -> String {
    let mut slug = String::with_capacity(input.len());
    let mut separator = false;

    for c in input.chars().flat_map(char::to_lowercase) {
        if c.is_ascii_alphanumeric() {
            if separator && !slug.is_empty() {
                slug.push('-');
            }
            separator = false;
            slug.push(c);
        } else if c.is_whitespace() || c == '_' || c == '-' {
            separator = true;
        }
    }

    slug
}

/// Check that `slug` already is in canonical form.
pub fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty() && slugify(slug) == slug
}

/// Derive a slug from `source`, rejecting text that yields nothing usable.
pub fn require_slug(source: &str) -> Option<String> {
    let slug = slugify(source);
    (!slug.is_empty()).then_some(slug)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_punctuation_is_dropped() {
        assert_eq!(slugify("Hello, World!"), "hello-world");
        assert_eq!(slugify("C++ & Rust: a love story"), "c-rust-a-love-story");
        assert_eq!(slugify("don't"), "dont");
    }

    #[test]
    fn test_separator_runs_collapse() {
        assert_eq!(slugify("  multiple   spaces "), "multiple-spaces");
        assert_eq!(slugify("snake_case__name"), "snake-case-name");
        assert_eq!(slugify("--already-hyphenated--"), "already-hyphenated");
        assert_eq!(slugify("tabs\tand\nnewlines"), "tabs-and-newlines");
    }

    #[test]
    fn test_symbol_between_separators_leaves_one_hyphen() {
        assert_eq!(slugify("a ! b"), "a-b");
        assert_eq!(slugify("a!b"), "ab");
    }

    #[test]
    fn test_non_ascii_letters_are_removed() {
        assert_eq!(slugify("Café Crème"), "caf-crme");
    }

    #[test]
    fn test_empty_and_symbol_only_input() {
        assert_eq!(slugify(""), "");
        assert_eq!(slugify("???"), "");
        assert_eq!(slugify(" - _ "), "");
        assert_eq!(require_slug("???"), None);
        assert_eq!(require_slug("Tech"), Some("tech".to_string()));
    }

    #[test]
    fn test_slugify_is_idempotent() {
        for input in ["Hello World v2", "  x__y--z  ", "2024: Year in Review", ""] {
            let once = slugify(input);
            assert_eq!(slugify(&once), once);
            assert_eq!(slugify(input), once);
        }
    }

    #[test]
    fn test_is_valid_slug() {
        assert!(is_valid_slug("hello-world"));
        assert!(is_valid_slug("v2"));
        assert!(!is_valid_slug(""));
        assert!(!is_valid_slug("Hello-World"));
        assert!(!is_valid_slug("hello--world"));
        assert!(!is_valid_slug("-hello"));
        assert!(!is_valid_slug("hello world"));
    }
}
