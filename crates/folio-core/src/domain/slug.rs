//! Slug and excerpt derivation.

/// Maximum number of characters kept in a derived excerpt.
pub const EXCERPT_LENGTH: usize = 160;

/// Convert text into a URL-safe slug.
///
/// Lowercases, drops anything that is not an ASCII letter, digit, `_`, `-` or
/// whitespace, collapses runs of whitespace, `_` and `-` into a single hyphen
/// and trims hyphens from both ends. Applying it twice yields the same slug.
pub fn generate_slug(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_hyphen = false;

    for c in text.trim().chars().flat_map(char::to_lowercase) {
        if c.is_whitespace() || c == '_' || c == '-' {
            pending_hyphen = true;
        } else if c.is_ascii_alphanumeric() {
            // Leading separators are dropped rather than emitted.
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(c);
        }
    }

    slug
}

/// Build a plain-text excerpt from HTML content.
///
/// Tags are removed, whitespace is collapsed and the result is cut to
/// [`EXCERPT_LENGTH`] characters with a trailing `...` when shortened.
pub fn derive_excerpt(content: &str) -> String {
    let text = collapse_whitespace(&strip_tags(content));

    if text.chars().count() <= EXCERPT_LENGTH {
        return text;
    }

    let truncated: String = text.chars().take(EXCERPT_LENGTH).collect();
    format!("{}...", truncated.trim_end())
}

fn strip_tags(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut in_tag = false;
    let mut chars = html.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            // A bare `<` (as in "1 < 2") is text, not markup.
            '<' if !in_tag && chars.peek().is_some_and(|&n| starts_tag(n)) => in_tag = true,
            '>' if in_tag => {
                in_tag = false;
                // Keep words on either side of a block tag apart.
                out.push(' ');
            }
            _ if !in_tag => out.push(c),
            _ => {}
        }
    }

    out
}

fn starts_tag(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '/' || c == '!'
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_slug_spanish_title() {
        assert_eq!(generate_slug("El Futuro de la IA!"), "el-futuro-de-la-ia");
    }

    #[test]
    fn test_generate_slug_collapses_separators() {
        assert_eq!(generate_slug("  Rust -- and __ Web   Dev "), "rust-and-web-dev");
        assert_eq!(generate_slug("---leading and trailing---"), "leading-and-trailing");
    }

    #[test]
    fn test_generate_slug_drops_non_ascii_word_chars() {
        assert_eq!(generate_slug("Diseño & Código"), "diseo-cdigo");
        assert_eq!(generate_slug("!!!"), "");
    }

    #[test]
    fn test_generate_slug_is_idempotent() {
        let samples = [
            "El Futuro de la IA!",
            "already-a-slug",
            "  Mixed_CASE with\ttabs ",
            "a--b__c  d",
            "Ünïcödé Títle 2024",
            "",
        ];

        for sample in samples {
            let once = generate_slug(sample);
            assert_eq!(generate_slug(&once), once, "not idempotent for {sample:?}");
        }
    }

    #[test]
    fn test_derive_excerpt_strips_tags() {
        assert_eq!(
            derive_excerpt("<h1>Title</h1><p>Some <strong>bold</strong> text</p>"),
            "Title Some bold text"
        );
        assert_eq!(derive_excerpt("hello world"), "hello world");
    }

    #[test]
    fn test_derive_excerpt_truncates_long_content() {
        let content = "word ".repeat(100);
        let excerpt = derive_excerpt(&content);

        assert!(excerpt.ends_with("..."));
        assert!(excerpt.chars().count() <= EXCERPT_LENGTH + 3);
    }

    #[test]
    fn test_derive_excerpt_keeps_bare_angle_brackets() {
        assert_eq!(derive_excerpt("1 < 2 is true"), "1 < 2 is true");
        assert_eq!(derive_excerpt("<p>a <3 b</p><!-- note -->"), "a <3 b");
    }
}
