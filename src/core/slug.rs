//! Slug generation for named documents

/// Turn a display name into a URL-safe slug.
///
/// ASCII letters and digits are lowercased and kept; every other run of
/// characters collapses into a single `-`. Leading and trailing dashes are
/// dropped.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_dash = false;

    for ch in name.chars() {
        if ch.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(ch.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }

    slug
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify_basic() {
        assert_eq!(slugify("Intro Cinematic"), "intro-cinematic");
        assert_eq!(slugify("  Hero's   Journey!! "), "hero-s-journey");
        assert_eq!(slugify("Level_2 -- Outro"), "level-2-outro");
    }

    #[test]
    fn test_slugify_empty() {
        assert_eq!(slugify(""), "");
        assert_eq!(slugify("***"), "");
    }
}
