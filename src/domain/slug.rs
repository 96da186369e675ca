//! Slug derivation for human-readable names.
//!
//! Categories are created with a lowercase, strict slug, while category renames and
//! products use the default options. Both call-sites go through [`slugify`] so the
//! difference is visible at the caller.

/// Options controlling how a slug is derived.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SlugOptions {
    /// Lowercase the result.
    pub lower: bool,
    /// Keep only ASCII letters, digits and separators.
    pub strict: bool,
}

impl SlugOptions {
    /// Lowercase + strict, used when a category is first created.
    pub const STRICT_LOWER: SlugOptions = SlugOptions {
        lower: true,
        strict: true,
    };
}

const REPLACEMENT: char = '-';

// Punctuation that survives the default removal pass.
const KEPT_PUNCTUATION: &[char] = &['$', '*', '_', '+', '~', '.', '(', ')', '\'', '"', '!', '-', ':', '@'];

fn kept_by_default(c: char) -> bool {
    c.is_ascii_alphanumeric() || c.is_whitespace() || KEPT_PUNCTUATION.contains(&c)
}

/// Derives a URL-safe slug from `input`.
///
/// Existing `-` separators are treated as whitespace, runs of whitespace collapse into
/// a single `-`, and leading/trailing whitespace is trimmed before joining.
pub fn slugify(input: &str, options: SlugOptions) -> String {
    let mut cleaned = String::with_capacity(input.len());
    for c in input.chars() {
        let c = if c == REPLACEMENT { ' ' } else { c };
        if !kept_by_default(c) {
            continue;
        }
        if options.strict && !(c.is_ascii_alphanumeric() || c.is_whitespace()) {
            continue;
        }
        cleaned.push(c);
    }

    let slug = cleaned
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(&REPLACEMENT.to_string());

    if options.lower {
        slug.to_lowercase()
    } else {
        slug
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strict_lower_strips_punctuation() {
        assert_eq!(slugify("Men's Shoes & Boots!", SlugOptions::STRICT_LOWER), "mens-shoes-boots");
    }

    #[test]
    fn default_keeps_case_and_safe_punctuation() {
        assert_eq!(slugify("Men's Shoes & Boots!", SlugOptions::default()), "Men's-Shoes-Boots!");
    }

    #[test]
    fn collapses_whitespace_and_existing_hyphens() {
        assert_eq!(slugify("  Smart  -  Phones ", SlugOptions::default()), "Smart-Phones");
        assert_eq!(slugify("a--b", SlugOptions::STRICT_LOWER), "a-b");
    }

    #[test]
    fn drops_non_ascii() {
        assert_eq!(slugify("Café Crème", SlugOptions::STRICT_LOWER), "caf-crme");
    }

    #[test]
    fn create_and_rename_policies_differ() {
        let name = "Home Decor";
        assert_ne!(
            slugify(name, SlugOptions::STRICT_LOWER),
            slugify(name, SlugOptions::default())
        );
    }
}
