//! Public business slugs (`/b/{slug}` booking pages).

use std::sync::LazyLock;

use regex::Regex;

/// Longest slug we generate or accept.
pub const MAX_SLUG_LEN: usize = 60;

static NON_ALNUM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-z0-9]+").expect("static regex is valid"));

static VALID_SLUG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9]+(-[a-z0-9]+)*$").expect("static regex is valid"));

/// Turn a business name into a URL slug.
///
/// Lower-cases, folds common Latin accents, collapses every run of
/// non-alphanumerics into one `-` and trims dashes at both ends.
pub fn slugify(name: &str) -> String {
    let folded: String = name.to_lowercase().chars().map(fold_accent).collect();
    let dashed = NON_ALNUM.replace_all(&folded, "-");
    let mut slug = dashed.trim_matches('-').to_string();

    if slug.len() > MAX_SLUG_LEN {
        slug.truncate(MAX_SLUG_LEN);
        slug = slug.trim_end_matches('-').to_string();
    }
    slug
}

/// Append a numeric suffix, keeping the result within [`MAX_SLUG_LEN`].
pub fn with_suffix(slug: &str, n: u32) -> String {
    let suffix = format!("-{n}");
    let keep = MAX_SLUG_LEN.saturating_sub(suffix.len()).min(slug.len());
    format!("{}{suffix}", slug[..keep].trim_end_matches('-'))
}

pub fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty() && slug.len() <= MAX_SLUG_LEN && VALID_SLUG.is_match(slug)
}

fn fold_accent(c: char) -> char {
    match c {
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' => 'a',
        'è' | 'é' | 'ê' | 'ë' => 'e',
        'ì' | 'í' | 'î' | 'ï' => 'i',
        'ò' | 'ó' | 'ô' | 'õ' | 'ö' => 'o',
        'ù' | 'ú' | 'û' | 'ü' => 'u',
        'ç' => 'c',
        'ñ' => 'n',
        'ý' | 'ÿ' => 'y',
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slugify_basic() {
        assert_eq!(slugify("Barbearia do João"), "barbearia-do-joao");
    }

    #[test]
    fn slugify_collapses_punctuation() {
        assert_eq!(slugify("  Nails & Spa -- Centro!! "), "nails-spa-centro");
    }

    #[test]
    fn slugify_only_symbols_is_empty() {
        assert_eq!(slugify("***"), "");
    }

    #[test]
    fn slugify_truncates_without_trailing_dash() {
        let name = format!("{} salon", "a".repeat(59));
        let slug = slugify(&name);
        assert!(slug.len() <= MAX_SLUG_LEN);
        assert!(!slug.ends_with('-'));
    }

    #[test]
    fn suffix_is_appended() {
        assert_eq!(with_suffix("studio", 2), "studio-2");
        let long = "b".repeat(MAX_SLUG_LEN);
        let suffixed = with_suffix(&long, 12);
        assert_eq!(suffixed.len(), MAX_SLUG_LEN);
        assert!(suffixed.ends_with("-12"));
    }

    #[test]
    fn validity() {
        assert!(is_valid_slug("studio-ana"));
        assert!(!is_valid_slug("Studio"));
        assert!(!is_valid_slug("-studio"));
        assert!(!is_valid_slug("studio--ana"));
        assert!(!is_valid_slug(""));
    }
}
