//! Slug derivation for note titles.
//!
//! Cyrillic titles are transliterated to Latin before slugification so that
//! `"Название заметки"` becomes `"nazvanie-zametki"`.

pub const SLUG_MAX_LENGTH: usize = 100;

fn transliterate(c: char) -> Option<&'static str> {
    let latin = match c.to_lowercase().next().unwrap_or(c) {
        'а' => "a",
        'б' => "b",
        'в' => "v",
        'г' => "g",
        'д' => "d",
        'е' => "e",
        'ё' => "yo",
        'ж' => "zh",
        'з' => "z",
        'и' => "i",
        'й' => "j",
        'к' => "k",
        'л' => "l",
        'м' => "m",
        'н' => "n",
        'о' => "o",
        'п' => "p",
        'р' => "r",
        'с' => "s",
        'т' => "t",
        'у' => "u",
        'ф' => "f",
        'х' => "h",
        'ц' => "ts",
        'ч' => "ch",
        'ш' => "sh",
        'щ' => "sch",
        'ъ' | 'ь' => "",
        'ы' => "y",
        'э' => "e",
        'ю' => "yu",
        'я' => "ya",
        _ => return None,
    };
    Some(latin)
}

/// Builds a URL-safe slug from arbitrary text.
///
/// Output contains only lowercase ASCII letters, digits, `_` and `-`, and is
/// cut to [`SLUG_MAX_LENGTH`] characters.
pub fn slugify(value: &str) -> String {
    let mut ascii = String::with_capacity(value.len());
    for c in value.chars() {
        if let Some(latin) = transliterate(c) {
            ascii.push_str(latin);
        } else if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
            ascii.push(c.to_ascii_lowercase());
        } else if c.is_whitespace() {
            ascii.push(' ');
        }
    }

    let mut slug = String::with_capacity(ascii.len());
    let mut pending_separator = false;
    for c in ascii.chars() {
        if c == ' ' || c == '-' {
            pending_separator = true;
            continue;
        }
        if pending_separator && !slug.is_empty() {
            slug.push('-');
        }
        pending_separator = false;
        slug.push(c);
    }

    let slug = slug.trim_matches(|c| c == '-' || c == '_');
    slug.chars().take(SLUG_MAX_LENGTH).collect()
}

/// Reports whether `value` is an acceptable user-supplied slug.
pub fn is_valid_slug(value: &str) -> bool {
    !value.is_empty()
        && value.chars().count() <= SLUG_MAX_LENGTH
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transliterates_cyrillic_title() {
        assert_eq!(slugify("Название заметки"), "nazvanie-zametki");
    }

    #[test]
    fn handles_multi_letter_sounds() {
        assert_eq!(slugify("Щука и ёж"), "schuka-i-yozh");
        assert_eq!(slugify("Подъезд"), "podezd");
    }

    #[test]
    fn collapses_separators_and_punctuation() {
        assert_eq!(slugify("  Hello,   World -- again! "), "hello-world-again");
        assert_eq!(slugify("snake_case stays"), "snake_case-stays");
    }

    #[test]
    fn strips_everything_unknown() {
        assert_eq!(slugify("!!!"), "");
        assert_eq!(slugify("日本語"), "");
    }

    #[test]
    fn truncates_long_titles() {
        let title = "a".repeat(250);
        assert_eq!(slugify(&title).len(), SLUG_MAX_LENGTH);
    }

    #[test]
    fn validates_user_slugs() {
        assert!(is_valid_slug("slug_1"));
        assert!(is_valid_slug("my-note"));
        assert!(!is_valid_slug(""));
        assert!(!is_valid_slug("with space"));
        assert!(!is_valid_slug("заметка"));
        assert!(!is_valid_slug(&"x".repeat(SLUG_MAX_LENGTH + 1)));
    }
}
