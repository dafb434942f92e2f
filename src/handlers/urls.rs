//! Named routes. Path patterns are used when building the router, the
//! functions when linking to a page.

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

pub const HOME: &str = "/";
pub const LIST: &str = "/notes/";
pub const DETAIL: &str = "/note/{slug}/";
pub const ADD: &str = "/add/";
pub const EDIT: &str = "/edit/{slug}/";
pub const DELETE: &str = "/delete/{slug}/";
pub const SUCCESS: &str = "/done/";
pub const LOGIN: &str = "/auth/login/";
pub const LOGOUT: &str = "/auth/logout/";
pub const SIGNUP: &str = "/auth/signup/";

pub fn detail(slug: &str) -> String {
    format!("/note/{slug}/")
}

pub fn edit(slug: &str) -> String {
    format!("/edit/{slug}/")
}

pub fn delete(slug: &str) -> String {
    format!("/delete/{slug}/")
}

/// Login page that sends the user back to `next` afterwards.
pub fn login_with_next(next: &str) -> String {
    format!("{LOGIN}?next={}", quote(next))
}

/// Everything except unreserved characters and `/` is percent-encoded.
const NEXT_PARAM: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~')
    .remove(b'/');

pub fn quote(value: &str) -> String {
    utf8_percent_encode(value, NEXT_PARAM).to_string()
}

/// Only local absolute paths are followed after login. Browsers drop tab, CR
/// and LF from URLs, so any control character is refused.
pub fn is_safe_redirect(target: &str) -> bool {
    target.starts_with('/')
        && !target.starts_with("//")
        && !target.contains('\\')
        && !target.chars().any(|c| c.is_ascii_control())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_note_urls() {
        assert_eq!(detail("slug"), "/note/slug/");
        assert_eq!(edit("slug"), "/edit/slug/");
        assert_eq!(delete("slug"), "/delete/slug/");
    }

    #[test]
    fn login_keeps_slashes_in_next() {
        assert_eq!(login_with_next("/edit/slug/"), "/auth/login/?next=/edit/slug/");
        assert_eq!(
            login_with_next("/notes/?page=2&x=y"),
            "/auth/login/?next=/notes/%3Fpage%3D2%26x%3Dy"
        );
    }

    #[test]
    fn quotes_non_ascii() {
        assert_eq!(quote("/ё/"), "/%D1%91/");
    }

    #[test]
    fn rejects_offsite_redirects() {
        assert!(is_safe_redirect("/notes/"));
        assert!(!is_safe_redirect("//evil.example"));
        assert!(!is_safe_redirect("https://evil.example"));
        assert!(!is_safe_redirect("/\\evil.example"));
        assert!(!is_safe_redirect(""));
        assert!(!is_safe_redirect("/\t/evil.example/"));
        assert!(!is_safe_redirect("/\r\n/evil.example/"));
        assert!(!is_safe_redirect("/notes/\0"));
    }
}
