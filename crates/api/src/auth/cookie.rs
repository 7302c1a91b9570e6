//! The `agendizo_session` cookie.

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use time::Duration;

pub const SESSION_COOKIE: &str = "agendizo_session";

/// Cookie carrying a session token.
pub fn session_cookie(token: String, max_age_secs: i64, secure: bool) -> Cookie<'static> {
    build(token, Duration::seconds(max_age_secs), secure)
}

/// Cookie that expires the session cookie in the browser.
pub fn clear_session_cookie(secure: bool) -> Cookie<'static> {
    build(String::new(), Duration::ZERO, secure)
}

fn build(value: String, max_age: Duration, secure: bool) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, value))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .max_age(max_age)
        .secure(secure)
        .build()
}

/// The session token sent by the browser, if any.
pub fn session_token(jar: &CookieJar) -> Option<String> {
    jar.get(SESSION_COOKIE)
        .map(|cookie| cookie.value().to_string())
        .filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::header::COOKIE;
    use axum::http::{HeaderMap, HeaderValue};

    fn jar(header: &'static str) -> CookieJar {
        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_static(header));
        CookieJar::from_headers(&headers)
    }

    #[test]
    fn cookie_attributes() {
        let cookie = session_cookie("abc.def".into(), 60, true);
        assert_eq!(cookie.name(), SESSION_COOKIE);
        assert_eq!(cookie.value(), "abc.def");
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::Lax));
        assert_eq!(cookie.max_age(), Some(Duration::seconds(60)));

        let rendered = cookie.to_string();
        assert!(rendered.starts_with("agendizo_session=abc.def"));
        assert!(rendered.contains("Secure"));
        assert!(rendered.contains("Path=/"));
    }

    #[test]
    fn clearing_sets_zero_max_age() {
        let rendered = clear_session_cookie(false).to_string();
        assert!(rendered.starts_with("agendizo_session=;"));
        assert!(rendered.contains("Max-Age=0"));
        assert!(!rendered.contains("Secure"));
    }

    #[test]
    fn reads_named_cookie_among_others() {
        assert_eq!(
            session_token(&jar("theme=dark; agendizo_session=tok")).as_deref(),
            Some("tok")
        );
        assert_eq!(session_token(&jar("theme=dark")), None);
    }

    #[test]
    fn empty_cookie_is_absent() {
        assert_eq!(session_token(&jar("agendizo_session=")), None);
    }
}
