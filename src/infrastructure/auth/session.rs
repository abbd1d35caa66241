use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use time::Duration;

pub const AUTH_COOKIE: &str = "auth_token";

/// Attach the session cookie carrying `token`
pub fn with_session_cookie(jar: CookieJar, token: String, lifetime_hours: i64, secure: bool) -> CookieJar {
    let cookie = Cookie::build((AUTH_COOKIE, token))
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .path("/")
        .max_age(Duration::hours(lifetime_hours))
        .build();

    jar.add(cookie)
}

/// Expire the session cookie
pub fn without_session_cookie(jar: CookieJar) -> CookieJar {
    jar.remove(Cookie::build(AUTH_COOKIE).path("/").build())
}
