use axum::extract::{FromRef, FromRequestParts};
use axum::http::request::Parts;
use axum_extra::extract::cookie::{Cookie, Key, SameSite, SignedCookieJar};
use serde::Serialize;
use std::convert::Infallible;

/// Name of the signed session cookie
pub const SESSION_COOKIE: &str = "cinelog_session";

/// How long a session cookie stays valid before the browser drops it
const SESSION_TTL: time::Duration = time::Duration::hours(24);

/// The identity carried by the session cookie: at most a user id and the
/// matching username
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionUser {
    pub user_id: i64,
    pub username: String,
}

impl SessionUser {
    /// Cookie payload, `<user_id>:<username>`
    ///
    /// The id comes first so usernames may contain any character, `:`
    /// included.
    fn encode(&self) -> String {
        format!("{}:{}", self.user_id, self.username)
    }

    fn decode(value: &str) -> Option<Self> {
        let (user_id, username) = value.split_once(':')?;
        Some(Self {
            user_id: user_id.parse().ok()?,
            username: username.to_string(),
        })
    }
}

/// Client-side session backed by a signed cookie
///
/// There is no server-side session table: the cookie itself holds the
/// identity, signed with the key from [`crate::config::Config`]. A request
/// without a cookie, or with one that fails signature verification or
/// decoding, is anonymous.
pub struct Session {
    jar: SignedCookieJar,
}

impl Session {
    pub fn new(jar: SignedCookieJar) -> Self {
        Self { jar }
    }

    /// The current user, if the request carried a valid session cookie
    pub fn user(&self) -> Option<SessionUser> {
        let cookie = self.jar.get(SESSION_COOKIE)?;
        SessionUser::decode(cookie.value())
    }

    /// Starts a session; the returned jar must be included in the response
    pub fn log_in(self, user: &SessionUser) -> SignedCookieJar {
        let cookie = Cookie::build((SESSION_COOKIE, user.encode()))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .max_age(SESSION_TTL);

        self.jar.add(cookie)
    }

    /// Ends the session regardless of whether one was active
    pub fn log_out(self) -> SignedCookieJar {
        self.jar.remove(Cookie::build(SESSION_COOKIE).path("/"))
    }
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for Session
where
    S: Send + Sync,
    Key: FromRef<S>,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let jar = SignedCookieJar::from_request_parts(parts, state).await?;
        Ok(Session::new(jar))
    }
}
