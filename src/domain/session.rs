/// Route the client is sent to when the backend rejects the session.
pub const LOGIN_PATH: &str = "/login";

/// Persistent client-side session: the bearer token and the identity of the
/// logged-in user. Written by the login flow, read by the transport.
pub trait SessionStore: Send + Sync {
    fn token(&self) -> Option<String>;
    fn clear(&self);
}

/// Performs a hard navigation, e.g. back to the login entry point.
pub trait Navigator: Send + Sync {
    fn navigate(&self, path: &str);
}
