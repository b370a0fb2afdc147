pub mod cookies;

pub use cookies::{access_token, apply_cookies, parse_cookie_header, request_cookies, CookieNaming, SessionCookies};
