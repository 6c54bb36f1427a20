//! The single administrative credential pair accepted by `/login`

pub const ADMIN_LOGIN: &str = "admin";
pub const ADMIN_PASSWORD: &str = "test";

/// Exact, case-sensitive comparison against the admin pair.
pub fn credentials_match(login: &str, password: &str) -> bool {
    login == ADMIN_LOGIN && password == ADMIN_PASSWORD
}
