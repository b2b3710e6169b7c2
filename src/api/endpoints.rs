//! Backend routes, relative to the configured base URL.

pub const LOGIN: &str = "/login";
pub const SIGNUP: &str = "/signup";
pub const REFRESH: &str = "/refresh";
pub const LOGOUT: &str = "/logout";

pub const NOTIFICATIONS: &str = "/poll/notifications";

pub fn approve_notification(id: &str) -> String {
    format!("{}/{}/approve", NOTIFICATIONS, id)
}

pub fn reject_notification(id: &str) -> String {
    format!("{}/{}/reject", NOTIFICATIONS, id)
}

pub const ADMIN_USERS: &str = "/admin/users";

pub const SHEET_FETCH: &str = "/sheet/fetch";
pub const SHEET_CREATE: &str = "/sheet/create";
pub const SHEET_DELETE: &str = "/sheet/delete";

pub const POLL_FETCH: &str = "/client/fetch";
pub const POLL_ADMIN_FETCH: &str = "/admin/fetch";
pub const POLL_SUBMIT: &str = "/submit";
pub const POLL_CREATE: &str = "/create";
