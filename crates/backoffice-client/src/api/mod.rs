//! API endpoint implementations.

mod auth;
mod items;
mod users;

pub use auth::AuthApi;
pub use items::ItemsApi;
pub use users::UsersApi;
