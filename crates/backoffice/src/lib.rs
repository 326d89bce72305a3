//! Session controller and cache-backed reads for the backoffice admin SDK.
//!
//! This crate ties the layers together: the token store
//! ([`backoffice_session`]), the authenticated query cache
//! ([`backoffice_query`]), and the typed HTTP client
//! ([`backoffice_client`]). The embedding shell (a UI, a TUI, a bot)
//! supplies [`Navigator`] and [`Notifier`] implementations and calls into
//! [`AuthController`] and the functions in [`queries`].
//!
//! Session lifecycle: `Anonymous -> (login success) -> Authenticated ->
//! (logout | 401 on any authenticated read) -> Anonymous`. The 401 path is
//! owned by the query cache and calls back into the same logout sequence
//! the controller uses, so teardown happens exactly once no matter how
//! many reads are in flight when a token dies.

pub mod controller;
pub mod keys;
pub mod queries;
pub mod shell;

pub use controller::AuthController;
pub use shell::{Destination, Navigator, NoticeKind, Notifier};

pub use backoffice_client as client;
pub use backoffice_query as query;
pub use backoffice_session as session;
