//! Collaborators supplied by the embedding shell.

/// Navigation destinations the session logic drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Destination {
    /// The login entry point.
    Login,
    /// The home/root view shown to an authenticated user.
    Home,
}

/// Router abstraction. The session logic only ever names a destination;
/// how navigation happens is the shell's business.
pub trait Navigator: Send + Sync {
    /// Navigate to the given destination.
    fn navigate(&self, destination: Destination);
}

/// Notification severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
}

/// Toast/notification sink.
pub trait Notifier: Send + Sync {
    /// Emit a notification.
    fn notify(&self, title: &str, message: &str, kind: NoticeKind);
}
