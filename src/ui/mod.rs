/// Browser-facing surface: control declarations, the static page, and the
/// HTTP routes that feed it.
pub mod layout;
pub mod page;
pub mod server;
