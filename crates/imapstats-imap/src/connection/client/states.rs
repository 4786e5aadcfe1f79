//! Type-state markers.

/// Connected, greeting read, not logged in.
#[derive(Debug, Clone, Copy, Default)]
pub struct NotAuthenticated;

/// Logged in; mailbox selection is allowed.
#[derive(Debug, Clone, Copy, Default)]
pub struct Authenticated;

/// A mailbox is selected; SEARCH and FETCH are allowed.
#[derive(Debug, Clone, Copy, Default)]
pub struct Selected;
