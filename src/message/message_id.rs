//! Message identifiers - the closed set of domain events and requests.

use std::fmt;

/// Identifies what a [`Message`](super::Message) represents.
///
/// This is a closed enumeration, defined once process-wide. Handlers
/// declare which ids they serve, and the bus routes on the id alone -
/// payload contents never influence routing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageId {
    /// A user account was created by administration.
    UserCreated,
    /// A user account was deleted; downstream domains must revoke access.
    UserDeleted,
    /// A user was granted membership of a project.
    UserAddedToProject,
    /// A user lost membership of a project.
    UserRemovedFromProject,
    /// A user requested a fresh API token.
    UserNewApiTokenRequested,
    /// A project was created with its whitelist.
    ProjectCreated,
    /// A project was deleted; scan data for it becomes orphaned.
    ProjectDeleted,
    /// A scan job began executing.
    JobStarted,
    /// A scan job finished successfully.
    JobDone,
    /// A scan job terminated with a failure.
    JobFailed,
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}
