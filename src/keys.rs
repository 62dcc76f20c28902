//! Standard data keys and payload types of the scanning platform.
//!
//! Every domain speaks through the same small set of payload shapes; the
//! keys defined here name which shape a message slot carries and which
//! codec moves it across the serialization boundary. Keys are defined
//! once at process start through [`StandardKeys::define`].

use serde::{Deserialize, Serialize};

use crate::message::{DataKey, DataKeyError, DataKeyRegistry};

/// User-related payload: carried by signup, creation, deletion and
/// project-membership messages. Which fields are populated depends on the
/// message - membership messages carry `project_id`, creation carries
/// `roles`, and so on.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserData {
    pub user_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub roles: Vec<String>,
}

/// Project-related payload: id plus the URI whitelist scans are allowed
/// to touch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectData {
    pub project_id: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub whitelist: Vec<String>,
}

/// Scan-job payload: carried by job lifecycle messages.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobData {
    pub job_uuid: String,
    pub project_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    /// RFC 3339 timestamp of the lifecycle transition.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub since: Option<String>,
    /// The job's scan configuration, as submitted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub configuration: Option<serde_json::Value>,
}

/// The canonical key set used by the platform's domains.
///
/// Defined in one pass over a fresh registry so a name collision anywhere
/// aborts initialization.
///
/// ## Example
///
/// ```
/// use domainbus::{DataKeyRegistry, StandardKeys};
///
/// let mut registry = DataKeyRegistry::new();
/// let keys = StandardKeys::define(&mut registry).unwrap();
/// assert_eq!(keys.job_started_data.name(), "job.started.data");
/// ```
#[derive(Debug)]
pub struct StandardKeys {
    /// Base URL of the running system, for links in notifications.
    pub environment_base_url: DataKey<String>,
    /// User id of the administrator who triggered the operation.
    pub executed_by: DataKey<String>,
    /// Must contain user id, email and initial roles.
    pub user_creation_data: DataKey<UserData>,
    /// Must contain user id and email.
    pub user_delete_data: DataKey<UserData>,
    /// Must contain user id, hashed token material and email.
    pub user_api_token_data: DataKey<UserData>,
    /// Contains user id + project id for membership changes.
    pub project_to_user_data: DataKey<UserData>,
    /// Must contain project id and whitelist entries.
    pub project_creation_data: DataKey<ProjectData>,
    /// Must contain project id of the removed project.
    pub project_delete_data: DataKey<ProjectData>,
    /// Must contain job uuid, project id, configuration, owner, since.
    pub job_started_data: DataKey<JobData>,
    /// Must contain job uuid, since.
    pub job_done_data: DataKey<JobData>,
    /// Must contain job uuid, since.
    pub job_failed_data: DataKey<JobData>,
}

impl StandardKeys {
    /// Define every standard key in the given registry.
    pub fn define(registry: &mut DataKeyRegistry) -> Result<Self, DataKeyError> {
        Ok(StandardKeys {
            environment_base_url: registry.define_json("environment.base.url")?,
            executed_by: registry.define_json("common.executedby")?,
            user_creation_data: registry.define_json("user.creation.data")?,
            user_delete_data: registry.define_json("user.delete.data")?,
            user_api_token_data: registry.define_json("user.apitoken.data")?,
            project_to_user_data: registry.define_json("project2user.data")?,
            project_creation_data: registry.define_json("project.creation.data")?,
            project_delete_data: registry.define_json("project.delete.data")?,
            job_started_data: registry.define_json("job.started.data")?,
            job_done_data: registry.define_json("job.done.data")?,
            job_failed_data: registry.define_json("job.failed.data")?,
        })
    }
}
