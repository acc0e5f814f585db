//! Cache key namespace.
//!
//! Key formats are a persisted contract shared with operators and any other
//! cache reader; change them only with a cache flush. List keys embed the
//! raw request parameters (with `none` sentinels for absent ones) so every
//! parameter combination gets its own entry; invalidation removes list keys
//! by prefix, which stays a superset of every key that could contain the
//! touched entity.

use super::project::{ProjectId, UserId};
use super::task::TaskId;

/// Key of a single cached project view.
#[must_use]
pub fn project_key(id: ProjectId) -> String {
    format!("project_{id}")
}

/// Key of a single cached task view.
#[must_use]
pub fn task_key(id: TaskId) -> String {
    format!("task_{id}")
}

/// Prefix of every list key scoped to one owner's projects.
#[must_use]
pub fn projects_user_prefix(owner: &UserId) -> String {
    format!("projects_user_{owner}")
}

/// Prefix of every unscoped (admin) project list key.
#[must_use]
pub fn projects_all_prefix() -> &'static str {
    "projects_all"
}

/// Prefix of every task list key for one project.
#[must_use]
pub fn tasks_project_prefix(project_id: ProjectId) -> String {
    format!("tasks_project_{project_id}")
}

/// Full key for an owner-scoped project list page.
#[must_use]
pub fn projects_user_list_key(owner: &UserId, params: &ListKeyParams<'_>) -> String {
    format!("{}_{}", projects_user_prefix(owner), params.suffix())
}

/// Full key for an unscoped project list page.
#[must_use]
pub fn projects_all_list_key(params: &ListKeyParams<'_>) -> String {
    format!("{}_{}", projects_all_prefix(), params.suffix())
}

/// Full key for a task list page within one project.
#[must_use]
pub fn tasks_project_list_key(project_id: ProjectId, params: &ListKeyParams<'_>) -> String {
    format!("{}_{}", tasks_project_prefix(project_id), params.suffix())
}

/// The raw list parameters embedded in a list key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListKeyParams<'a> {
    /// 1-based page number.
    pub page: u32,
    /// Requested page size.
    pub size: u32,
    /// Search text as the caller sent it.
    pub search: Option<&'a str>,
    /// Requested sort column as the caller sent it.
    pub sort_by: Option<&'a str>,
    /// Requested sort direction as the caller sent it.
    pub sort_order: Option<&'a str>,
}

impl ListKeyParams<'_> {
    fn suffix(&self) -> String {
        format!(
            "page_{}_size_{}_search_{}_sortby_{}_sortorder_{}",
            self.page,
            self.size,
            self.search.unwrap_or("none"),
            self.sort_by.unwrap_or("none"),
            self.sort_order.unwrap_or("none"),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use uuid::uuid;

    const ID: uuid::Uuid = uuid!("a1a2a3a4-b1b2-c1c2-d1d2-d3d4d5d6d7d8");

    #[rstest]
    fn entity_keys_match_the_contract() {
        assert_eq!(
            project_key(ProjectId::from_uuid(ID)),
            "project_a1a2a3a4-b1b2-c1c2-d1d2-d3d4d5d6d7d8"
        );
        assert_eq!(
            task_key(TaskId::from_uuid(ID)),
            "task_a1a2a3a4-b1b2-c1c2-d1d2-d3d4d5d6d7d8"
        );
    }

    #[rstest]
    fn list_key_embeds_every_parameter() {
        let params = ListKeyParams {
            page: 2,
            size: 10,
            search: Some("alpha"),
            sort_by: Some("name"),
            sort_order: Some("desc"),
        };
        assert_eq!(
            projects_user_list_key(&UserId::new("user1"), &params),
            "projects_user_user1_page_2_size_10_search_alpha_sortby_name_sortorder_desc"
        );
    }

    #[rstest]
    fn absent_parameters_use_the_none_sentinel() {
        let params = ListKeyParams {
            page: 1,
            size: 10,
            search: None,
            sort_by: None,
            sort_order: None,
        };
        assert_eq!(
            projects_all_list_key(&params),
            "projects_all_page_1_size_10_search_none_sortby_none_sortorder_none"
        );
        assert_eq!(
            tasks_project_list_key(ProjectId::from_uuid(ID), &params),
            "tasks_project_a1a2a3a4-b1b2-c1c2-d1d2-d3d4d5d6d7d8_page_1_size_10_search_none_sortby_none_sortorder_none"
        );
    }

    #[rstest]
    fn list_keys_start_with_their_invalidation_prefix() {
        let params = ListKeyParams {
            page: 3,
            size: 25,
            search: Some("q"),
            sort_by: None,
            sort_order: None,
        };
        let owner = UserId::new("user2");
        assert!(
            projects_user_list_key(&owner, &params).starts_with(&projects_user_prefix(&owner))
        );
        assert!(projects_all_list_key(&params).starts_with(projects_all_prefix()));
        let project = ProjectId::from_uuid(ID);
        assert!(
            tasks_project_list_key(project, &params)
                .starts_with(&tasks_project_prefix(project))
        );
    }
}
