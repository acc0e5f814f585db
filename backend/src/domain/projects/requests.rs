//! Project use-case requests and their validation rules.

use pagination::PagedResult;

use crate::domain::actor::Actor;
use crate::domain::error::FieldViolation;
use crate::domain::listing::ListParams;
use crate::domain::pipeline::Request;
use crate::domain::project::{DESCRIPTION_MAX_LEN, NAME_MAX_LEN, ProjectId, ProjectView};

fn check_name(name: &str, violations: &mut Vec<FieldViolation>) {
    if name.trim().is_empty() {
        violations.push(FieldViolation::new("name", "Project name is required."));
    } else if name.chars().count() > NAME_MAX_LEN {
        violations.push(FieldViolation::new(
            "name",
            format!("Project name must not exceed {NAME_MAX_LEN} characters."),
        ));
    }
}

fn check_description(description: Option<&str>, violations: &mut Vec<FieldViolation>) {
    if let Some(text) = description {
        if text.chars().count() > DESCRIPTION_MAX_LEN {
            violations.push(FieldViolation::new(
                "description",
                format!("Description must not exceed {DESCRIPTION_MAX_LEN} characters."),
            ));
        }
    }
}

/// Create a project owned by the actor.
#[derive(Debug, Clone)]
pub struct CreateProject {
    /// Acting caller; becomes the owner.
    pub actor: Actor,
    /// Project name, unique per owner.
    pub name: String,
    /// Optional description.
    pub description: Option<String>,
}

impl Request for CreateProject {
    type Output = ProjectView;
    const NAME: &'static str = "create_project";
    const MUTATING: bool = true;

    fn validate(&self) -> Vec<FieldViolation> {
        let mut violations = Vec::new();
        check_name(&self.name, &mut violations);
        check_description(self.description.as_deref(), &mut violations);
        violations
    }
}

/// Replace a project's name and description.
#[derive(Debug, Clone)]
pub struct UpdateProject {
    /// Acting caller.
    pub actor: Actor,
    /// Project to update.
    pub id: ProjectId,
    /// New name.
    pub name: String,
    /// New description; `None` clears it.
    pub description: Option<String>,
}

impl Request for UpdateProject {
    type Output = ProjectView;
    const NAME: &'static str = "update_project";
    const MUTATING: bool = true;

    fn validate(&self) -> Vec<FieldViolation> {
        let mut violations = Vec::new();
        check_name(&self.name, &mut violations);
        check_description(self.description.as_deref(), &mut violations);
        violations
    }
}

/// Delete a project and every task under it.
#[derive(Debug, Clone)]
pub struct DeleteProject {
    /// Acting caller.
    pub actor: Actor,
    /// Project to delete.
    pub id: ProjectId,
}

impl Request for DeleteProject {
    type Output = ();
    const NAME: &'static str = "delete_project";
    const MUTATING: bool = true;
}

/// Fetch one project.
#[derive(Debug, Clone)]
pub struct GetProjectById {
    /// Acting caller.
    pub actor: Actor,
    /// Project to fetch.
    pub id: ProjectId,
}

impl Request for GetProjectById {
    type Output = ProjectView;
    const NAME: &'static str = "get_project_by_id";
    const MUTATING: bool = false;
}

/// List projects visible to the actor.
#[derive(Debug, Clone)]
pub struct ListProjects {
    /// Acting caller; non-admins only see their own projects.
    pub actor: Actor,
    /// Paging, search, and sort parameters as sent.
    pub params: ListParams,
}

impl Request for ListProjects {
    type Output = PagedResult<ProjectView>;
    const NAME: &'static str = "list_projects";
    const MUTATING: bool = false;

    fn validate(&self) -> Vec<FieldViolation> {
        self.params.violations()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn create(name: &str, description: Option<&str>) -> CreateProject {
        CreateProject {
            actor: Actor::user("user1"),
            name: name.to_owned(),
            description: description.map(str::to_owned),
        }
    }

    #[rstest]
    fn a_well_formed_create_has_no_violations() {
        assert!(create("Alpha", Some("first")).validate().is_empty());
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    fn blank_names_are_required_violations(#[case] name: &str) {
        let violations = create(name, None).validate();
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].field, "name");
        assert_eq!(violations[0].message, "Project name is required.");
    }

    #[rstest]
    fn overlong_fields_are_collected_together() {
        let request = create(&"x".repeat(NAME_MAX_LEN + 1), Some(&"y".repeat(501)));
        let violations = request.validate();
        assert_eq!(violations.len(), 2);
        assert_eq!(violations[0].field, "name");
        assert_eq!(violations[1].field, "description");
    }

    #[rstest]
    fn update_shares_the_create_rules() {
        let request = UpdateProject {
            actor: Actor::user("user1"),
            id: ProjectId::random(),
            name: String::new(),
            description: None,
        };
        assert_eq!(request.validate().len(), 1);
    }

    #[rstest]
    fn list_delegates_to_the_page_window_rules() {
        let request = ListProjects {
            actor: Actor::user("user1"),
            params: ListParams {
                page: Some(0),
                ..ListParams::default()
            },
        };
        assert_eq!(request.validate()[0].field, "pageNumber");
    }
}
