//! Project and membership endpoints.

use super::query;
use crate::error::ApiResult;
use crate::gateway::ApiClient;
use crate::types::{
    AddProjectMember, MemberRole, Project, ProjectInsert, ProjectMember, ProjectUpdate,
};

/// Lists the projects the current user belongs to.
pub async fn list_projects(api: &ApiClient) -> ApiResult<Vec<Project>> {
    api.get("/api/projects/user/all").await
}

pub async fn get_project(api: &ApiClient, id: i64) -> ApiResult<Project> {
    api.get(&format!("/api/projects/{id}")).await
}

pub async fn create_project(api: &ApiClient, data: &ProjectInsert) -> ApiResult<Project> {
    api.post("/api/projects/create", data).await
}

pub async fn update_project(api: &ApiClient, id: i64, data: &ProjectUpdate) -> ApiResult<Project> {
    api.put(&format!("/api/projects/{id}"), data).await
}

pub async fn delete_project(api: &ApiClient, id: i64) -> ApiResult<()> {
    api.delete(&format!("/api/projects/{id}")).await
}

pub async fn list_members(api: &ApiClient, project_id: i64) -> ApiResult<Vec<ProjectMember>> {
    api.get(&format!("/api/projects/{project_id}/members")).await
}

pub async fn add_member(
    api: &ApiClient,
    project_id: i64,
    data: &AddProjectMember,
) -> ApiResult<ProjectMember> {
    api.post(&format!("/api/projects/{project_id}/members"), data)
        .await
}

pub async fn remove_member(api: &ApiClient, project_id: i64, member_id: i64) -> ApiResult<()> {
    api.delete(&format!("/api/projects/{project_id}/members/{member_id}"))
        .await
}

/// Changes a member's role. The new role travels in the query string.
pub async fn update_member_role(
    api: &ApiClient,
    project_id: i64,
    member_id: i64,
    role: MemberRole,
) -> ApiResult<ProjectMember> {
    let path = format!(
        "/api/projects/{project_id}/members/{member_id}/role?{}",
        query(&[("newRole", role.as_str())])
    );
    api.put_empty(&path).await
}
