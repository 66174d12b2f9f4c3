//! Task and comment endpoints, all scoped under a project.

use super::query;
use crate::error::ApiResult;
use crate::gateway::ApiClient;
use crate::types::{
    CommentInsert, Task, TaskComment, TaskInsert, TaskPage, TaskStatus, TaskUpdate,
};

fn tasks_root(project_id: i64) -> String {
    format!("/api/projects/{project_id}/tasks")
}

pub async fn list_tasks(api: &ApiClient, project_id: i64) -> ApiResult<Vec<Task>> {
    api.get(&format!("{}/all", tasks_root(project_id))).await
}

/// Fetches one page of tasks.
pub async fn paginated_tasks(
    api: &ApiClient,
    project_id: i64,
    page_number: u32,
    page_size: u32,
) -> ApiResult<TaskPage> {
    let path = format!(
        "{}/paginated?{}",
        tasks_root(project_id),
        query(&[
            ("pageNumber", page_number.to_string().as_str()),
            ("pageSize", page_size.to_string().as_str()),
        ])
    );
    api.get(&path).await
}

pub async fn get_task(api: &ApiClient, project_id: i64, task_id: i64) -> ApiResult<Task> {
    api.get(&format!("{}/{task_id}", tasks_root(project_id)))
        .await
}

pub async fn create_task(api: &ApiClient, project_id: i64, data: &TaskInsert) -> ApiResult<Task> {
    api.post(&format!("{}/create", tasks_root(project_id)), data)
        .await
}

pub async fn update_task(
    api: &ApiClient,
    project_id: i64,
    task_id: i64,
    data: &TaskUpdate,
) -> ApiResult<Task> {
    api.put(&format!("{}/{task_id}", tasks_root(project_id)), data)
        .await
}

pub async fn delete_task(api: &ApiClient, project_id: i64, task_id: i64) -> ApiResult<()> {
    api.delete(&format!("{}/{task_id}", tasks_root(project_id)))
        .await
}

/// Moves a task to a new workflow state. The state travels in the query string.
pub async fn update_status(
    api: &ApiClient,
    project_id: i64,
    task_id: i64,
    status: TaskStatus,
) -> ApiResult<Task> {
    let path = format!(
        "{}/{task_id}/status?{}",
        tasks_root(project_id),
        query(&[("newStatus", status.as_str())])
    );
    api.patch_empty(&path).await
}

pub async fn assign_task(
    api: &ApiClient,
    project_id: i64,
    task_id: i64,
    user_id: i64,
) -> ApiResult<Task> {
    let path = format!(
        "{}/{task_id}/assign?{}",
        tasks_root(project_id),
        query(&[("assignToUserId", user_id.to_string().as_str())])
    );
    api.put_empty(&path).await
}

pub async fn unassign_task(api: &ApiClient, project_id: i64, task_id: i64) -> ApiResult<Task> {
    api.put_empty(&format!("{}/{task_id}/unassign", tasks_root(project_id)))
        .await
}

/// Searches tasks by title/description substring; matching happens server-side.
pub async fn search_tasks(api: &ApiClient, project_id: i64, term: &str) -> ApiResult<Vec<Task>> {
    let path = format!(
        "{}/search?{}",
        tasks_root(project_id),
        query(&[("query", term)])
    );
    api.get(&path).await
}

pub async fn list_comments(
    api: &ApiClient,
    project_id: i64,
    task_id: i64,
) -> ApiResult<Vec<TaskComment>> {
    api.get(&format!("{}/{task_id}/comments", tasks_root(project_id)))
        .await
}

pub async fn add_comment(
    api: &ApiClient,
    project_id: i64,
    task_id: i64,
    data: &CommentInsert,
) -> ApiResult<TaskComment> {
    api.post(&format!("{}/{task_id}/comments", tasks_root(project_id)), data)
        .await
}

pub async fn delete_comment(
    api: &ApiClient,
    project_id: i64,
    task_id: i64,
    comment_id: i64,
) -> ApiResult<()> {
    api.delete(&format!(
        "{}/{task_id}/comments/{comment_id}",
        tasks_root(project_id)
    ))
    .await
}
