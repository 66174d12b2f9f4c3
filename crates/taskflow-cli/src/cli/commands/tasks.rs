//! Task and comment command handlers.

use anyhow::{Context, Result};
use taskflow_core::clients::tasks;
use taskflow_core::forms::{FieldCheck, check_required};
use taskflow_core::types::{
    CommentInsert, Task, TaskInsert, TaskPriority, TaskStatus, TaskUpdate,
};

use super::super::{AppContext, CommentCommands, TaskCommands};

pub async fn dispatch(ctx: &AppContext, project: i64, command: TaskCommands) -> Result<()> {
    ctx.require_login()?;

    match command {
        TaskCommands::List { page, page_size } => list(ctx, project, page, page_size).await,
        TaskCommands::Show { id } => show(ctx, project, id).await,
        TaskCommands::Create {
            title,
            description,
            status,
            priority,
            due_date,
            assignee,
        } => {
            create(
                ctx,
                project,
                title,
                description,
                status,
                priority,
                due_date,
                assignee,
            )
            .await
        }
        TaskCommands::Update {
            id,
            title,
            description,
            status,
            priority,
            due_date,
            assignee,
        } => {
            let update = TaskUpdate {
                title,
                description,
                status,
                priority,
                due_date,
                assigned_to_user_id: assignee,
            };
            let task = tasks::update_task(&ctx.api, project, id, &update)
                .await
                .with_context(|| format!("update task {id}"))?;
            println!("Updated task {} (id {})", task.title, task.id);
            Ok(())
        }
        TaskCommands::Delete { id } => {
            tasks::delete_task(&ctx.api, project, id)
                .await
                .with_context(|| format!("delete task {id}"))?;
            println!("Deleted task {id}");
            Ok(())
        }
        TaskCommands::Status { id, status } => {
            let task = tasks::update_status(&ctx.api, project, id, status)
                .await
                .with_context(|| format!("update status of task {id}"))?;
            println!("{} -> {}", task.title, task.status);
            Ok(())
        }
        TaskCommands::Assign { id, user } => {
            let task = tasks::assign_task(&ctx.api, project, id, user)
                .await
                .with_context(|| format!("assign task {id}"))?;
            let assignee = task.assigned_to_username.as_deref().unwrap_or("unknown");
            println!("Assigned {} to {}", task.title, assignee);
            Ok(())
        }
        TaskCommands::Unassign { id } => {
            let task = tasks::unassign_task(&ctx.api, project, id)
                .await
                .with_context(|| format!("unassign task {id}"))?;
            println!("Unassigned {}", task.title);
            Ok(())
        }
        TaskCommands::Search { term } => search(ctx, project, &term).await,
        TaskCommands::Comments { task, command } => comments(ctx, project, task, command).await,
    }
}

fn print_task_row(task: &Task) {
    let assignee = task.assigned_to_username.as_deref().unwrap_or("-");
    println!(
        "{:>6}  [{}] [{}]  {}  (assignee: {}, {} comments)",
        task.id, task.status, task.priority, task.title, assignee, task.comment_count
    );
}

async fn list(
    ctx: &AppContext,
    project: i64,
    page: Option<u32>,
    page_size: u32,
) -> Result<()> {
    if let Some(page_number) = page {
        let page = tasks::paginated_tasks(&ctx.api, project, page_number, page_size)
            .await
            .context("list tasks")?;

        if page.data.is_empty() {
            println!("No tasks found.");
        } else {
            for task in &page.data {
                print_task_row(task);
            }
            println!(
                "page {}/{} ({} tasks total)",
                page.page_number, page.total_pages, page.total_records
            );
        }
        return Ok(());
    }

    let all = tasks::list_tasks(&ctx.api, project)
        .await
        .context("list tasks")?;

    if all.is_empty() {
        println!("No tasks found.");
    } else {
        for task in &all {
            print_task_row(task);
        }
    }
    Ok(())
}

async fn show(ctx: &AppContext, project: i64, id: i64) -> Result<()> {
    let task = tasks::get_task(&ctx.api, project, id)
        .await
        .with_context(|| format!("load task {id}"))?;

    println!("{}  (id {})", task.title, task.id);
    if let Some(description) = task.description.as_deref() {
        if !description.is_empty() {
            println!("{description}");
        }
    }
    let assignee = task.assigned_to_username.as_deref().unwrap_or("-");
    println!(
        "status: {}  priority: {}  assignee: {}  due: {}",
        task.status,
        task.priority,
        assignee,
        task.due_date.as_deref().unwrap_or("-")
    );

    if !task.comments.is_empty() {
        println!();
        for comment in &task.comments {
            println!("[{}] {}: {}", comment.created_date, comment.username, comment.content);
        }
    }
    Ok(())
}

#[allow(clippy::too_many_arguments)]
async fn create(
    ctx: &AppContext,
    project: i64,
    title: String,
    description: Option<String>,
    status: TaskStatus,
    priority: TaskPriority,
    due_date: Option<String>,
    assignee: Option<i64>,
) -> Result<()> {
    if let FieldCheck::Invalid { message } = check_required("Task title", &title) {
        anyhow::bail!(message);
    }

    let insert = TaskInsert {
        title,
        description,
        status,
        priority,
        due_date,
        assigned_to_user_id: assignee,
    };
    let task = tasks::create_task(&ctx.api, project, &insert)
        .await
        .context("create task")?;

    println!("Created task {} (id {})", task.title, task.id);
    Ok(())
}

async fn search(ctx: &AppContext, project: i64, term: &str) -> Result<()> {
    let found = tasks::search_tasks(&ctx.api, project, term)
        .await
        .context("search tasks")?;

    if found.is_empty() {
        println!("No tasks found.");
    } else {
        for task in &found {
            print_task_row(task);
        }
    }
    Ok(())
}

async fn comments(
    ctx: &AppContext,
    project: i64,
    task_id: i64,
    command: CommentCommands,
) -> Result<()> {
    match command {
        CommentCommands::List => {
            let comments = tasks::list_comments(&ctx.api, project, task_id)
                .await
                .with_context(|| format!("list comments of task {task_id}"))?;

            if comments.is_empty() {
                println!("No comments found.");
            } else {
                for comment in comments {
                    println!(
                        "{:>6}  [{}] {}: {}",
                        comment.id, comment.created_date, comment.username, comment.content
                    );
                }
            }
            Ok(())
        }
        CommentCommands::Add { content } => {
            if let FieldCheck::Invalid { message } = check_required("Comment", &content) {
                anyhow::bail!(message);
            }
            let comment = tasks::add_comment(&ctx.api, project, task_id, &CommentInsert { content })
                .await
                .context("add comment")?;
            println!("Added comment {} by {}", comment.id, comment.username);
            Ok(())
        }
        CommentCommands::Delete { comment } => {
            tasks::delete_comment(&ctx.api, project, task_id, comment)
                .await
                .with_context(|| format!("delete comment {comment}"))?;
            println!("Deleted comment {comment}");
            Ok(())
        }
    }
}
