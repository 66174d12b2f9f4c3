//! Project command handlers.

use anyhow::{Context, Result};
use taskflow_core::clients::projects;
use taskflow_core::forms::{FieldCheck, check_required};
use taskflow_core::types::{AddProjectMember, Project, ProjectInsert, ProjectUpdate};

use super::super::{AppContext, MemberCommands, ProjectCommands};

pub async fn dispatch(ctx: &AppContext, command: ProjectCommands) -> Result<()> {
    ctx.require_login()?;

    match command {
        ProjectCommands::List => list(ctx).await,
        ProjectCommands::Show { id } => show(ctx, id).await,
        ProjectCommands::Create { name, description } => create(ctx, name, description).await,
        ProjectCommands::Update {
            id,
            name,
            description,
        } => update(ctx, id, name, description).await,
        ProjectCommands::Delete { id } => delete(ctx, id).await,
        ProjectCommands::Members { project, command } => members(ctx, project, command).await,
    }
}

async fn list(ctx: &AppContext) -> Result<()> {
    let projects = projects::list_projects(&ctx.api)
        .await
        .context("list projects")?;

    if projects.is_empty() {
        println!("No projects found.");
    } else {
        for project in projects {
            println!(
                "{:>6}  {}  (owner {}, {} members, {} tasks)",
                project.id,
                project.name,
                project.owner_name,
                project.member_count,
                project.task_count
            );
        }
    }
    Ok(())
}

fn print_project(project: &Project) {
    println!("{}  (id {})", project.name, project.id);
    if let Some(description) = project.description.as_deref() {
        if !description.is_empty() {
            println!("{description}");
        }
    }
    println!(
        "owner: {}  members: {}  tasks: {}  created: {}",
        project.owner_name, project.member_count, project.task_count, project.created_date
    );
}

async fn show(ctx: &AppContext, id: i64) -> Result<()> {
    let project = projects::get_project(&ctx.api, id)
        .await
        .with_context(|| format!("load project {id}"))?;
    print_project(&project);
    Ok(())
}

async fn create(ctx: &AppContext, name: String, description: Option<String>) -> Result<()> {
    if let FieldCheck::Invalid { message } = check_required("Project name", &name) {
        anyhow::bail!(message);
    }

    let project = projects::create_project(&ctx.api, &ProjectInsert { name, description })
        .await
        .context("create project")?;

    println!("Created project {} (id {})", project.name, project.id);
    Ok(())
}

async fn update(
    ctx: &AppContext,
    id: i64,
    name: Option<String>,
    description: Option<String>,
) -> Result<()> {
    if name.is_none() && description.is_none() {
        anyhow::bail!("Nothing to update: pass --name and/or --description");
    }

    let project = projects::update_project(&ctx.api, id, &ProjectUpdate { name, description })
        .await
        .with_context(|| format!("update project {id}"))?;

    println!("Updated project {} (id {})", project.name, project.id);
    Ok(())
}

async fn delete(ctx: &AppContext, id: i64) -> Result<()> {
    projects::delete_project(&ctx.api, id)
        .await
        .with_context(|| format!("delete project {id}"))?;
    println!("Deleted project {id}");
    Ok(())
}

async fn members(ctx: &AppContext, project_id: i64, command: MemberCommands) -> Result<()> {
    match command {
        MemberCommands::List => {
            let members = projects::list_members(&ctx.api, project_id)
                .await
                .with_context(|| format!("list members of project {project_id}"))?;

            if members.is_empty() {
                println!("No members found.");
            } else {
                for member in members {
                    println!(
                        "{:>6}  {}  {}  {}",
                        member.id, member.username, member.email, member.role
                    );
                }
            }
            Ok(())
        }
        MemberCommands::Add { user, role } => {
            let member = projects::add_member(
                &ctx.api,
                project_id,
                &AddProjectMember {
                    user_id: user,
                    role,
                },
            )
            .await
            .context("add member")?;

            println!("Added {} as {}", member.username, member.role);
            Ok(())
        }
        MemberCommands::Remove { member } => {
            projects::remove_member(&ctx.api, project_id, member)
                .await
                .with_context(|| format!("remove member {member}"))?;
            println!("Removed member {member}");
            Ok(())
        }
        MemberCommands::SetRole { member, role } => {
            let updated = projects::update_member_role(&ctx.api, project_id, member, role)
                .await
                .with_context(|| format!("update role of member {member}"))?;
            println!("{} is now {}", updated.username, updated.role);
            Ok(())
        }
    }
}
