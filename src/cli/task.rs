//! Task CLI commands

use anyhow::{Context, Result};
use clap::Subcommand;
use tracing::debug;

use super::output::Output;
use crate::domain::rules::{apply_status, check_transition, on_dependency_added};
use crate::domain::{DependencyGraph, StatusChange, Task, TaskId, TaskStatus};
use crate::storage::Project;

#[derive(Subcommand)]
pub enum TaskCommands {
    /// Add a task
    ///
    /// Examples:
    ///   taskdag task add "Design schema"
    ///   taskdag task add "Build API" --after 1 --after 2
    Add {
        /// Task title
        title: String,

        /// Longer description
        #[arg(long, short, default_value = "")]
        description: String,

        /// Task this one depends on (repeatable)
        #[arg(long = "after", value_name = "ID")]
        after: Vec<TaskId>,
    },

    /// List tasks
    List,

    /// Show task details
    Show {
        /// Task ID
        id: TaskId,
    },

    /// Change a task's status and apply the effects on its dependents
    Status {
        /// Task ID
        id: TaskId,

        /// New status (pending, in_progress, completed, blocked)
        status: TaskStatus,

        /// Skip the unfinished-dependency check
        #[arg(long)]
        force: bool,
    },

    /// Add a dependency between tasks
    Dep {
        /// Task that will wait
        task: TaskId,

        /// Task that must be completed first
        depends_on: TaskId,
    },

    /// Remove a dependency
    Undep {
        /// Task that waits
        task: TaskId,

        /// Dependency to remove
        depends_on: TaskId,
    },

    /// Delete a task and every dependency on it
    Remove {
        /// Task ID
        id: TaskId,
    },
}

pub fn run(cmd: TaskCommands, output: &Output) -> Result<()> {
    match cmd {
        TaskCommands::Add {
            title,
            description,
            after,
        } => add_task(output, &title, &description, &after),
        TaskCommands::List => list_tasks(output),
        TaskCommands::Show { id } => show_task(output, id),
        TaskCommands::Status { id, status, force } => set_status(output, id, status, force),
        TaskCommands::Dep { task, depends_on } => add_dependency(output, task, depends_on),
        TaskCommands::Undep { task, depends_on } => remove_dependency(output, task, depends_on),
        TaskCommands::Remove { id } => remove_task(output, id),
    }
}

fn find(tasks: &[Task], id: TaskId) -> Result<&Task> {
    tasks
        .iter()
        .find(|t| t.id == id)
        .with_context(|| format!("Task not found: {}", id))
}

fn find_mut(tasks: &mut [Task], id: TaskId) -> Result<&mut Task> {
    tasks
        .iter_mut()
        .find(|t| t.id == id)
        .with_context(|| format!("Task not found: {}", id))
}

fn print_changes(output: &Output, tasks: &[Task], changes: &[StatusChange]) {
    for change in changes {
        let title = tasks
            .iter()
            .find(|t| t.id == change.id)
            .map(|t| t.title.as_str())
            .unwrap_or("");
        output.row(&[
            &format!("#{}", change.id),
            &format!("{} -> {}", change.from, change.to),
            title,
        ]);
    }
}

fn add_task(output: &Output, title: &str, description: &str, after: &[TaskId]) -> Result<()> {
    let project = Project::open_current()?;
    let store = project.task_store();
    let mut tasks = store.read_all()?;

    let id = store.next_id()?;
    tasks.push(Task::new(id, title).with_description(description));

    let mut graph = DependencyGraph::from_tasks(&tasks);
    let mut changes = Vec::new();
    for &dep in after {
        graph.add_dependency(id, dep)?;
        find_mut(&mut tasks, id)?.add_dependency(dep);
        changes.extend(on_dependency_added(&mut tasks, id, dep)?);
    }

    store.write_all(&tasks)?;
    let task = find(&tasks, id)?;
    debug!(task = %id, deps = after.len(), "task added");

    if output.is_json() {
        output.data(task);
    } else {
        output.success(&format!("Created task: #{} - {}", task.id, task.title));
        print_changes(output, &tasks, &changes);
    }

    Ok(())
}

fn list_tasks(output: &Output) -> Result<()> {
    let project = Project::open_current()?;
    let tasks = project.task_store().read_all()?;

    if output.is_json() {
        output.data(&tasks);
        return Ok(());
    }

    if tasks.is_empty() {
        println!("No tasks found.");
        return Ok(());
    }

    output.row(&["ID", "STATUS", "DEPENDS ON", "TITLE"]);
    for task in &tasks {
        let deps = task
            .dependencies
            .iter()
            .map(|d| d.to_string())
            .collect::<Vec<_>>()
            .join(",");
        output.row(&[
            &task.id.to_string(),
            task.status.as_str(),
            if deps.is_empty() { "-" } else { &deps },
            &task.title,
        ]);
    }

    Ok(())
}

fn show_task(output: &Output, id: TaskId) -> Result<()> {
    let project = Project::open_current()?;
    let tasks = project.task_store().read_all()?;
    let task = find(&tasks, id)?;
    let dependents = DependencyGraph::from_tasks(&tasks).dependents(id);

    if output.is_json() {
        output.data(&serde_json::json!({
            "id": task.id,
            "title": task.title,
            "description": task.description,
            "status": task.status,
            "dependencies": task.dependencies,
            "dependents": dependents,
        }));
        return Ok(());
    }

    println!("Task #{}: {}", task.id, task.title);
    println!("Status: {}", task.status);
    if !task.description.is_empty() {
        println!("Description: {}", task.description);
    }

    let join = |ids: &[TaskId]| {
        ids.iter()
            .map(|d| format!("#{}", d))
            .collect::<Vec<_>>()
            .join(", ")
    };
    if !task.dependencies.is_empty() {
        println!("Depends on: {}", join(&task.dependencies));
    }
    if !dependents.is_empty() {
        println!("Required by: {}", join(&dependents));
    }

    Ok(())
}

fn set_status(output: &Output, id: TaskId, status: TaskStatus, force: bool) -> Result<()> {
    let project = Project::open_current()?;
    let store = project.task_store();
    let mut tasks = store.read_all()?;

    if !force {
        check_transition(&tasks, id, status)?;
    }

    let changes = apply_status(&mut tasks, id, status)?;
    store.write_all(&tasks)?;

    if output.is_json() {
        output.data(&serde_json::json!({ "changes": changes }));
    } else {
        output.success(&format!("Task #{} is now {}", id, status));
        if changes.len() > 1 {
            print_changes(output, &tasks, &changes[1..]);
        }
    }

    Ok(())
}

fn add_dependency(output: &Output, task_id: TaskId, depends_on: TaskId) -> Result<()> {
    let project = Project::open_current()?;
    let store = project.task_store();
    let mut tasks = store.read_all()?;

    let mut graph = DependencyGraph::from_tasks(&tasks);
    graph.add_dependency(task_id, depends_on)?;

    if !find_mut(&mut tasks, task_id)?.add_dependency(depends_on) {
        output.success(&format!("#{} already depends on #{}", task_id, depends_on));
        return Ok(());
    }

    let changes = on_dependency_added(&mut tasks, task_id, depends_on)?;
    store.write_all(&tasks)?;

    if output.is_json() {
        output.data(&serde_json::json!({
            "task": task_id,
            "depends_on": depends_on,
            "changes": changes,
        }));
    } else {
        output.success(&format!("#{} now depends on #{}", task_id, depends_on));
        print_changes(output, &tasks, &changes);
    }

    Ok(())
}

fn remove_dependency(output: &Output, task_id: TaskId, depends_on: TaskId) -> Result<()> {
    let project = Project::open_current()?;
    let store = project.task_store();
    let mut tasks = store.read_all()?;

    if find_mut(&mut tasks, task_id)?.remove_dependency(depends_on) {
        store.write_all(&tasks)?;
        output.success(&format!("Removed dependency: #{} no longer depends on #{}", task_id, depends_on));
    } else {
        output.success(&format!("#{} did not depend on #{}", task_id, depends_on));
    }

    Ok(())
}

fn remove_task(output: &Output, id: TaskId) -> Result<()> {
    let project = Project::open_current()?;

    if !project.task_store().remove(id)? {
        anyhow::bail!("Task not found: {}", id);
    }

    output.success(&format!("Removed task #{}", id));
    Ok(())
}
