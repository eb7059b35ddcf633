//! Graph CLI commands: layout, levels, check, legend

use std::collections::HashSet;
use std::path::Path;

use anyhow::Result;
use tracing::debug;

use super::output::Output;
use crate::domain::{Task, TaskId};
use crate::layout::levels::assign_levels;
use crate::layout::{compute_layout, palette, LayoutConfig, TaskGraph};
use crate::storage::{import, load_layout_file, Config, Project};

/// Loads the task list from `--input` or the current project
fn load_tasks(input: Option<&Path>) -> Result<Vec<Task>> {
    match input {
        Some(path) => import::read_task_array(path),
        None => Project::open_current()?.task_store().read_all(),
    }
}

/// Resolves layout settings: explicit file, then project config, then defaults
fn load_layout_config(config_file: Option<&Path>) -> Result<LayoutConfig> {
    if let Some(path) = config_file {
        return load_layout_file(path);
    }

    match Config::find_project_root() {
        Some(root) => Project::open(root)?.config().layout(),
        None => Ok(LayoutConfig::default()),
    }
}

/// Formats a coordinate without a trailing `.0` for whole numbers
fn coord(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{:.0}", value)
    } else {
        format!("{:.1}", value)
    }
}

pub fn layout(output: &Output, input: Option<&Path>, config_file: Option<&Path>) -> Result<()> {
    let tasks = load_tasks(input)?;
    let config = load_layout_config(config_file)?;
    debug!(?config, tasks = tasks.len(), "computing layout");

    let layout = compute_layout(&tasks, &config)?;

    if output.is_json() {
        output.data(&layout);
        return Ok(());
    }

    if layout.is_empty() {
        println!("No tasks to lay out.");
    }

    let mut current_level = None;
    for node in &layout.nodes {
        if current_level != Some(node.level) {
            println!("Level {}", node.level);
            current_level = Some(node.level);
        }
        println!(
            "  {:<6} {:<12} ({}, {})  {}",
            format!("#{}", node.id),
            node.status,
            coord(node.x),
            coord(node.y),
            node.title
        );
    }

    if !layout.edges.is_empty() {
        output.blank();
        println!("Edges");
        for edge in &layout.edges {
            println!(
                "  {:<10} ({}, {}) -> ({}, {})",
                edge.key.to_string(),
                coord(edge.source.x),
                coord(edge.source.y),
                coord(edge.target.x),
                coord(edge.target.y)
            );
        }
    }

    output.blank();
    println!("Canvas: {} x {}", coord(layout.width), coord(layout.height));

    Ok(())
}

/// Levels only; spacing settings are not consulted
pub fn levels(output: &Output, input: Option<&Path>) -> Result<()> {
    let tasks = load_tasks(input)?;
    let graph = TaskGraph::build(&tasks);
    let levels = assign_levels(&graph)?;

    // Ascending level, input order within a level
    let mut rows: Vec<(&Task, usize)> = graph
        .tasks()
        .iter()
        .filter_map(|t| levels.get(&t.id).map(|&level| (*t, level)))
        .collect();
    rows.sort_by_key(|(_, level)| *level);

    if output.is_json() {
        let items: Vec<_> = rows
            .iter()
            .map(|(task, level)| {
                serde_json::json!({
                    "id": task.id,
                    "level": level,
                    "title": task.title,
                })
            })
            .collect();
        output.data(&items);
        return Ok(());
    }

    output.row(&["ID", "LEVEL", "TITLE"]);
    for (task, level) in &rows {
        output.row(&[&task.id.to_string(), &level.to_string(), &task.title]);
    }

    Ok(())
}

pub fn check(output: &Output, input: Option<&Path>) -> Result<()> {
    let tasks = load_tasks(input)?;
    let graph = TaskGraph::build(&tasks);
    let levels = assign_levels(&graph)?;

    let mut seen = HashSet::new();
    let dangling: Vec<(TaskId, TaskId)> = graph
        .tasks()
        .iter()
        .flat_map(|t| t.dependencies.iter().map(move |dep| (t.id, *dep)))
        .filter(|(_, dep)| !graph.contains(*dep))
        .filter(|pair| seen.insert(*pair))
        .collect();
    let depth = levels.values().max().map_or(0, |max| max + 1);

    if output.is_json() {
        let dangling_json: Vec<_> = dangling
            .iter()
            .map(|(task, missing)| serde_json::json!({ "task": task, "missing": missing }))
            .collect();
        output.data(&serde_json::json!({
            "acyclic": true,
            "tasks": graph.len(),
            "relations": graph.relation_count(),
            "levels": depth,
            "dangling": dangling_json,
        }));
        return Ok(());
    }

    println!(
        "OK: {} tasks, {} dependencies, {} levels, no cycles",
        graph.len(),
        graph.relation_count(),
        depth
    );
    for (task, missing) in &dangling {
        println!("  note: task {} depends on missing task {} (ignored)", task, missing);
    }

    Ok(())
}

pub fn legend(output: &Output) {
    if output.is_json() {
        output.data(&palette::LEGEND);
        return;
    }

    output.row(&["STATUS", "COLOR", "LABEL"]);
    for entry in &palette::LEGEND {
        output.row(&[entry.status.as_str(), entry.color, entry.label]);
    }
}
