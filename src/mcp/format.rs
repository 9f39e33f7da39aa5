//! Markdown rendering of Todoist entities.

use crate::client::{Due, Label, Project, Task};

/// Responses longer than this many characters are cut short.
pub const CHARACTER_LIMIT: usize = 25_000;

/// Descriptions in task lists are clipped to this many characters.
const LIST_DESCRIPTION_MAX: usize = 200;

pub fn format_due(due: Option<&Due>) -> String {
    let Some(due) = due else {
        return "No due date".to_string();
    };
    if let Some(datetime) = due.datetime.as_deref().filter(|d| !d.is_empty()) {
        return datetime.to_string();
    }
    match due.string.as_deref().filter(|s| !s.is_empty()) {
        Some(string) => format!("{} ({})", string, due.date),
        None => due.date.clone(),
    }
}

/// Todoist's API priority 4 is what the apps show as P1.
pub fn priority_label(priority: u8) -> String {
    match priority {
        1 => "P4 (lowest)".to_string(),
        2 => "P3".to_string(),
        3 => "P2".to_string(),
        4 => "P1 (highest)".to_string(),
        other => other.to_string(),
    }
}

fn priority_marker(priority: u8) -> &'static str {
    match priority {
        4 => "🔴 ",
        3 => "🟠 ",
        2 => "🔵 ",
        _ => "",
    }
}

fn label_list(labels: &[String]) -> String {
    if labels.is_empty() {
        "none".to_string()
    } else {
        labels.join(", ")
    }
}

fn clip(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let clipped: String = text.chars().take(max).collect();
        format!("{}...", clipped)
    }
}

fn yes_no(flag: bool) -> &'static str {
    if flag { "Yes" } else { "No" }
}

/// Cut an over-long response and tell the reader how to narrow it.
pub fn truncate_response(result: String, item_count: usize) -> String {
    if result.chars().count() <= CHARACTER_LIMIT {
        return result;
    }
    let mut truncated: String = result.chars().take(CHARACTER_LIMIT - 200).collect();
    truncated.push_str(&format!(
        "\n\n---\n**Response truncated** ({} items). Use filters to narrow results.",
        item_count
    ));
    truncated
}

pub fn tasks_markdown(tasks: &[Task]) -> String {
    let mut lines = vec![
        "# Todoist Tasks".to_string(),
        format!("*Showing {} tasks*", tasks.len()),
        String::new(),
    ];

    for task in tasks {
        lines.push(format!(
            "### {}{}",
            priority_marker(task.priority),
            task.content
        ));
        lines.push(format!("- **ID**: `{}`", task.id));
        lines.push(format!("- **Due**: {}", format_due(task.due.as_ref())));
        lines.push(format!("- **Priority**: {}", priority_label(task.priority)));
        lines.push(format!("- **Labels**: {}", label_list(&task.labels)));
        if !task.description.is_empty() {
            lines.push(format!(
                "- **Description**: {}",
                clip(&task.description, LIST_DESCRIPTION_MAX)
            ));
        }
        lines.push(String::new());
    }

    truncate_response(lines.join("\n"), tasks.len())
}

pub fn task_markdown(task: &Task) -> String {
    let mut lines = vec![
        format!("# {}", task.content),
        String::new(),
        format!("- **ID**: `{}`", task.id),
        format!(
            "- **Project**: `{}`",
            task.project_id.as_deref().unwrap_or("Inbox")
        ),
        format!("- **Due**: {}", format_due(task.due.as_ref())),
        format!("- **Priority**: {}", priority_label(task.priority)),
        format!("- **Labels**: {}", label_list(&task.labels)),
        format!("- **Completed**: {}", yes_no(task.is_completed)),
        format!(
            "- **Created**: {}",
            task.created_at.as_deref().unwrap_or("unknown")
        ),
    ];
    if let Some(parent) = &task.parent_id {
        lines.push(format!("- **Parent Task**: `{}`", parent));
    }
    if !task.description.is_empty() {
        lines.extend([
            String::new(),
            "## Description".to_string(),
            task.description.clone(),
        ]);
    }
    lines.join("\n")
}

pub fn projects_markdown(projects: &[Project]) -> String {
    let mut lines = vec!["# Todoist Projects".to_string(), String::new()];
    for project in projects {
        let favorite = if project.is_favorite { " ⭐" } else { "" };
        let indent = if project.parent_id.is_some() { "  " } else { "" };
        lines.push(format!(
            "{}- **{}**{} (ID: `{}`)",
            indent, project.name, favorite, project.id
        ));
        if project.comment_count > 0 {
            lines.push(format!("{}  - {} comments", indent, project.comment_count));
        }
    }
    truncate_response(lines.join("\n"), projects.len())
}

pub fn project_markdown(project: &Project) -> String {
    let mut lines = vec![
        format!("# {}", project.name),
        String::new(),
        format!("- **ID**: `{}`", project.id),
        format!(
            "- **Color**: {}",
            project.color.as_deref().unwrap_or("default")
        ),
        format!("- **Favorite**: {}", yes_no(project.is_favorite)),
        format!("- **Shared**: {}", yes_no(project.is_shared)),
        format!("- **Comments**: {}", project.comment_count),
    ];
    if let Some(parent) = &project.parent_id {
        lines.push(format!("- **Parent Project**: `{}`", parent));
    }
    lines.join("\n")
}

pub fn labels_markdown(labels: &[Label]) -> String {
    let mut lines = vec!["# Todoist Labels".to_string(), String::new()];
    for label in labels {
        let favorite = if label.is_favorite { " ⭐" } else { "" };
        lines.push(format!(
            "- **{}**{} (ID: `{}`, color: {})",
            label.name,
            favorite,
            label.id,
            label.color.as_deref().unwrap_or("default")
        ));
    }
    truncate_response(lines.join("\n"), labels.len())
}
