//! Rendering of menus, prompts, and listing text.
//!
//! Everything here is pure: tasks and categories in, [`Outbound`] actions
//! out. The engine decides *when* to show something; this module decides what
//! it looks like.

use todobot_core::{Category, Comment, Task};
use todobot_core::{CallbackToken, MenuOption, Outbound};

/// The main menu shown on `/start` and "back to menu".
pub fn main_menu() -> Outbound {
    Outbound::menu(
        "Welcome to the to-do bot. What would you like to do?",
        vec![
            MenuOption::new("Active tasks", CallbackToken::BackToTasks),
            MenuOption::new("Archived tasks", CallbackToken::ShowArchive),
            MenuOption::new("Add a task", CallbackToken::AddTask),
            MenuOption::new("Categories", CallbackToken::Categories),
            MenuOption::new("Help", CallbackToken::Help),
        ],
    )
}

/// The help screen.
pub fn help_menu() -> Outbound {
    let text = "Commands:\n\
         /tasks - list active tasks\n\
         /add - add a task\n\
         /categories - manage categories\n\
         /search - search tasks\n\
         /stats - completion statistics\n\
         /deadlines - upcoming deadlines\n\
         /archive - completed tasks\n\
         \n\
         Press Cancel in any dialog to abort it.";
    Outbound::menu(
        text,
        vec![
            MenuOption::new("My tasks", CallbackToken::BackToTasks),
            MenuOption::new("Add a task", CallbackToken::AddTask),
            MenuOption::new("Categories", CallbackToken::Categories),
        ],
    )
}

/// The category management menu.
pub fn category_menu() -> Outbound {
    Outbound::menu(
        "Category management. Choose an action:",
        vec![
            MenuOption::new("Create category", CallbackToken::CreateCategory),
            MenuOption::new("Delete category", CallbackToken::DeleteCategory),
            MenuOption::new("List categories", CallbackToken::ListCategories),
            MenuOption::new("Tasks by category", CallbackToken::TasksByCategory),
            MenuOption::new("Back to tasks", CallbackToken::BackToTasks),
        ],
    )
}

/// Asks for a new task's title.
pub fn title_prompt() -> Outbound {
    Outbound::menu(
        "Enter a title for the new task:",
        vec![MenuOption::new("Cancel", CallbackToken::Cancel)],
    )
}

/// Asks for a new task's description, with a skip option.
pub fn description_prompt() -> Outbound {
    Outbound::menu(
        "Enter a description, or skip it:",
        vec![
            MenuOption::new("Skip", CallbackToken::SkipDescription),
            MenuOption::new("Cancel", CallbackToken::Cancel),
        ],
    )
}

/// Asks for a due date.
pub fn due_date_menu() -> Outbound {
    Outbound::menu(
        "When is the task due?",
        vec![
            MenuOption::new("Today", CallbackToken::DueToday),
            MenuOption::new("Tomorrow", CallbackToken::DueTomorrow),
            MenuOption::new("In a week", CallbackToken::DueWeek),
            MenuOption::new("No due date", CallbackToken::SkipDueDate),
            MenuOption::new("Cancel", CallbackToken::Cancel),
        ],
    )
}

/// Asks for a search query.
pub fn search_prompt() -> Outbound {
    Outbound::menu(
        "Enter text to search for (matches title and description):",
        vec![MenuOption::new("Cancel", CallbackToken::Cancel)],
    )
}

/// Asks for comment text.
pub fn comment_prompt() -> Outbound {
    Outbound::menu(
        "Enter your comment:",
        vec![MenuOption::new("Cancel", CallbackToken::Cancel)],
    )
}

/// Category picker for the add-task flow.
pub fn category_select_menu(categories: &[Category]) -> Outbound {
    let mut options: Vec<MenuOption> = categories
        .iter()
        .map(|cat| MenuOption::new(cat.name.clone(), CallbackToken::Category(cat.id)))
        .collect();
    options.push(MenuOption::new("No category", CallbackToken::SkipCategory));
    Outbound::menu("Pick a category for the task:", options)
}

/// Category picker for deletion.
pub fn category_delete_menu(categories: &[Category]) -> Outbound {
    let options = categories
        .iter()
        .map(|cat| MenuOption::new(cat.name.clone(), CallbackToken::CategoryToDelete(cat.id)))
        .collect();
    Outbound::menu("Pick a category to delete:", options)
}

/// Category picker for viewing tasks.
pub fn category_view_menu(categories: &[Category]) -> Outbound {
    let options = categories
        .iter()
        .map(|cat| MenuOption::new(cat.name.clone(), CallbackToken::CategoryToView(cat.id)))
        .collect();
    Outbound::menu("Pick a category to view its tasks:", options)
}

/// The active task list, one button per task.
pub fn task_list_menu(tasks: &[Task]) -> Outbound {
    let mut options: Vec<MenuOption> = tasks
        .iter()
        .map(|task| MenuOption::new(task.title.clone(), CallbackToken::Task(task.id)))
        .collect();
    options.push(MenuOption::new("Add a task", CallbackToken::AddTask));
    options.push(MenuOption::new("Help", CallbackToken::Help));
    options.push(MenuOption::new("Back to menu", CallbackToken::BackToMenu));

    let text = if tasks.is_empty() {
        "You have no tasks yet. Create your first one!"
    } else {
        "Your tasks. Pick one to view comments or act on it:"
    };
    Outbound::menu(text, options)
}

/// Detail view for one task: its comments plus per-task actions.
pub fn task_detail_menu(task_id: i64, comments: &[Comment]) -> Outbound {
    let mut text = String::from("Comments on this task:\n");
    if comments.is_empty() {
        text.push_str("No comments yet. Be the first!");
    } else {
        for comment in comments {
            text.push_str(&format!("- {}\n", comment.text));
        }
    }

    Outbound::menu(
        text,
        vec![
            MenuOption::new("Mark completed", CallbackToken::CompleteTask(task_id)),
            MenuOption::new("Delete", CallbackToken::DeleteTask(task_id)),
            MenuOption::new("Add comment", CallbackToken::AddComment(task_id)),
            MenuOption::new("Back to tasks", CallbackToken::BackToTasks),
        ],
    )
}

/// Shown when fetching the task list fails: instead of dead-ending, the
/// user gets a retry button.
pub fn task_list_retry_menu() -> Outbound {
    Outbound::menu(
        "Sorry, fetching your tasks failed. Please try again.",
        vec![
            MenuOption::new("Try again", CallbackToken::RetryTasks),
            MenuOption::new("Help", CallbackToken::Help),
            MenuOption::new("Back to menu", CallbackToken::BackToMenu),
        ],
    )
}

/// Two-step confirmation for task deletion.
pub fn confirm_delete_menu(task_id: i64) -> Outbound {
    Outbound::menu(
        "Are you sure you want to delete this task?",
        vec![
            MenuOption::new("Yes, delete", CallbackToken::ConfirmDelete(task_id)),
            MenuOption::new("Cancel", CallbackToken::BackToTasks),
        ],
    )
}

/// Plain-text task listing used by search results, category views, and
/// deadline reports.
pub fn task_lines(tasks: &[Task]) -> String {
    let mut text = String::new();
    for task in tasks {
        let marker = if task.completed { "[x]" } else { "[ ]" };
        text.push_str(&format!("{marker} {}\n", task.title));
        if !task.description.is_empty() {
            text.push_str(&format!("    {}\n", task.description));
        }
        if let Some(due) = task.due_date {
            text.push_str(&format!("    due {}\n", due.format("%Y-%m-%d %H:%M")));
        }
    }
    text
}

/// Archive listing as a menu with a way back.
pub fn archive_menu(completed: &[Task]) -> Outbound {
    let text = if completed.is_empty() {
        "The archive is empty.".to_string()
    } else {
        format!("Archived tasks:\n{}", task_lines(completed))
    };
    Outbound::menu(
        text,
        vec![MenuOption::new("Active tasks", CallbackToken::BackToTasks)],
    )
}

/// Plain category listing.
pub fn category_list_text(categories: &[Category]) -> String {
    if categories.is_empty() {
        return "There are no categories yet.".to_string();
    }
    let mut text = String::from("Categories:\n");
    for cat in categories {
        text.push_str(&format!("- {}\n", cat.name));
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    fn category(id: i64, name: &str) -> Category {
        Category {
            id,
            name: name.to_string(),
            created_at: None,
        }
    }

    #[test]
    fn category_select_menu_always_offers_skip() {
        let menu = category_select_menu(&[category(1, "home"), category(2, "work")]);
        let Outbound::Menu { options, .. } = menu else {
            panic!("expected a menu");
        };
        assert_eq!(options.len(), 3);
        assert_eq!(options[0].token, CallbackToken::Category(1));
        assert_eq!(options[2].token, CallbackToken::SkipCategory);
    }

    #[test]
    fn task_lines_show_status_and_due_date() {
        let tasks = vec![Task {
            id: 1,
            title: "Buy milk".to_string(),
            description: "2 liters".to_string(),
            due_date: Some("2030-05-01T12:00:00Z".parse().unwrap()),
            completed: false,
            user: None,
            categories: Vec::new(),
            created_at: None,
        }];
        let text = task_lines(&tasks);
        assert!(text.contains("[ ] Buy milk"));
        assert!(text.contains("2 liters"));
        assert!(text.contains("due 2030-05-01"));
    }
}
