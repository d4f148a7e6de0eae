//! Message formatter — renders work items into a single Telegram HTML payload.
//!
//! The markup is purely presentational; nothing downstream parses it back.

use taskherald_common::types::WorkItem;

/// Fixed reply when there is nothing outstanding.
pub const EMPTY_TASKS_MESSAGE: &str = "<b>No incomplete tasks found!</b>";

/// Render a task list in input order: a bold header, then one bullet block
/// per item with its id, owner and title.
pub fn render_tasks(items: &[WorkItem]) -> String {
    if items.is_empty() {
        return EMPTY_TASKS_MESSAGE.to_string();
    }

    let mut message = String::from("<b>Incomplete Tasks:</b>\n\n");
    for item in items {
        message.push_str(&format!(
            "• <b>Task #{}</b> (User {})\n  {}\n\n",
            item.id, item.user_id, item.title
        ));
    }

    message
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: i64, user_id: i64, title: &str) -> WorkItem {
        WorkItem {
            id,
            user_id,
            title: title.to_string(),
            completed: false,
        }
    }

    #[test]
    fn test_render_empty_returns_fixed_message() {
        assert_eq!(render_tasks(&[]), EMPTY_TASKS_MESSAGE);
    }

    #[test]
    fn test_render_contains_every_item_once() {
        let items = vec![item(1, 1, "Test task 1"), item(2, 2, "Test task 2")];
        let message = render_tasks(&items);

        assert!(message.contains("<b>Incomplete Tasks:</b>"));
        assert_eq!(message.matches("Task #1").count(), 1);
        assert_eq!(message.matches("Task #2").count(), 1);
        assert_eq!(message.matches("Test task 1").count(), 1);
        assert_eq!(message.matches("Test task 2").count(), 1);
        assert!(message.contains("(User 1)"));
        assert!(message.contains("(User 2)"));
    }

    #[test]
    fn test_render_preserves_input_order() {
        let items = vec![item(9, 4, "later"), item(3, 2, "earlier")];
        let message = render_tasks(&items);

        let first = message.find("Task #9").unwrap();
        let second = message.find("Task #3").unwrap();
        assert!(first < second);
    }
}
