use crate::client::TodoState;

/// Draws the whole screen for `state`. Pure: same state, same text.
pub fn render(state: &TodoState) -> String {
    let mut out = format!("Todo List\n> {}\n", state.draft);
    if let Some(error) = &state.error {
        out.push_str(&format!("! {error}\n"));
    }
    out.push_str(&format!("\nTasks ({} total)\n", state.todos.len()));

    if state.loading {
        out.push_str("  Loading...\n");
    } else if state.todos.is_empty() {
        out.push_str("  No todos yet. Add one above!\n");
    } else {
        for (index, todo) in state.todos.iter().enumerate() {
            let mark = if todo.completed { "x" } else { " " };
            out.push_str(&format!("  {:>2}. [{mark}] {}\n", index + 1, todo.text));
        }
    }

    if state.confirm_clear {
        out.push_str(concat!(
            "\nClear all tasks?\n",
            "This action cannot be undone. Are you sure you want to remove all todos?\n",
            "[y] Yes, clear   [n] Cancel\n",
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Todo, TodoId};

    fn todo(id: &str, text: &str, completed: bool) -> Todo {
        Todo {
            id: TodoId::from(id),
            text: text.into(),
            completed,
        }
    }

    #[test]
    fn empty_list_shows_hint() {
        let out = render(&TodoState::default());
        assert!(out.starts_with("Todo List\n"));
        assert!(out.contains("Tasks (0 total)"));
        assert!(out.contains("No todos yet. Add one above!"));
        assert!(!out.contains("Clear all tasks?"));
    }

    #[test]
    fn loading_hides_list() {
        let state = TodoState {
            todos: vec![todo("a", "hidden", false)],
            loading: true,
            ..Default::default()
        };
        let out = render(&state);
        assert!(out.contains("Loading..."));
        assert!(!out.contains("hidden"));
    }

    #[test]
    fn lists_todos_with_marks_and_error() {
        let state = TodoState {
            todos: vec![todo("a", "buy milk", false), todo("b", "walk dog", true)],
            draft: "call mom".into(),
            error: Some("Failed to create todo".into()),
            ..Default::default()
        };
        let out = render(&state);
        assert!(out.contains("> call mom"));
        assert!(out.contains("! Failed to create todo"));
        assert!(out.contains("Tasks (2 total)"));
        assert!(out.contains("   1. [ ] buy milk"));
        assert!(out.contains("   2. [x] walk dog"));
    }

    #[test]
    fn renders_full_screen_in_order() {
        let state = TodoState {
            todos: vec![todo("a", "buy milk", true)],
            draft: "next".into(),
            error: Some("Failed to load todos".into()),
            confirm_clear: true,
            ..Default::default()
        };
        assert_eq!(
            render(&state),
            "Todo List\n\
             > next\n\
             ! Failed to load todos\n\
             \n\
             Tasks (1 total)\n\
             \x20  1. [x] buy milk\n\
             \n\
             Clear all tasks?\n\
             This action cannot be undone. Are you sure you want to remove all todos?\n\
             [y] Yes, clear   [n] Cancel\n"
        );
    }

    #[test]
    fn confirm_dialog_is_rendered_when_requested() {
        let state = TodoState {
            confirm_clear: true,
            ..Default::default()
        };
        let out = render(&state);
        assert!(out.contains("Clear all tasks?"));
        assert!(out.contains("[y] Yes, clear   [n] Cancel"));
    }
}
