use anyhow::Context;
use prk_todo::client::{render, ReconcilePolicy, TodoClient, TodoController};
use prk_todo::config::ClientConfig;
use prk_todo::core::TodoId;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};

const HELP: &str = "commands: add <text> | toggle <n> | delete <n> | clear | reload | help | quit";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    #[cfg(feature = "tracing")]
    tracing_subscriber::fmt()
        .with_env_filter(std::env::var("RUST_LOG").unwrap_or_else(|_| "warn".to_string()))
        .with_writer(std::io::stderr)
        .init();

    let policy = if std::env::args().any(|arg| arg == "--compat") {
        ReconcilePolicy::Compatible
    } else {
        ReconcilePolicy::ServerConfirmed
    };
    let client = TodoClient::new(ClientConfig::from_env()).context("failed to build HTTP client")?;
    let mut controller = TodoController::new(Arc::new(client), policy);

    controller.load().await;
    print!("{}", render(&controller.state()));
    println!("{HELP}");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        let (command, rest) = line.split_once(' ').unwrap_or((line, ""));
        let state = controller.state();

        if state.confirm_clear {
            match command {
                "y" | "yes" => controller.confirm_clear().await,
                _ => controller.cancel_clear(),
            }
        } else {
            match command {
                "" => continue,
                "add" => {
                    controller.set_draft(rest);
                    controller.add().await;
                }
                "toggle" | "delete" => match pick(&state.todos, rest) {
                    Some(id) if command == "toggle" => controller.toggle(&id).await,
                    Some(id) => controller.delete(&id).await,
                    None => {
                        println!("no todo numbered {rest:?}");
                        continue;
                    }
                },
                "clear" => controller.request_clear(),
                "reload" => controller.load().await,
                "quit" | "exit" => break,
                _ => {
                    println!("{HELP}");
                    continue;
                }
            }
        }
        print!("{}", render(&controller.state()));
    }

    controller.settle().await;
    Ok(())
}

/// Resolves a 1-based list position typed by the user.
fn pick(todos: &[prk_todo::core::Todo], raw: &str) -> Option<TodoId> {
    let index = raw.trim().parse::<usize>().ok()?.checked_sub(1)?;
    todos.get(index).map(|todo| todo.id.clone())
}
