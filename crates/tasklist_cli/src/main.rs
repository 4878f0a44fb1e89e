use clap::{CommandFactory, Parser};
use std::cell::RefCell;
use std::io::{self, BufRead};
use std::rc::Rc;
use tasklist_cli::cli::{Cli, Command, normalize_parse_error, split_command_line};
use tasklist_cli::theme::{self, Palette};
use tasklist_core::error::AppError;
use tasklist_core::model::Task;
use tasklist_core::storage::json_store;
use tasklist_core::store::TaskStore;
use tasklist_core::view::{ViewEvent, ViewSink};

const TASK_MISSING_NOTICE: &str = "Task doesn't exist";

/// Collects store events for the current dispatch; the view decides how to
/// render each one after the operation returns.
#[derive(Clone, Default)]
struct EventBuffer {
    events: Rc<RefCell<Vec<ViewEvent>>>,
}

impl ViewSink for EventBuffer {
    fn handle(&self, event: &ViewEvent) {
        self.events.borrow_mut().push(event.clone());
    }
}

impl EventBuffer {
    fn drain(&self) -> Vec<ViewEvent> {
        self.events.borrow_mut().drain(..).collect()
    }

    fn drain_saw_missing(&self) -> bool {
        self.drain()
            .into_iter()
            .any(|event| matches!(event, ViewEvent::TaskMissing))
    }
}

struct App {
    store: TaskStore,
    events: EventBuffer,
    palette: Palette,
}

fn find_task<'a>(tasks: &'a [Task], id: &str) -> Option<&'a Task> {
    tasks.iter().find(|task| task.id == id)
}

fn render_tasks(tasks: &[Task], palette: &Palette) {
    for task in tasks {
        let checkbox = if task.status.is_completed() {
            "[x]"
        } else {
            "[ ]"
        };
        let row = format!("{checkbox} {} | {}", task.id, task.text);
        if task.status.is_completed() {
            println!("{}", palette.mutedize(&row));
        } else {
            println!("{row}");
        }
    }
}

fn print_task_json(task: &Task) -> Result<(), AppError> {
    let json =
        serde_json::to_string(task).map_err(|err| AppError::invalid_data(err.to_string()))?;
    println!("{json}");
    Ok(())
}

fn print_tasks_json(tasks: &[Task]) -> Result<(), AppError> {
    let json =
        serde_json::to_string(tasks).map_err(|err| AppError::invalid_data(err.to_string()))?;
    println!("{json}");
    Ok(())
}

fn print_help() {
    let mut cmd = Cli::command();
    let help = cmd.render_help();
    println!("{help}");
}

fn run_command(app: &mut App, cli: Cli) -> Result<(), AppError> {
    match cli.command {
        Command::Add { text } => {
            app.store.add_task(text.as_deref().unwrap_or(""));
            for event in app.events.drain() {
                if let ViewEvent::TaskAdded { id } = event
                    && let Some(task) = find_task(app.store.tasks(), &id)
                {
                    if cli.json {
                        print_task_json(task)?;
                    } else {
                        let line = format!("Added task: {} ({})", task.text, task.id);
                        println!("{}", app.palette.accentize(&line));
                    }
                }
            }
        }
        Command::Edit { id, new_text } => {
            app.store.begin_edit(&id);
            if app.events.drain_saw_missing() {
                eprintln!("{TASK_MISSING_NOTICE}");
                return Ok(());
            }

            let new_text = new_text.unwrap_or_default();
            let applied = !new_text.trim().is_empty();
            app.store.commit_edit(&new_text);
            app.events.drain();

            if applied && let Some(task) = find_task(app.store.tasks(), &id) {
                if cli.json {
                    print_task_json(task)?;
                } else {
                    println!("Updated task: {} ({})", task.text, task.id);
                }
            }
        }
        Command::Delete { id } => {
            let removed = find_task(app.store.tasks(), &id).cloned();
            app.store.delete_task(&id);
            if let Some(task) = removed {
                if cli.json {
                    print_task_json(&task)?;
                } else {
                    println!("Deleted task: {} ({})", task.text, task.id);
                }
            }
        }
        Command::Done { id } => {
            app.store.complete_task(&id);
            if let Some(task) = find_task(app.store.tasks(), &id) {
                if cli.json {
                    print_task_json(task)?;
                } else {
                    println!("Completed task: {} ({})", task.text, task.id);
                }
            }
        }
        Command::Clear => {
            let completed = app
                .store
                .tasks()
                .iter()
                .filter(|task| task.status.is_completed())
                .count();
            app.store.clear_completed();
            if cli.json {
                print_tasks_json(app.store.tasks())?;
            } else {
                println!("Cleared {completed} completed task(s)");
            }
        }
        Command::List => {
            if cli.json {
                print_tasks_json(app.store.tasks())?;
            } else {
                render_tasks(app.store.tasks(), &app.palette);
            }
        }
    }

    Ok(())
}

fn run_edit_prompt(
    app: &mut App,
    id: &str,
    stdin_lock: &mut impl BufRead,
) -> Result<(), AppError> {
    app.store.begin_edit(id);
    if app.events.drain_saw_missing() {
        eprintln!("{TASK_MISSING_NOTICE}");
        return Ok(());
    }

    println!(
        "Editing {} (current: {}). Enter new text:",
        id,
        app.store.edit_text().unwrap_or("")
    );

    let mut input = String::new();
    stdin_lock
        .read_line(&mut input)
        .map_err(|err| AppError::io(err.to_string()))?;

    app.store.commit_edit(&input);
    app.events.drain();
    render_tasks(app.store.tasks(), &app.palette);
    Ok(())
}

fn run_interactive(app: &mut App) -> Result<(), AppError> {
    let mut input = String::new();
    let stdin = io::stdin();
    let mut stdin_lock = stdin.lock();

    render_tasks(app.store.tasks(), &app.palette);

    loop {
        input.clear();
        let bytes = stdin_lock
            .read_line(&mut input)
            .map_err(|err| AppError::io(err.to_string()))?;

        if bytes == 0 {
            break;
        }

        let line = input.trim();
        if line.is_empty() {
            continue;
        }

        if line.eq_ignore_ascii_case("exit") || line.eq_ignore_ascii_case("quit") {
            break;
        }

        if line == "help" || line == "?" {
            print_help();
            continue;
        }

        let args = match split_command_line(line) {
            Ok(args) => args,
            Err(err) => {
                eprintln!("ERROR: {}", err);
                continue;
            }
        };

        if args.is_empty() {
            continue;
        }

        let mut argv = Vec::with_capacity(args.len() + 1);
        argv.push("tasklist".to_string());
        argv.extend(args);

        let cli = match Cli::try_parse_from(argv) {
            Ok(cli) => cli,
            Err(err) => {
                eprintln!("ERROR: {}", normalize_parse_error(err));
                continue;
            }
        };

        // `edit ID` without text is the two-step edit-mode flow: the current
        // text seeds the prompt and the next line is the commit.
        if let Command::Edit { id, new_text: None } = &cli.command {
            let id = id.clone();
            if let Err(err) = run_edit_prompt(app, &id, &mut stdin_lock) {
                eprintln!("ERROR: {}", err);
            }
            continue;
        }

        let rerender = !matches!(cli.command, Command::List);
        if let Err(err) = run_command(app, cli) {
            eprintln!("ERROR: {}", err);
            continue;
        }
        if rerender {
            render_tasks(app.store.tasks(), &app.palette);
        }
    }

    Ok(())
}

fn main() {
    let _logger = flexi_logger::Logger::try_with_env_or_str("warn")
        .ok()
        .and_then(|logger| logger.start().ok());

    let path = match json_store::store_path() {
        Ok(path) => path,
        Err(err) => {
            eprintln!("ERROR: {}", err);
            std::process::exit(1);
        }
    };

    let config = theme::load_config();
    let palette = theme::palette_for_theme(config.theme.as_deref());
    let events = EventBuffer::default();
    let mut store = TaskStore::open(path, Box::new(events.clone()));
    store.initialize();

    let mut app = App {
        store,
        events,
        palette,
    };

    let mut args = std::env::args_os();
    args.next();
    if args.next().is_none() {
        if let Err(err) = run_interactive(&mut app) {
            eprintln!("ERROR: {}", err);
            std::process::exit(1);
        }
        return;
    }

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            eprintln!("ERROR: {}", normalize_parse_error(err));
            std::process::exit(1);
        }
    };

    if let Err(err) = run_command(&mut app, cli) {
        eprintln!("ERROR: {}", err);
        std::process::exit(1);
    }
}
