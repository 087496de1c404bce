use std::borrow::Cow::{self, Borrowed, Owned};
use std::sync::Arc;

use anyhow::Result;
use colored::Colorize;
use rustyline::Editor;
use rustyline::completion::{Completer, Pair};
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::{Context, Helper};
use tracing_subscriber::EnvFilter;

use solace_application::{ChatController, SUGGESTED_QUESTIONS, SessionIdentityManager, SubmissionOutcome};
use solace_core::message::{Message, MessageRole};
use solace_core::session::SessionId;
use solace_core::stress::StressTrigger;
use solace_infrastructure::ConfigStorage;
use solace_interaction::services_from_config;

/// CLI helper for rustyline that provides completion, highlighting, and hints.
#[derive(Clone)]
struct CliHelper {
    commands: Vec<String>,
}

impl CliHelper {
    fn new() -> Self {
        Self {
            commands: vec![
                "/suggest".to_string(),
                "/use".to_string(),
                "/send".to_string(),
                "/resume".to_string(),
            ],
        }
    }
}

impl Helper for CliHelper {}

impl Completer for CliHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let line = &line[..pos];

        if line.starts_with('/') {
            let candidates: Vec<Pair> = self
                .commands
                .iter()
                .filter(|cmd| cmd.starts_with(line))
                .map(|cmd| Pair {
                    display: cmd.clone(),
                    replacement: cmd.clone(),
                })
                .collect();
            Ok((0, candidates))
        } else {
            Ok((0, vec![]))
        }
    }
}

impl Highlighter for CliHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        if line.starts_with('/') {
            Owned(line.bright_cyan().to_string())
        } else {
            Borrowed(line)
        }
    }
}

impl Hinter for CliHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &Context<'_>) -> Option<String> {
        let line = &line[..pos];

        if line.starts_with('/') && !line.contains(' ') {
            self.commands
                .iter()
                .find(|cmd| cmd.starts_with(line) && cmd.len() > line.len())
                .map(|cmd| cmd[line.len()..].to_string())
        } else {
            None
        }
    }
}

impl Validator for CliHelper {}

fn print_message(message: &Message) {
    match message.role {
        MessageRole::User => {
            println!("{}", format!("you: {}", message.content).green());
        }
        MessageRole::Assistant => {
            for line in message.content.lines() {
                println!("{}", line.bright_blue());
            }
        }
    }
}

fn print_wellbeing_pause(trigger: &StressTrigger) {
    println!();
    println!(
        "{}",
        format!("It sounds like things feel {} right now.", trigger.keyword).bright_yellow()
    );
    println!(
        "{}",
        format!("Let's take a short break: {}", trigger.activity.title).bright_yellow()
    );
    println!("{}", trigger.activity.description.yellow());
    println!(
        "{}",
        "Type '/resume' when you're ready to continue.".bright_black()
    );
    println!();
}

/// The entry point for the Solace chat REPL.
///
/// Resumes the session given as the first argument, or creates a new one.
/// Normal lines are submitted to the assistant; `/suggest` lists suggested
/// questions, `/use N` populates the draft with one, `/send` submits the
/// draft, and `/resume` resolves an active wellbeing pause.
#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    // ===== Backend Initialization =====
    let config = ConfigStorage::default_location()
        .map(|storage| storage.load_or_default())
        .unwrap_or_default();

    let (assistant, history, sessions) = services_from_config(&config)?;

    let identity = match std::env::args().nth(1) {
        Some(token) => {
            SessionIdentityManager::with_active(Arc::new(sessions), SessionId::new(token)?)
        }
        None => SessionIdentityManager::new(Arc::new(sessions)),
    };
    identity
        .set_navigation_callback(Arc::new(|session_id| {
            println!(
                "{}",
                format!("-> /therapy/{}", session_id).bright_black()
            );
        }))
        .await;
    let identity = Arc::new(identity);

    if identity.active().await.is_none() {
        identity.ensure_session().await?;
    }

    let controller = Arc::new(ChatController::new(
        identity.clone(),
        Arc::new(history),
        Arc::new(assistant),
    ));
    controller.on_entry().await?;

    // ===== REPL Setup =====
    let helper = CliHelper::new();
    let mut rl = Editor::new()?;
    rl.set_helper(Some(helper));

    println!("{}", "=== Solace ===".bright_magenta().bold());
    if let Some(session_id) = identity.active().await {
        println!("{}", format!("session {}", session_id).bright_black());
    }
    println!(
        "{}",
        "Type a message, '/suggest' for ideas, or 'quit' to exit.".bright_black()
    );
    println!();

    for message in controller.messages().await {
        print_message(&message);
    }

    // ===== Main REPL Loop =====
    loop {
        let readline = rl.readline(">> ");

        match readline {
            Ok(line) => {
                let trimmed = line.trim();

                if trimmed == "quit" || trimmed == "exit" {
                    println!("{}", "Take care.".bright_green());
                    break;
                }

                if trimmed.is_empty() {
                    continue;
                }

                let _ = rl.add_history_entry(&line);

                match trimmed {
                    "/suggest" => {
                        for (index, question) in SUGGESTED_QUESTIONS.iter().enumerate() {
                            println!("  {}", format!("{}: {}", index, question).bright_cyan());
                        }
                        println!(
                            "{}",
                            "Pick one with '/use N', then '/send'.".bright_black()
                        );
                    }
                    "/resume" => match controller.resolve_pause().await {
                        Some(_) => {
                            println!("{}", "Welcome back. I'm listening.".bright_blue());
                        }
                        None => {
                            println!("{}", "Nothing to resume.".bright_black());
                        }
                    },
                    "/send" => {
                        let draft = controller.draft().await;
                        if draft.is_empty() {
                            println!("{}", "Nothing drafted. Try '/use N' first.".bright_black());
                        } else {
                            submit_and_render(&controller, &draft).await;
                        }
                    }
                    _ if trimmed.starts_with("/use") => {
                        let index = trimmed
                            .strip_prefix("/use")
                            .and_then(|rest| rest.trim().parse::<usize>().ok());
                        match index {
                            Some(index) => match controller.select_suggested_question(index).await {
                                Ok(Some(text)) => {
                                    println!("{}", format!("draft: {}", text).green());
                                }
                                Ok(None) => {
                                    println!("{}", "No such suggestion.".bright_black());
                                }
                                Err(err) => {
                                    eprintln!("{}", format!("{}", err).red());
                                }
                            },
                            None => {
                                println!("{}", "Usage: /use N".bright_black());
                            }
                        }
                    }
                    _ => {
                        submit_and_render(&controller, trimmed).await;
                    }
                }
            }
            Err(rustyline::error::ReadlineError::Interrupted) => {
                println!("{}", "CTRL-C detected. Type 'quit' to exit.".yellow());
            }
            Err(rustyline::error::ReadlineError::Eof) => {
                println!("{}", "CTRL-D detected. Exiting...".bright_green());
                break;
            }
            Err(err) => {
                eprintln!("{}", format!("Error: {:?}", err).red());
                break;
            }
        }
    }

    Ok(())
}

async fn submit_and_render(controller: &ChatController, text: &str) {
    match controller.submit(text).await {
        Ok(SubmissionOutcome::Replied(message)) => print_message(&message),
        Ok(SubmissionOutcome::Failed(message)) => print_message(&message),
        Ok(SubmissionOutcome::Paused(trigger)) => print_wellbeing_pause(&trigger),
        Ok(SubmissionOutcome::Rejected) => {
            println!("{}", "(not sent - finish the current step first)".bright_black());
        }
        Ok(SubmissionOutcome::Interrupted) => {
            println!("{}", "(reply discarded)".bright_black());
        }
        Err(err) => {
            eprintln!("{}", format!("{}", err).red());
        }
    }
}
