// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! A tiny shell on top of [`Readline`].
//!
//! ```text
//! cargo run --example shell -- --vi --log-file /tmp/shell.log --log-level debug
//! ```

use std::{str::FromStr, sync::Arc, time::Duration};

use clap::Parser;
use crossterm::style::{ContentStyle, Stylize};
use r3bl_readline::{CancellationToken, Capability, Connection, EditMode, Prompt, Readline,
                    ReadlineEvent, SafeCompletion, Signal, SleepOutcome, TerminalConnection,
                    TracingConfig, WordListCompletion, ZERO_MASK, init_tracing};
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, EnumString};
use tracing_core::LevelFilter;

#[derive(Debug, Parser)]
#[command(about = "Line editing playground", version)]
struct CliArgs {
    /// Use Vi key bindings instead of Emacs ones.
    #[arg(long)]
    vi: bool,

    /// Write log output to this file.
    #[arg(long)]
    log_file: Option<String>,

    /// One of `off`, `error`, `warn`, `info`, `debug`, `trace`.
    #[arg(long, default_value = "info")]
    log_level: String,
}

/// More info:
/// - <https://docs.rs/strum_macros/latest/strum_macros/derive.EnumString.html>
/// - <https://docs.rs/strum_macros/latest/strum_macros/derive.EnumIter.html>
#[derive(Debug, PartialEq, EnumString, EnumIter, Display)]
#[strum(serialize_all = "lowercase")]
enum Command {
    #[strum(ascii_case_insensitive)]
    Help,

    #[strum(ascii_case_insensitive)]
    Sleep,

    #[strum(ascii_case_insensitive)]
    Login,

    #[strum(ascii_case_insensitive)]
    Man,

    #[strum(ascii_case_insensitive)]
    Clear,

    #[strum(ascii_case_insensitive, to_string = "exit", serialize = "quit")]
    Exit,
}

#[derive(Clone)]
struct Shell {
    readline: Readline,
    connection: Arc<dyn Connection>,
    completions: Vec<SafeCompletion>,
}

fn main() -> miette::Result<()> {
    let cli_args = CliArgs::parse();

    if let Some(log_file) = cli_args.log_file {
        let level_filter = LevelFilter::from_str(&cli_args.log_level)
            .map_err(|err| miette::miette!("invalid log level: {err}"))?;
        init_tracing(TracingConfig::new_file(Some(log_file), level_filter))?;
    }

    let edit_mode = if cli_args.vi { EditMode::vi() } else { EditMode::emacs() };
    let connection = TerminalConnection::stdio()?;

    let commands = Command::iter().map(|it| it.to_string()).collect::<Vec<_>>();
    let shell = Shell {
        readline: Readline::new(edit_mode),
        connection: connection.clone(),
        completions: vec![Arc::new(WordListCompletion::new(commands))],
    };

    shell.connection.write(&help_message());
    shell.read_command();
    connection.open_blocking(None);

    tracing::info!(message = "shell exited");
    Ok(())
}

fn help_message() -> String {
    let commands = Command::iter().map(|it| it.to_string()).collect::<Vec<_>>();
    format!(
        "{}: {}\n{}\n",
        "Available commands".bold(),
        commands.join(", ").green(),
        "try Tab, Up, Down, Ctrl+C, and a trailing ` \\` to continue a line".blue()
    )
}

fn prompt() -> Prompt {
    Prompt::from_segments([
        ("[", ContentStyle::new().blue()),
        ("shell", ContentStyle::new().red().bold()),
        ("]$ ", ContentStyle::new().blue()),
    ])
}

impl Shell {
    fn read_command(&self) {
        let shell = self.clone();
        self.read(prompt(), self.completions.clone(), move |event| match event {
            ReadlineEvent::Line(line) => shell.run(&line),
            ReadlineEvent::Eof => shell.connection.close(),
        });
    }

    fn read(
        &self,
        prompt: Prompt,
        completions: Vec<SafeCompletion>,
        callback: impl FnOnce(ReadlineEvent) + Send + 'static,
    ) {
        if let Err(err) = self.readline.readline_with_completions(
            &self.connection,
            prompt,
            completions,
            callback,
        ) {
            tracing::error!(message = "readline failed", %err);
            self.connection.close();
        }
    }

    fn run(&self, line: &str) {
        tracing::info!(message = "command", line);
        let mut words = line.split_whitespace();
        let Some(first) = words.next() else {
            return self.read_command();
        };

        match Command::from_str(first) {
            Ok(Command::Exit) => self.connection.close(),
            Ok(Command::Help) => {
                self.connection.write(&help_message());
                self.read_command();
            }
            Ok(Command::Clear) => {
                self.connection.put(&Capability::ClearScreen);
                self.read_command();
            }
            Ok(Command::Sleep) => {
                let seconds = words.next().and_then(|it| it.parse().ok()).unwrap_or(3);
                self.sleep(Duration::from_secs(seconds));
                self.read_command();
            }
            Ok(Command::Login) => self.login(),
            Ok(Command::Man) => self.man(),
            Err(_) => {
                self.connection.write(&format!("unknown command: {first}\n"));
                self.read_command();
            }
        }
    }

    /// Blocks the read loop. `Ctrl+C` cancels the sleep instead of closing the
    /// connection.
    fn sleep(&self, duration: Duration) {
        let token = CancellationToken::new();
        let previous = self.connection.signal_handler();
        self.connection.set_signal_handler(Some({
            let token = token.clone();
            Arc::new(move |signal: Signal| {
                if signal == Signal::Int {
                    token.cancel();
                }
            })
        }));

        self.connection.write(&format!("sleeping for {}s\n", duration.as_secs()));
        let message = match token.sleep(duration) {
            SleepOutcome::Completed => "done\n",
            SleepOutcome::Cancelled => "^C cancelled\n",
        };
        self.connection.set_signal_handler(previous);
        self.connection.write(message);
    }

    fn login(&self) {
        let shell = self.clone();
        self.read(Prompt::new("username: "), Vec::new(), move |event| {
            let ReadlineEvent::Line(username) = event else {
                return shell.read_command();
            };
            let shell_clone = shell.clone();
            shell.read(
                Prompt::new("password: ").with_mask(ZERO_MASK),
                Vec::new(),
                move |event| {
                    if let ReadlineEvent::Line(password) = event {
                        let message = if password.is_empty() {
                            format!("no password given for {username}\n")
                        } else {
                            format!("welcome {username}\n")
                        };
                        shell_clone.connection.write(&message);
                    }
                    shell_clone.read_command();
                },
            );
        });
    }

    /// A sub prompt with its own `Readline`, so the shell keeps its history.
    fn man(&self) {
        let sub_shell = Shell {
            readline: Readline::new(EditMode::emacs()),
            ..self.clone()
        };
        let shell = self.clone();
        sub_shell.read(Prompt::new("write something: "), Vec::new(), move |event| {
            if let ReadlineEvent::Line(line) = event {
                shell.connection.write(&format!("you wrote: {line}\n"));
            }
            shell.read_command();
        });
    }
}
