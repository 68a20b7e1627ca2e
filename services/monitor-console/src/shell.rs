//! Line-oriented operator commands

use std::fmt::Write as _;
use std::str::FromStr;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio_util::sync::CancellationToken;

use crate::console::Console;
use crate::form::FormField;
use crate::ConsoleError;

const MASK: &str = "********";

const HELP: &str = "\
Commands:
  show                  print the configuration form
  set <field> <value>   edit one field (value may be empty or contain spaces)
  save                  submit the whole form to the server
  reload                fetch the configuration from the server again
  status                print status poller counters
  help                  print this help
  quit                  leave the console
";

/// A parsed operator command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Show,
    Set { field: FormField, value: String },
    Save,
    Reload,
    Status,
    Help,
    Quit,
}

impl FromStr for Command {
    type Err = ConsoleError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim_end_matches(['\r', '\n']).trim_start();
        let (word, rest) = line.split_once(' ').unwrap_or((line, ""));

        match word {
            "show" => Ok(Command::Show),
            "save" => Ok(Command::Save),
            "reload" => Ok(Command::Reload),
            "status" => Ok(Command::Status),
            "help" | "?" => Ok(Command::Help),
            "quit" | "exit" => Ok(Command::Quit),
            "set" => {
                let (field, value) = rest.split_once(' ').unwrap_or((rest, ""));
                if field.is_empty() {
                    return Err(ConsoleError::Command(
                        "usage: set <field> <value>".to_string(),
                    ));
                }
                Ok(Command::Set {
                    field: field.parse()?,
                    value: value.to_string(),
                })
            }
            other => Err(ConsoleError::Command(format!("'{}' (try 'help')", other))),
        }
    }
}

/// Run one command against the console and return the text to print.
/// `Quit` prints nothing; ending the loop is up to the caller.
pub async fn execute(console: &Console, command: Command) -> String {
    match command {
        Command::Show => {
            let form = console.synchronizer().form().await;
            let mut out = String::new();
            for field in FormField::ALL {
                let value = form.get(field);
                let shown = if field.is_secret() && !value.is_empty() {
                    MASK
                } else {
                    value
                };
                let _ = writeln!(out, "{:<36} {}", field.id(), shown);
            }
            out
        }
        Command::Set { field, value } => {
            console.synchronizer().set_field(field, value).await;
            format!("{} updated locally; 'save' to submit\n", field)
        }
        Command::Save => {
            if console.synchronizer().submit_config().await {
                "Configuration saved\n".to_string()
            } else {
                "Configuration not saved\n".to_string()
            }
        }
        Command::Reload => {
            if console.synchronizer().fetch_config().await {
                "Configuration reloaded\n".to_string()
            } else {
                "Configuration unchanged\n".to_string()
            }
        }
        Command::Status => {
            let status = console.poller().status().read().await.clone();
            format!(
                "state: {}\npolls: {}\nconsecutive failures: {}\nlast message: {}\n",
                console.state().await,
                status.polls,
                status.consecutive_failures,
                status.last_message.as_deref().unwrap_or("-")
            )
        }
        Command::Help => HELP.to_string(),
        Command::Quit => String::new(),
    }
}

/// Read commands until `quit`, end of input, or cancellation
pub async fn run_shell<R, W>(
    console: &Console,
    input: R,
    mut output: W,
    cancel: CancellationToken,
) -> crate::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = input.lines();
    output.write_all(HELP.as_bytes()).await?;
    output.flush().await?;

    loop {
        let line = tokio::select! {
            line = lines.next_line() => line?,
            _ = cancel.cancelled() => break,
        };
        let Some(line) = line else {
            tracing::debug!("End of command input");
            break;
        };
        if line.trim().is_empty() {
            continue;
        }

        let text = match line.parse::<Command>() {
            Ok(Command::Quit) => break,
            Ok(command) => execute(console, command).await,
            Err(e) => format!("{}\n", e),
        };
        output.write_all(text.as_bytes()).await?;
        output.flush().await?;
    }

    Ok(())
}
