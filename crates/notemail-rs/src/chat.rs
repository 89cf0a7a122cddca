//! Conversational mode driven by the command interpreter.

use crate::console::Console;
use crate::menu::LOGIN_PROMPT;
use notemail_rs_core::{ChatSession, ChatTurn, CommandPlan, Interpreter, LoginOutcome, Session};
use notemail_rs_protocol::Identity;
use std::io::{self, BufRead, Write};

pub const CHAT_WELCOME: &str = "Welcome to Chat-based NotionMail!";
const FOLLOW_UP: &str = "\nHow else can I help you today? (type 'exit' to quit)";

/// Ask for a name until a non-empty one is given; `None` at end of input.
fn login_until_valid<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
) -> io::Result<Option<Identity>> {
    loop {
        let Some(name) = console.prompt(LOGIN_PROMPT)? else {
            return Ok(None);
        };
        let outcome = Session::new().login(&name);
        console.say(&outcome)?;
        if let LoginOutcome::LoggedIn(identity) = outcome {
            return Ok(Some(identity));
        }
    }
}

fn print_plan<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    plan: &CommandPlan,
) -> io::Result<()> {
    if let Some(warning) = &plan.warning {
        console.say(format!("Warning: {warning}"))?;
    }
    console.say("\n[AI Instructions]")?;
    let pretty = serde_json::to_string_pretty(&plan.instruction).map_err(io::Error::other)?;
    console.say(pretty)
}

/// Log in, then answer utterances until `exit`, `quit` or end of input.
pub async fn run_chat<R: BufRead, W: Write>(
    interpreter: &Interpreter,
    console: &mut Console<R, W>,
) -> io::Result<()> {
    console.say(CHAT_WELCOME)?;
    let Some(identity) = login_until_valid(console)? else {
        return Ok(());
    };
    console.say(format!("Hello {identity}, how can I help you today?"))?;

    let mut chat = ChatSession::new(identity);
    loop {
        let Some(line) = console.prompt("You: ")? else {
            break;
        };
        let mut printed = Ok(());
        let turn = chat
            .submit_with(interpreter, &line, |plan| printed = print_plan(console, plan))
            .await;
        printed?;

        match turn {
            ChatTurn::Exited => {
                console.say("Goodbye!")?;
                break;
            }
            ChatTurn::Skipped => {}
            ChatTurn::Answered(report) => {
                console.say("\n[Final Answer]")?;
                console.say(report.summary)?;
                console.say(FOLLOW_UP)?;
            }
            ChatTurn::Unsummarized { output, reason, .. } => {
                console.say("\n[Command Output]")?;
                console.say(output.trim_end())?;
                console.say(format!("\nError: could not summarize the result: {reason}"))?;
                console.say(FOLLOW_UP)?;
            }
            ChatTurn::Failed(reason) => {
                console.say(format!("\nError: {reason}"))?;
                console.say(FOLLOW_UP)?;
            }
        }
    }
    Ok(())
}
