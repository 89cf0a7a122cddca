//! Interactive menu mode.

use crate::console::Console;
use log::debug;
use notemail_rs_core::{LoginOutcome, Mailbox, Session};
use std::io::{self, BufRead, Write};

pub const MENU_WELCOME: &str = "Welcome to NotionMail with Semantic Search!";
pub const MENU_GOODBYE: &str = "Exiting NotionMail. Goodbye!";
pub(crate) const LOGIN_PROMPT: &str = "Enter your name to log in: ";

const MENU_TEXT: &str = "\nPlease select an option:\n\
- login:             Log in to your account.\n\
- logout:            Log out of your account.\n\
- send:              Send mail to a user.\n\
- read:              Check your mail.\n\
- search:            Keyword search (exact matching).\n\
- semantic_search:   Semantic search using meaning similarity.\n\
- exit:              Exit the application.\n";

/// One menu entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuOption {
    Login,
    Logout,
    Send,
    Read,
    Search,
    SemanticSearch,
    Exit,
}

impl MenuOption {
    /// Parse a menu choice, ignoring case and surrounding whitespace.
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim().to_lowercase().as_str() {
            "login" => Some(Self::Login),
            "logout" => Some(Self::Logout),
            "send" => Some(Self::Send),
            "read" => Some(Self::Read),
            "search" => Some(Self::Search),
            "semantic_search" => Some(Self::SemanticSearch),
            "exit" => Some(Self::Exit),
            _ => None,
        }
    }

    /// What the option does, for the not-logged-in message.
    fn activity(self) -> &'static str {
        match self {
            Self::Send => "send mail",
            Self::Read => "read mail",
            Self::Search => "search messages",
            Self::SemanticSearch => "perform semantic search",
            Self::Login | Self::Logout | Self::Exit => "continue",
        }
    }
}

/// Run the menu until `exit` or end of input.
pub async fn run_menu<R: BufRead, W: Write>(
    mailbox: &Mailbox,
    console: &mut Console<R, W>,
) -> io::Result<()> {
    let mut session = Session::new();
    console.say(MENU_WELCOME)?;
    loop {
        console.say(MENU_TEXT)?;
        let Some(choice) = console.prompt("$ ")? else {
            break;
        };
        let Some(option) = MenuOption::parse(&choice) else {
            console.say("Invalid option. Please choose one of the listed commands.")?;
            continue;
        };
        debug!("menu option selected (option={option:?})");

        match option {
            MenuOption::Login => match session.identity() {
                Some(current) => console.say(LoginOutcome::AlreadyLoggedIn(current.clone()))?,
                None => {
                    let Some(name) = console.prompt(LOGIN_PROMPT)? else {
                        break;
                    };
                    console.say(session.login(&name))?;
                }
            },
            MenuOption::Logout => console.say(session.logout())?,
            MenuOption::Exit => {
                console.say(MENU_GOODBYE)?;
                break;
            }
            MenuOption::Send
            | MenuOption::Read
            | MenuOption::Search
            | MenuOption::SemanticSearch => {
                let Some(identity) = session.identity().cloned() else {
                    console.say(format!(
                        "You must be logged in to {}. Please log in first.",
                        option.activity()
                    ))?;
                    continue;
                };
                match option {
                    MenuOption::Send => {
                        let Some(recipient) = console.prompt("Recipient: ")? else {
                            break;
                        };
                        let Some(body) = console.prompt("Message: ")? else {
                            break;
                        };
                        console.say(mailbox.send(&identity, &recipient, &body).await)?;
                    }
                    MenuOption::Read => console.say(mailbox.read(&identity).await)?,
                    MenuOption::Search => {
                        let Some(term) = console.prompt("Enter a keyword to search: ")? else {
                            break;
                        };
                        if term.is_empty() {
                            console.say("Please provide a valid search term.")?;
                        } else {
                            console.say(mailbox.search(&term, &identity).await)?;
                        }
                    }
                    _ => {
                        let Some(query) = console.prompt("Enter a phrase for semantic search: ")?
                        else {
                            break;
                        };
                        if query.is_empty() {
                            console.say("Please provide a valid query.")?;
                        } else {
                            console.say(
                                mailbox.semantic_search(&query, identity.as_str()).await,
                            )?;
                        }
                    }
                }
            }
        }
    }
    Ok(())
}
