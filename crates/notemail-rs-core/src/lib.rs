//! Mail operations, search and the model-driven command interpreter.
//!
//! Front ends build a [`MailServices`] from configuration and drive the
//! [`Mailbox`] directly (menu mode) or through an [`Interpreter`] (chat
//! mode). Operations return outcome values whose `Display` output is what
//! the user sees.

pub mod error;
pub mod filter;
pub mod instructions;
pub mod interpreter;
pub mod mailbox;
mod render;
pub mod search;
pub mod semantic;
pub mod services;
pub mod session;

pub use error::{CoreError, TurnError};
pub use filter::involves;
pub use instructions::{
    BUILTIN_INSTRUCTIONS, DEFAULT_INSTRUCTIONS_FILE, InstructionDocument, load_instructions,
};
/// Command interpretation and the chat loop state.
pub use interpreter::{
    ChatSession, ChatState, ChatTurn, Command, CommandPlan, Interpreter, NO_COMMANDS_OUTPUT,
    TurnReport, parse_plan,
};
pub use mailbox::{IndexStatus, Mailbox, ReadOutcome, SendOutcome};
pub use render::SEPARATOR;
pub use search::{KeywordOutcome, keyword_search};
pub use semantic::{SemanticOutcome, SemanticSettings, semantic_search};
pub use services::{MailServices, semantic_settings};
pub use session::{LoginOutcome, LogoutOutcome, Session};
