//! Natural-language command interpreter.
//!
//! Each utterance takes two model calls: one at the command temperature
//! that turns it into `{"commands": [...]}`, and one at the summary
//! temperature that turns the captured command output into a short reply.
//! Commands always run as the session identity; the model picks the
//! recipient of a send but never its sender.

use crate::error::TurnError;
use crate::instructions::InstructionDocument;
use crate::mailbox::Mailbox;
use log::{debug, info, warn};
use notemail_rs_config::AssistantConfig;
use notemail_rs_llm::{ChatProvider, ChatRequest, LlmError};
use notemail_rs_protocol::Identity;
use serde_json::{Value, json};
use std::sync::Arc;

/// Captured output when the model produced no commands.
pub const NO_COMMANDS_OUTPUT: &str = "No valid commands were generated.";

/// One operation requested by the model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Send { recipient: String, message: String },
    Read,
    Search { keyword: String },
    SemanticSearch { query: String },
    /// Action name as given, lowercased.
    Unknown(String),
}

impl Command {
    fn from_value(value: &Value) -> Self {
        let action = value
            .get("action")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .trim()
            .to_lowercase();
        let param = |name: &str| {
            value
                .get("params")
                .and_then(|params| params.get(name))
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string()
        };
        match action.as_str() {
            "send" => Command::Send {
                recipient: param("recipient"),
                message: param("message"),
            },
            "read" => Command::Read,
            "search" => Command::Search {
                keyword: param("keyword"),
            },
            "semantic_search" => Command::SemanticSearch {
                query: param("query"),
            },
            _ => Command::Unknown(action),
        }
    }
}

/// Parsed model reply.
#[derive(Debug, Clone, PartialEq)]
pub struct CommandPlan {
    /// Instruction object as understood, `{"commands": []}` when unusable.
    pub instruction: Value,
    pub commands: Vec<Command>,
    /// Set when the reply was not a usable command object.
    pub warning: Option<String>,
}

impl CommandPlan {
    fn empty(warning: String) -> Self {
        warn!("{warning}");
        Self {
            instruction: json!({ "commands": [] }),
            commands: Vec::new(),
            warning: Some(warning),
        }
    }
}

/// Remove a surrounding Markdown code fence, if any.
fn unwrap_code_fence(reply: &str) -> &str {
    let trimmed = reply.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let body = match rest.find('\n') {
        Some(newline) => &rest[newline + 1..],
        None => rest,
    };
    body.trim_end().strip_suffix("```").unwrap_or(body).trim()
}

/// Turn a model reply into a command plan; never fails.
pub fn parse_plan(reply: &str) -> CommandPlan {
    let text = unwrap_code_fence(reply);
    let value: Value = match serde_json::from_str(text) {
        Ok(value) => value,
        Err(_) => {
            return CommandPlan::empty(format!(
                "Could not parse JSON from model response: {}",
                reply.trim()
            ));
        }
    };
    let Some(commands) = value.get("commands").and_then(Value::as_array) else {
        return CommandPlan::empty(format!(
            "Model response has no command list: {}",
            reply.trim()
        ));
    };
    let commands = commands.iter().map(Command::from_value).collect();
    CommandPlan {
        instruction: value,
        commands,
        warning: None,
    }
}

/// Everything produced while handling one utterance.
#[derive(Debug, Clone, PartialEq)]
pub struct TurnReport {
    pub plan: CommandPlan,
    /// Concatenated textual output of every executed command.
    pub output: String,
    pub summary: String,
}

/// Model-driven dispatcher over the mailbox operations.
#[derive(Clone)]
pub struct Interpreter {
    mailbox: Mailbox,
    llm: Arc<dyn ChatProvider>,
    instructions: InstructionDocument,
    command_temperature: f32,
    summary_temperature: f32,
}

impl Interpreter {
    pub fn new(
        mailbox: Mailbox,
        llm: Arc<dyn ChatProvider>,
        instructions: InstructionDocument,
        config: &AssistantConfig,
    ) -> Self {
        Self {
            mailbox,
            llm,
            instructions,
            command_temperature: config.command_temperature,
            summary_temperature: config.summary_temperature,
        }
    }

    pub fn instructions(&self) -> &InstructionDocument {
        &self.instructions
    }

    /// Ask the model to translate an utterance into commands.
    pub async fn plan(&self, utterance: &str) -> Result<CommandPlan, LlmError> {
        let reply = self
            .llm
            .complete(ChatRequest::new(
                self.instructions.content.clone(),
                utterance,
                self.command_temperature,
            ))
            .await?;
        let plan = parse_plan(&reply);
        debug!("command plan parsed (commands={})", plan.commands.len());
        Ok(plan)
    }

    /// Run every command as `identity` and collect their output.
    pub async fn execute(&self, commands: &[Command], identity: &Identity) -> String {
        if commands.is_empty() {
            return NO_COMMANDS_OUTPUT.to_string();
        }
        let mut output = String::new();
        for command in commands {
            let rendered = self.run(command, identity).await;
            output.push_str(&rendered);
            output.push('\n');
        }
        output
    }

    async fn run(&self, command: &Command, identity: &Identity) -> String {
        info!("executing command (command={command:?}, identity={identity})");
        match command {
            Command::Send { recipient, message } => self
                .mailbox
                .send(identity, recipient, message)
                .await
                .to_string(),
            Command::Read => self.mailbox.read(identity).await.to_string(),
            Command::Search { keyword } if keyword.trim().is_empty() => {
                "Please provide a valid search term.\n".to_string()
            }
            Command::Search { keyword } => {
                self.mailbox.search(keyword.trim(), identity).await.to_string()
            }
            Command::SemanticSearch { query } if query.trim().is_empty() => {
                "Please provide a valid query.\n".to_string()
            }
            Command::SemanticSearch { query } => self
                .mailbox
                .semantic_search(query.trim(), identity.as_str())
                .await
                .to_string(),
            Command::Unknown(action) => format!("Unknown action: {action}\n"),
        }
    }

    /// Ask the model for a short reply addressed to `identity`.
    pub async fn summarize(
        &self,
        utterance: &str,
        output: &str,
        identity: &Identity,
    ) -> Result<String, LlmError> {
        let system = format!(
            "You are a concise email assistant for {identity}. Address {identity} directly in first person. \
Keep your responses brief but informative. Include only the most relevant information from the email operations. \
Don't use unnecessary words or explanations."
        );
        let user = format!(
            "User prompt: {utterance}\n\nCommand output:\n{output}\n\n\
Provide a concise, direct answer. Remember you're talking to {identity}."
        );
        self.llm
            .complete(ChatRequest::new(system, user, self.summary_temperature))
            .await
    }

    /// Plan, execute and summarize one utterance.
    pub async fn handle(
        &self,
        utterance: &str,
        identity: &Identity,
    ) -> Result<TurnReport, TurnError> {
        self.handle_with(utterance, identity, |_| {}).await
    }

    /// Like [`Interpreter::handle`], calling `on_plan` before any command runs.
    pub async fn handle_with<F>(
        &self,
        utterance: &str,
        identity: &Identity,
        mut on_plan: F,
    ) -> Result<TurnReport, TurnError>
    where
        F: FnMut(&CommandPlan),
    {
        let plan = self.plan(utterance).await?;
        on_plan(&plan);
        let output = self.execute(&plan.commands, identity).await;
        let summary = match self.summarize(utterance, &output, identity).await {
            Ok(summary) => summary,
            Err(source) => {
                return Err(TurnError::Summary {
                    plan,
                    output,
                    source,
                });
            }
        };
        Ok(TurnReport {
            plan,
            output,
            summary,
        })
    }
}

/// Where a chat session is in its loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatState {
    AwaitingUtterance,
    Dispatching,
    Exited,
}

/// Result of submitting one line to a chat session.
#[derive(Debug, Clone, PartialEq)]
pub enum ChatTurn {
    /// The user asked to leave.
    Exited,
    /// Blank input; nothing was sent to the model.
    Skipped,
    Answered(TurnReport),
    /// Commands ran but the summary call failed.
    Unsummarized {
        plan: CommandPlan,
        output: String,
        reason: String,
    },
    /// Planning failed before any command ran; the session continues.
    Failed(String),
}

/// Chat loop state for a logged-in identity.
#[derive(Debug, Clone)]
pub struct ChatSession {
    identity: Identity,
    state: ChatState,
}

impl ChatSession {
    pub fn new(identity: Identity) -> Self {
        Self {
            identity,
            state: ChatState::AwaitingUtterance,
        }
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    pub fn state(&self) -> ChatState {
        self.state
    }

    /// Handle one input line; `exit` or `quit` in any case ends the session.
    pub async fn submit(&mut self, interpreter: &Interpreter, line: &str) -> ChatTurn {
        self.submit_with(interpreter, line, |_| {}).await
    }

    pub async fn submit_with<F>(
        &mut self,
        interpreter: &Interpreter,
        line: &str,
        on_plan: F,
    ) -> ChatTurn
    where
        F: FnMut(&CommandPlan),
    {
        if self.state == ChatState::Exited {
            return ChatTurn::Exited;
        }
        let utterance = line.trim();
        if utterance.eq_ignore_ascii_case("exit") || utterance.eq_ignore_ascii_case("quit") {
            self.state = ChatState::Exited;
            return ChatTurn::Exited;
        }
        if utterance.is_empty() {
            return ChatTurn::Skipped;
        }

        self.state = ChatState::Dispatching;
        let result = interpreter
            .handle_with(utterance, &self.identity, on_plan)
            .await;
        let turn = match result {
            Ok(report) => ChatTurn::Answered(report),
            Err(TurnError::Summary {
                plan,
                output,
                source,
            }) => {
                warn!(
                    "summary failed after commands ran (identity={}, error={source})",
                    self.identity
                );
                ChatTurn::Unsummarized {
                    plan,
                    output,
                    reason: source.to_string(),
                }
            }
            Err(err) => {
                warn!("chat turn failed (identity={}, error={err})", self.identity);
                ChatTurn::Failed(err.to_string())
            }
        };
        self.state = ChatState::AwaitingUtterance;
        turn
    }
}
