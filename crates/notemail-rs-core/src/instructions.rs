//! Instruction document sent to the model when planning commands.

use log::{debug, warn};
use std::path::{Path, PathBuf};

/// File looked up in the working directory when no path is configured.
pub const DEFAULT_INSTRUCTIONS_FILE: &str = "documentation.txt";

/// Built-in instruction document.
pub const BUILTIN_INSTRUCTIONS: &str = "You are an assistant that can control a mail system. The available commands are:\n\
- \"send\": Sends an email. Requires parameters: \"recipient\" and \"message\".\n\
- \"read\": Reads all emails for the logged-in user.\n\
- \"search\": Searches emails by keyword. Requires parameter: \"keyword\".\n\
- \"semantic_search\": Performs semantic search on emails. Requires parameter: \"query\".\n\n\
When given a natural language prompt, output a JSON object with a key \"commands\" \
that is a list of command objects. For example:\n\
{\"commands\": [{\"action\": \"read\", \"params\": {}}]}";

/// Instruction content and the file it came from, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstructionDocument {
    pub content: String,
    pub source: Option<PathBuf>,
}

impl InstructionDocument {
    pub fn builtin() -> Self {
        Self {
            content: BUILTIN_INSTRUCTIONS.to_string(),
            source: None,
        }
    }
}

impl Default for InstructionDocument {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Resolve the instruction document.
///
/// A configured path is resolved against `cwd`; otherwise
/// `documentation.txt` in `cwd` is used when present. Unreadable or empty
/// files fall back to the built-in document.
pub fn load_instructions(configured: Option<&str>, cwd: &Path) -> InstructionDocument {
    let path = match configured {
        Some(path) => {
            let path = PathBuf::from(path);
            if path.is_absolute() {
                path
            } else {
                cwd.join(path)
            }
        }
        None => {
            let path = cwd.join(DEFAULT_INSTRUCTIONS_FILE);
            if !path.is_file() {
                debug!("using built-in instructions (path={})", path.display());
                return InstructionDocument::builtin();
            }
            path
        }
    };

    match std::fs::read_to_string(&path) {
        Ok(content) if !content.trim().is_empty() => {
            debug!("instructions loaded (path={})", path.display());
            InstructionDocument {
                content,
                source: Some(path),
            }
        }
        Ok(_) => {
            warn!("instruction file is empty (path={})", path.display());
            InstructionDocument::builtin()
        }
        Err(err) => {
            warn!(
                "failed to read instructions (path={}, error={})",
                path.display(),
                err
            );
            InstructionDocument::builtin()
        }
    }
}
