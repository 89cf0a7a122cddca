//! Line-oriented terminal IO over any reader and writer.

use std::fmt::Display;
use std::io::{self, BufRead, Write};

/// Prompted line input plus plain text output.
pub struct Console<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Print `text` followed by a newline.
    pub fn say(&mut self, text: impl Display) -> io::Result<()> {
        writeln!(self.output, "{text}")
    }

    /// Print `text` exactly as given.
    pub fn show(&mut self, text: impl Display) -> io::Result<()> {
        write!(self.output, "{text}")?;
        self.output.flush()
    }

    /// Print `label` and read one trimmed line; `None` at end of input.
    pub fn prompt(&mut self, label: &str) -> io::Result<Option<String>> {
        self.show(label)?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    pub fn into_output(self) -> W {
        self.output
    }
}

#[cfg(test)]
mod tests {
    use super::Console;
    use pretty_assertions::assert_eq;
    use std::io::Cursor;

    #[test]
    fn prompt_trims_and_detects_end_of_input() {
        let mut console = Console::new(Cursor::new("  alice \n"), Vec::new());
        assert_eq!(
            console.prompt("Name: ").expect("prompt"),
            Some("alice".to_string())
        );
        assert_eq!(console.prompt("Name: ").expect("prompt"), None);
        assert_eq!(
            String::from_utf8(console.into_output()).expect("utf8"),
            "Name: Name: "
        );
    }
}
