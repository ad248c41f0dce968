// ============================================================================
// PROMPTER INTERFACE
// ============================================================================

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use tracing::warn;

/// One text field to ask the user for.
#[derive(Debug, Clone)]
pub struct Field {
    pub prompt: String,
    pub default: String,
}

impl Field {
    pub fn new(prompt: impl Into<String>, default: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            default: default.into(),
        }
    }
}

/// Source of user text and file choices for label editing.
pub trait Prompter {
    /// Asks for every field in order. `None` means the user cancelled.
    fn prompt_text(&mut self, fields: &[Field]) -> Option<Vec<String>>;

    /// Asks for a file whose extension is one of `extensions`.
    fn choose_file(&mut self, extensions: &[&str]) -> Option<PathBuf>;
}

/// Image formats accepted for label icons.
pub const ICON_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "bmp"];

pub fn has_extension(path: &Path, extensions: &[&str]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| extensions.iter().any(|e| e.eq_ignore_ascii_case(ext)))
        .unwrap_or(false)
}

// ============================================================================
// CONSOLE PROMPTER
// ============================================================================

/// Prompts on stdout and reads answers line by line.
///
/// An empty answer keeps the field's default; end of input cancels.
pub struct ConsolePrompter<R, W> {
    input: R,
    output: W,
}

impl ConsolePrompter<io::StdinLock<'static>, io::Stdout> {
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> ConsolePrompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    fn ask(&mut self, prompt: &str) -> Option<String> {
        write!(self.output, "{prompt}").ok()?;
        self.output.flush().ok()?;
        let mut line = String::new();
        match self.input.read_line(&mut line) {
            Ok(0) | Err(_) => None,
            Ok(_) => Some(line.trim_end_matches(['\r', '\n']).to_string()),
        }
    }
}

impl<R: BufRead, W: Write> Prompter for ConsolePrompter<R, W> {
    fn prompt_text(&mut self, fields: &[Field]) -> Option<Vec<String>> {
        let mut answers = Vec::with_capacity(fields.len());
        for field in fields {
            let prompt = if field.default.is_empty() {
                format!("{}: ", field.prompt)
            } else {
                format!("{} [{}]: ", field.prompt, field.default)
            };
            let answer = self.ask(&prompt)?;
            if answer.trim() == "-" {
                answers.push(String::new());
            } else if answer.trim().is_empty() {
                answers.push(field.default.clone());
            } else {
                answers.push(answer);
            }
        }
        Some(answers)
    }

    fn choose_file(&mut self, extensions: &[&str]) -> Option<PathBuf> {
        let answer = self.ask(&format!("Icon file ({}), empty for none: ", extensions.join("/")))?;
        let answer = answer.trim();
        if answer.is_empty() {
            return None;
        }
        let path = PathBuf::from(answer);
        if !has_extension(&path, extensions) {
            warn!(path = %path.display(), "ignoring icon with unsupported extension");
            return None;
        }
        Some(path)
    }
}

/// Prompter that never answers, used when prompts are disabled.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoPrompter;

impl Prompter for NoPrompter {
    fn prompt_text(&mut self, _fields: &[Field]) -> Option<Vec<String>> {
        None
    }

    fn choose_file(&mut self, _extensions: &[&str]) -> Option<PathBuf> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn console(input: &str) -> ConsolePrompter<&[u8], Vec<u8>> {
        ConsolePrompter::new(input.as_bytes(), Vec::new())
    }

    #[test]
    fn empty_answer_keeps_default() {
        let mut prompter = console("Walk\n\n");
        let answers = prompter
            .prompt_text(&[Field::new("Title", "Old"), Field::new("Content", "notes")])
            .unwrap();
        assert_eq!(answers, vec!["Walk".to_string(), "notes".to_string()]);
    }

    #[test]
    fn dash_clears_a_field() {
        let mut prompter = console("-\n");
        let answers = prompter.prompt_text(&[Field::new("Title", "Old")]).unwrap();
        assert_eq!(answers, vec![String::new()]);
    }

    #[test]
    fn eof_cancels() {
        let mut prompter = console("only one\n");
        assert!(prompter
            .prompt_text(&[Field::new("Title", ""), Field::new("Content", "")])
            .is_none());
    }

    #[test]
    fn choose_file_filters_extensions() {
        let mut prompter = console("notes.txt\n");
        assert!(prompter.choose_file(ICON_EXTENSIONS).is_none());

        let mut prompter = console("icons/sun.PNG\n");
        assert_eq!(
            prompter.choose_file(ICON_EXTENSIONS),
            Some(PathBuf::from("icons/sun.PNG"))
        );

        let mut prompter = console("\n");
        assert!(prompter.choose_file(ICON_EXTENSIONS).is_none());
    }

    #[test]
    fn prompt_is_written_with_default() {
        let mut prompter = console("x\n");
        prompter.prompt_text(&[Field::new("Title", "Nap")]).unwrap();
        assert_eq!(String::from_utf8(prompter.output).unwrap(), "Title [Nap]: ");
    }
}
