//! The minibuffer prompt: one line of input on the bottom screen row.
//!
//! A [`Prompt`] takes keys until the user submits or cancels it. Line
//! prompts submit on Enter; yes/no prompts submit on the first printable
//! key. Interpreting the answer is up to the caller, with [`as_integer`]
//! and [`as_yes_no`] for the common cases.

use ae_term::input::{KeyCode, KeyEvent, Modifiers};

use crate::search::SearchDirection;

/// What the prompt is asking for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptKind {
    Search(SearchDirection),
    JumpToLine,
    RectangleText,
    SaveAs,
    OpenFile,
    SaveBeforeQuit,
    DiscardChanges,
    /// Confirmation before `OpenFile` replaces a modified buffer.
    DiscardBeforeOpen,
}

impl PromptKind {
    /// The text shown before the input.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::Search(SearchDirection::Forward) => "Search: ",
            Self::Search(SearchDirection::Backward) => "Search backward: ",
            Self::JumpToLine => "Goto line: ",
            Self::RectangleText => "String rectangle: ",
            Self::SaveAs => "Write file: ",
            Self::OpenFile => "Find file: ",
            Self::SaveBeforeQuit => "Save changes before exiting (y/n)? ",
            Self::DiscardChanges => "Buffer modified; kill anyway (y/n)? ",
            Self::DiscardBeforeOpen => "Buffer modified; visit another file anyway (y/n)? ",
        }
    }

    #[must_use]
    pub const fn is_yes_no(self) -> bool {
        matches!(
            self,
            Self::SaveBeforeQuit | Self::DiscardChanges | Self::DiscardBeforeOpen
        )
    }
}

/// Result of feeding a key to a prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptOutcome {
    Pending,
    Submitted(String),
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    kind: PromptKind,
    input: String,
}

impl Prompt {
    #[must_use]
    pub const fn new(kind: PromptKind) -> Self {
        Self {
            kind,
            input: String::new(),
        }
    }

    #[inline]
    #[must_use]
    pub const fn kind(&self) -> PromptKind {
        self.kind
    }

    #[inline]
    #[must_use]
    pub const fn message(&self) -> &'static str {
        self.kind.message()
    }

    #[inline]
    #[must_use]
    pub fn input(&self) -> &str {
        &self.input
    }

    /// Feed one key.
    pub fn handle_key(&mut self, key: KeyEvent) -> PromptOutcome {
        let ctrl = key.modifiers.contains(Modifiers::CTRL);
        match key.code {
            KeyCode::Char('g') if ctrl => PromptOutcome::Cancelled,
            KeyCode::Escape => PromptOutcome::Cancelled,
            KeyCode::Enter => PromptOutcome::Submitted(std::mem::take(&mut self.input)),
            KeyCode::Backspace => {
                self.input.pop();
                PromptOutcome::Pending
            }
            KeyCode::Char(c)
                if !ctrl && !key.modifiers.contains(Modifiers::ALT) && c.is_ascii() && !c.is_ascii_control() =>
            {
                if self.kind.is_yes_no() {
                    return PromptOutcome::Submitted(c.to_string());
                }
                self.input.push(c);
                PromptOutcome::Pending
            }
            _ => PromptOutcome::Pending,
        }
    }
}

/// Parse a number, treating anything non-numeric as 0.
#[must_use]
pub fn as_integer(input: &str) -> usize {
    input.trim().parse().unwrap_or(0)
}

/// `y`/`Y` is yes, `n`/`N` is no, anything else asks again.
#[must_use]
pub fn as_yes_no(input: &str) -> Option<bool> {
    match input.trim() {
        "y" | "Y" => Some(true),
        "n" | "N" => Some(false),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn type_str(prompt: &mut Prompt, s: &str) {
        for c in s.chars() {
            assert_eq!(
                prompt.handle_key(KeyEvent::plain(KeyCode::Char(c))),
                PromptOutcome::Pending
            );
        }
    }

    #[test]
    fn line_prompt_collects_until_enter() {
        let mut p = Prompt::new(PromptKind::OpenFile);
        type_str(&mut p, "notes.txx");
        p.handle_key(KeyEvent::plain(KeyCode::Backspace));
        type_str(&mut p, "t");
        assert_eq!(p.input(), "notes.txt");
        assert_eq!(
            p.handle_key(KeyEvent::plain(KeyCode::Enter)),
            PromptOutcome::Submitted("notes.txt".into())
        );
    }

    #[test]
    fn cancel_keys() {
        let mut p = Prompt::new(PromptKind::JumpToLine);
        assert_eq!(p.handle_key(KeyEvent::ctrl('g')), PromptOutcome::Cancelled);
        assert_eq!(
            p.handle_key(KeyEvent::plain(KeyCode::Escape)),
            PromptOutcome::Cancelled
        );
    }

    #[test]
    fn control_keys_are_ignored() {
        let mut p = Prompt::new(PromptKind::RectangleText);
        assert_eq!(p.handle_key(KeyEvent::ctrl('a')), PromptOutcome::Pending);
        assert_eq!(p.handle_key(KeyEvent::alt('x')), PromptOutcome::Pending);
        assert_eq!(p.input(), "");
    }

    #[test]
    fn yes_no_submits_on_first_key() {
        let mut p = Prompt::new(PromptKind::SaveBeforeQuit);
        assert_eq!(
            p.handle_key(KeyEvent::plain(KeyCode::Char('y'))),
            PromptOutcome::Submitted("y".into())
        );
    }

    #[test]
    fn messages() {
        assert_eq!(
            Prompt::new(PromptKind::Search(SearchDirection::Forward)).message(),
            "Search: "
        );
        assert_eq!(PromptKind::JumpToLine.message(), "Goto line: ");
        assert!(!PromptKind::SaveAs.is_yes_no());
        assert!(PromptKind::DiscardBeforeOpen.is_yes_no());
    }

    #[test]
    fn integer_answers() {
        assert_eq!(as_integer("42"), 42);
        assert_eq!(as_integer(" 7 "), 7);
        assert_eq!(as_integer("abc"), 0);
        assert_eq!(as_integer(""), 0);
    }

    #[test]
    fn yes_no_answers() {
        assert_eq!(as_yes_no("y"), Some(true));
        assert_eq!(as_yes_no("N"), Some(false));
        assert_eq!(as_yes_no("q"), None);
    }
}
