//! Key bindings: decoded key events to editor commands.
//!
//! One `match` over `(code, modifiers)` per prefix state. `C-x` and `C-x r`
//! are prefixes; the key after a prefix completes or abandons it.
//!
//! | Keys                | Command            |
//! |---------------------|--------------------|
//! | printable           | insert             |
//! | `C-f` `C-b` `C-n` `C-p`, arrows | character and line motion |
//! | `C-a` `C-e`, Home End | line start / end |
//! | `M-f` `M-b`         | word motion        |
//! | `C-v` `M-v`, PgDn PgUp | page motion     |
//! | `M-<` `M->`         | buffer start / end |
//! | `C-l`               | center line        |
//! | `M-g`               | jump to line       |
//! | `C-s` `C-r`         | search             |
//! | `C-Space` `C-@`     | set mark           |
//! | `C-x C-x`           | swap point and mark|
//! | `C-g`               | cancel             |
//! | `C-d` Delete, Backspace | delete         |
//! | `C-k` `M-d` `C-w`   | kill line / word / region |
//! | `C-x r k` `C-x r t` `C-x r N` | rectangles |
//! | `C-x C-s` `C-x C-w` `C-x C-f` | save / save as / open |
//! | `C-x k`             | kill buffer        |
//! | `C-x C-c`, F10      | quit               |

use ae_term::input::{KeyCode, KeyEvent, Modifiers};

/// Everything a key can ask the editor to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Insert(u8),
    Newline,
    InsertTab,
    Backspace,
    DeleteChar,
    KillLine,
    KillWord,
    KillRegion,

    ForwardChar,
    BackwardChar,
    ForwardWord,
    BackwardWord,
    NextLine,
    PriorLine,
    LineStart,
    LineEnd,
    PageDown,
    PageUp,
    BufferStart,
    BufferEnd,
    CenterLine,
    JumpToLine,
    SearchForward,
    SearchBackward,

    SetMark,
    SwapPointAndMark,
    Cancel,

    KillRectangle,
    RectangleInsert,
    NumberLines,

    Save,
    SaveAs,
    OpenFile,
    KillBuffer,
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum Prefix {
    #[default]
    None,
    CtrlX,
    CtrlXR,
}

/// Resolves keys to commands, remembering a pending prefix between calls.
#[derive(Debug, Default)]
pub struct Keymap {
    prefix: Prefix,
}

impl Keymap {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The prefix typed so far, for echoing in the minibuffer.
    #[must_use]
    pub const fn pending(&self) -> Option<&'static str> {
        match self.prefix {
            Prefix::None => None,
            Prefix::CtrlX => Some("C-x-"),
            Prefix::CtrlXR => Some("C-x r-"),
        }
    }

    /// Feed one key. Returns the command it completes, or `None` for a
    /// prefix key or an unbound sequence.
    pub fn resolve(&mut self, key: KeyEvent) -> Option<Command> {
        let prefix = std::mem::take(&mut self.prefix);
        // C-g abandons any prefix.
        if is_ctrl(key, 'g') {
            return Some(Command::Cancel);
        }
        match prefix {
            Prefix::None => self.resolve_plain(key),
            Prefix::CtrlX => self.resolve_ctrl_x(key),
            Prefix::CtrlXR => resolve_rectangle(key),
        }
    }

    fn resolve_plain(&mut self, key: KeyEvent) -> Option<Command> {
        let mods = key.modifiers;
        if mods.contains(Modifiers::CTRL) {
            return self.resolve_ctrl(key.code);
        }
        if mods.contains(Modifiers::ALT) {
            return resolve_alt(key.code);
        }
        Some(match key.code {
            KeyCode::Char(c) => Command::Insert(printable(c)?),
            KeyCode::Enter => Command::Newline,
            KeyCode::Tab => Command::InsertTab,
            KeyCode::Backspace => Command::Backspace,
            KeyCode::Delete => Command::DeleteChar,
            KeyCode::Right => Command::ForwardChar,
            KeyCode::Left => Command::BackwardChar,
            KeyCode::Down => Command::NextLine,
            KeyCode::Up => Command::PriorLine,
            KeyCode::Home => Command::LineStart,
            KeyCode::End => Command::LineEnd,
            KeyCode::PageDown => Command::PageDown,
            KeyCode::PageUp => Command::PageUp,
            KeyCode::F(10) => Command::Quit,
            _ => return None,
        })
    }

    fn resolve_ctrl(&mut self, code: KeyCode) -> Option<Command> {
        let KeyCode::Char(c) = code else {
            return None;
        };
        Some(match c {
            'a' => Command::LineStart,
            'b' => Command::BackwardChar,
            'd' => Command::DeleteChar,
            'e' => Command::LineEnd,
            'f' => Command::ForwardChar,
            'k' => Command::KillLine,
            'l' => Command::CenterLine,
            'n' => Command::NextLine,
            'p' => Command::PriorLine,
            'r' => Command::SearchBackward,
            's' => Command::SearchForward,
            'v' => Command::PageDown,
            'w' => Command::KillRegion,
            ' ' | '@' => Command::SetMark,
            'x' => {
                self.prefix = Prefix::CtrlX;
                return None;
            }
            _ => return None,
        })
    }

    fn resolve_ctrl_x(&mut self, key: KeyEvent) -> Option<Command> {
        if key.modifiers.contains(Modifiers::CTRL) {
            return match key.code {
                KeyCode::Char('x') => Some(Command::SwapPointAndMark),
                KeyCode::Char('s') => Some(Command::Save),
                KeyCode::Char('w') => Some(Command::SaveAs),
                KeyCode::Char('f') => Some(Command::OpenFile),
                KeyCode::Char('c') => Some(Command::Quit),
                _ => None,
            };
        }
        match key.code {
            KeyCode::Char('k') if key.modifiers.is_empty() => Some(Command::KillBuffer),
            KeyCode::Char('r') if key.modifiers.is_empty() => {
                self.prefix = Prefix::CtrlXR;
                None
            }
            _ => None,
        }
    }
}

fn resolve_alt(code: KeyCode) -> Option<Command> {
    let KeyCode::Char(c) = code else {
        return None;
    };
    Some(match c {
        'f' => Command::ForwardWord,
        'b' => Command::BackwardWord,
        'd' => Command::KillWord,
        'v' => Command::PageUp,
        'g' => Command::JumpToLine,
        '<' => Command::BufferStart,
        '>' => Command::BufferEnd,
        _ => return None,
    })
}

fn resolve_rectangle(key: KeyEvent) -> Option<Command> {
    if key.modifiers.intersects(Modifiers::CTRL | Modifiers::ALT) {
        return None;
    }
    match key.code {
        KeyCode::Char('k') => Some(Command::KillRectangle),
        KeyCode::Char('t') => Some(Command::RectangleInsert),
        KeyCode::Char('N') => Some(Command::NumberLines),
        _ => None,
    }
}

fn is_ctrl(key: KeyEvent, c: char) -> bool {
    key.modifiers.contains(Modifiers::CTRL) && key.code == KeyCode::Char(c)
}

/// The byte for a printable ASCII character.
fn printable(c: char) -> Option<u8> {
    u8::try_from(c).ok().filter(|b| (0x20..0x7f).contains(b))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn plain(c: char) -> KeyEvent {
        KeyEvent::plain(KeyCode::Char(c))
    }

    fn run(keys: &[KeyEvent]) -> Vec<Option<Command>> {
        let mut map = Keymap::new();
        keys.iter().map(|&k| map.resolve(k)).collect()
    }

    #[test]
    fn printable_inserts() {
        assert_eq!(run(&[plain('a')]), vec![Some(Command::Insert(b'a'))]);
        assert_eq!(run(&[plain(' ')]), vec![Some(Command::Insert(b' '))]);
        assert_eq!(run(&[plain('é')]), vec![None]);
    }

    #[test]
    fn control_keys() {
        assert_eq!(run(&[KeyEvent::ctrl('f')]), vec![Some(Command::ForwardChar)]);
        assert_eq!(run(&[KeyEvent::ctrl('k')]), vec![Some(Command::KillLine)]);
        assert_eq!(run(&[KeyEvent::ctrl('@')]), vec![Some(Command::SetMark)]);
        assert_eq!(run(&[KeyEvent::ctrl('w')]), vec![Some(Command::KillRegion)]);
    }

    #[test]
    fn meta_keys() {
        assert_eq!(run(&[KeyEvent::alt('f')]), vec![Some(Command::ForwardWord)]);
        assert_eq!(run(&[KeyEvent::alt('<')]), vec![Some(Command::BufferStart)]);
        assert_eq!(run(&[KeyEvent::alt('>')]), vec![Some(Command::BufferEnd)]);
        assert_eq!(run(&[KeyEvent::alt('g')]), vec![Some(Command::JumpToLine)]);
    }

    #[test]
    fn special_keys() {
        assert_eq!(
            run(&[KeyEvent::plain(KeyCode::PageDown), KeyEvent::plain(KeyCode::F(10))]),
            vec![Some(Command::PageDown), Some(Command::Quit)]
        );
    }

    #[test]
    fn ctrl_x_prefix() {
        let mut map = Keymap::new();
        assert_eq!(map.resolve(KeyEvent::ctrl('x')), None);
        assert_eq!(map.pending(), Some("C-x-"));
        assert_eq!(map.resolve(KeyEvent::ctrl('s')), Some(Command::Save));
        assert_eq!(map.pending(), None);

        assert_eq!(
            run(&[KeyEvent::ctrl('x'), KeyEvent::ctrl('c')]),
            vec![None, Some(Command::Quit)]
        );
        assert_eq!(
            run(&[KeyEvent::ctrl('x'), plain('k')]),
            vec![None, Some(Command::KillBuffer)]
        );
    }

    #[test]
    fn rectangle_prefix() {
        assert_eq!(
            run(&[KeyEvent::ctrl('x'), plain('r'), plain('N')]),
            vec![None, None, Some(Command::NumberLines)]
        );
        assert_eq!(
            run(&[KeyEvent::ctrl('x'), plain('r'), plain('t')]),
            vec![None, None, Some(Command::RectangleInsert)]
        );
    }

    #[test]
    fn unbound_sequence_drops_prefix() {
        let mut map = Keymap::new();
        map.resolve(KeyEvent::ctrl('x'));
        assert_eq!(map.resolve(plain('z')), None);
        assert_eq!(map.pending(), None);
        assert_eq!(map.resolve(plain('z')), Some(Command::Insert(b'z')));
    }

    #[test]
    fn ctrl_g_cancels_prefix() {
        assert_eq!(
            run(&[KeyEvent::ctrl('x'), plain('r'), KeyEvent::ctrl('g')]),
            vec![None, None, Some(Command::Cancel)]
        );
    }
}
