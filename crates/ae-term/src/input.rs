// SPDX-License-Identifier: MIT
//
// Terminal input parser.
//
// Turns raw stdin bytes into key events. The editor works on single-byte
// text, so the parser only needs the legacy keyboard encodings:
//
// - Control bytes (Ctrl+letter, Ctrl+@ / Ctrl+Space)
// - CSI sequences (arrows, Home/End, PageUp/PageDown, Delete, F5-F12)
// - SS3 sequences (F1-F4 and application-mode arrows)
// - Meta via ESC prefix (ESC f → Alt+f, ESC < → Alt+<)
//
// The parser keeps a small byte buffer because a sequence can be split
// across reads. Feed bytes with [`Parser::advance`]; when the poll times
// out with bytes still pending, [`Parser::flush`] resolves a lone ESC as
// the Escape key.

use bitflags::bitflags;

// ─── Event Types ────────────────────────────────────────────────────────────

/// A parsed terminal input event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// A key press.
    Key(KeyEvent),
}

/// A key press with its modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    /// Which key was pressed.
    pub code: KeyCode,
    /// Active modifier keys.
    pub modifiers: Modifiers,
}

impl KeyEvent {
    /// A key with no modifiers.
    #[must_use]
    pub const fn plain(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: Modifiers::empty(),
        }
    }

    /// Ctrl + character.
    #[must_use]
    pub const fn ctrl(c: char) -> Self {
        Self {
            code: KeyCode::Char(c),
            modifiers: Modifiers::CTRL,
        }
    }

    /// Alt (Meta) + character.
    #[must_use]
    pub const fn alt(c: char) -> Self {
        Self {
            code: KeyCode::Char(c),
            modifiers: Modifiers::ALT,
        }
    }
}

/// Identity of a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCode {
    /// A printable ASCII character.
    Char(char),
    // ── Named keys ──────────────────────────────────────────────
    Enter,
    Tab,
    Backspace,
    Escape,
    Delete,
    Insert,
    // ── Navigation ──────────────────────────────────────────────
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    PageUp,
    PageDown,
    // ── Function keys ───────────────────────────────────────────
    /// F1 through F12.
    F(u8),
}

bitflags! {
    /// Keyboard modifier flags, in xterm's CSI encoding (`param = 1 + bitmask`).
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
    pub struct Modifiers: u8 {
        const SHIFT = 0b0000_0001;
        const ALT   = 0b0000_0010;
        const CTRL  = 0b0000_0100;
    }
}

// ─── Parser ─────────────────────────────────────────────────────────────────

/// Terminal input parser.
///
/// A bare `ESC` byte is either the Escape key or the first byte of a
/// sequence. The parser holds it as pending; the caller calls
/// [`flush`](Parser::flush) once the read times out.
pub struct Parser {
    buf: Vec<u8>,
}

impl Parser {
    #[must_use]
    pub fn new() -> Self {
        Self {
            buf: Vec::with_capacity(32),
        }
    }

    /// Feed raw bytes and return every event that can be decoded.
    ///
    /// Incomplete sequences stay buffered for the next call.
    pub fn advance(&mut self, data: &[u8]) -> Vec<Event> {
        self.buf.extend_from_slice(data);
        let mut events = Vec::new();
        let mut pos = 0;

        while pos < self.buf.len() {
            match try_parse(&self.buf[pos..]) {
                Parsed::Event(event, consumed) => {
                    events.push(event);
                    pos += consumed;
                }
                Parsed::Incomplete => break,
                Parsed::Skip(n) => pos += n,
            }
        }

        if pos > 0 {
            self.buf.drain(..pos);
        }

        events
    }

    /// Are there unconsumed bytes that might complete with more data?
    #[must_use]
    pub fn has_pending(&self) -> bool {
        !self.buf.is_empty()
    }

    /// Flush pending bytes as literal key events.
    ///
    /// A lone ESC becomes [`KeyCode::Escape`]. An unfinished sequence
    /// decays into Alt + its second byte followed by literal keys.
    pub fn flush(&mut self) -> Vec<Event> {
        let mut events = Vec::new();
        let mut bytes = self.buf.drain(..).peekable();
        while let Some(byte) = bytes.next() {
            let event = match byte {
                0x1B => match bytes.peek() {
                    Some(&next @ 0x20..=0x7E) => {
                        bytes.next();
                        key_with(KeyCode::Char(next as char), Modifiers::ALT)
                    }
                    _ => press(KeyCode::Escape),
                },
                other => match control_or_printable(other) {
                    Some(event) => event,
                    None => continue,
                },
            };
            events.push(event);
        }
        events
    }
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

// ─── Stateless Parsing Functions ────────────────────────────────────────────

enum Parsed {
    /// Decoded an event, consuming `usize` bytes.
    Event(Event, usize),
    /// Sequence is incomplete; need more bytes.
    Incomplete,
    /// Unrecognized byte(s), skip `usize` bytes.
    Skip(usize),
}

fn try_parse(buf: &[u8]) -> Parsed {
    match buf[0] {
        0x1B => parse_escape(buf),
        b => control_or_printable(b).map_or(Parsed::Skip(1), |event| Parsed::Event(event, 1)),
    }
}

/// Decode a single non-ESC byte.
fn control_or_printable(byte: u8) -> Option<Event> {
    let event = match byte {
        // Ctrl+Space and Ctrl+@ both send NUL.
        0x00 => ctrl_key(KeyCode::Char('@')),
        0x08 | 0x7F => press(KeyCode::Backspace),
        0x09 => press(KeyCode::Tab),
        0x0A | 0x0D => press(KeyCode::Enter),
        b @ 0x01..=0x1A => ctrl_key(KeyCode::Char((b + b'a' - 1) as char)),
        // Ctrl+\ ] ^ _
        b @ 0x1C..=0x1F => ctrl_key(KeyCode::Char((b + b'@') as char)),
        b @ 0x20..=0x7E => press(KeyCode::Char(b as char)),
        _ => return None,
    };
    Some(event)
}

fn parse_escape(buf: &[u8]) -> Parsed {
    if buf.len() < 2 {
        return Parsed::Incomplete;
    }

    match buf[1] {
        b'[' => parse_csi(buf),
        b'O' => parse_ss3(buf),
        0x1B => Parsed::Event(key_with(KeyCode::Escape, Modifiers::ALT), 2),
        b @ 0x20..=0x7E => Parsed::Event(key_with(KeyCode::Char(b as char), Modifiers::ALT), 2),
        b @ 0x01..=0x1A => Parsed::Event(
            key_with(
                KeyCode::Char((b + b'a' - 1) as char),
                Modifiers::ALT | Modifiers::CTRL,
            ),
            2,
        ),
        _ => Parsed::Event(press(KeyCode::Escape), 1),
    }
}

fn parse_csi(buf: &[u8]) -> Parsed {
    // Scan for the final byte (0x40..=0x7E). Parameter bytes are 0x30..=0x3F,
    // intermediates 0x20..=0x2F.
    let mut end = 2;
    while end < buf.len() {
        let b = buf[end];
        if (0x40..=0x7E).contains(&b) {
            break;
        }
        if !(0x20..=0x3F).contains(&b) {
            return Parsed::Skip(end + 1);
        }
        end += 1;
    }

    if end >= buf.len() {
        return Parsed::Incomplete;
    }

    let final_byte = buf[end];
    let params = parse_csi_params(&buf[2..end]);
    let consumed = end + 1;
    let modifiers = params.get(1).map_or(Modifiers::empty(), |&p| decode_modifiers(p));

    if final_byte == b'~' {
        let code = match params.first().copied().unwrap_or(0) {
            1 | 7 => KeyCode::Home,
            2 => KeyCode::Insert,
            3 => KeyCode::Delete,
            4 | 8 => KeyCode::End,
            5 => KeyCode::PageUp,
            6 => KeyCode::PageDown,
            15 => KeyCode::F(5),
            17 => KeyCode::F(6),
            18 => KeyCode::F(7),
            19 => KeyCode::F(8),
            20 => KeyCode::F(9),
            21 => KeyCode::F(10),
            23 => KeyCode::F(11),
            24 => KeyCode::F(12),
            _ => return Parsed::Skip(consumed),
        };
        return Parsed::Event(key_with(code, modifiers), consumed);
    }

    let code = match final_byte {
        b'A' => KeyCode::Up,
        b'B' => KeyCode::Down,
        b'C' => KeyCode::Right,
        b'D' => KeyCode::Left,
        b'H' => KeyCode::Home,
        b'F' => KeyCode::End,
        b'P' => KeyCode::F(1),
        b'Q' => KeyCode::F(2),
        b'R' => KeyCode::F(3),
        b'S' => KeyCode::F(4),
        b'Z' => return Parsed::Event(key_with(KeyCode::Tab, Modifiers::SHIFT), consumed),
        _ => return Parsed::Skip(consumed),
    };

    Parsed::Event(key_with(code, modifiers), consumed)
}

fn parse_ss3(buf: &[u8]) -> Parsed {
    if buf.len() < 3 {
        return Parsed::Incomplete;
    }

    let code = match buf[2] {
        b'A' => KeyCode::Up,
        b'B' => KeyCode::Down,
        b'C' => KeyCode::Right,
        b'D' => KeyCode::Left,
        b'H' => KeyCode::Home,
        b'F' => KeyCode::End,
        b'P' => KeyCode::F(1),
        b'Q' => KeyCode::F(2),
        b'R' => KeyCode::F(3),
        b'S' => KeyCode::F(4),
        _ => return Parsed::Skip(3),
    };

    Parsed::Event(press(code), 3)
}

// ─── Helpers ────────────────────────────────────────────────────────────────

const fn press(code: KeyCode) -> Event {
    key_with(code, Modifiers::empty())
}

const fn ctrl_key(code: KeyCode) -> Event {
    key_with(code, Modifiers::CTRL)
}

const fn key_with(code: KeyCode, modifiers: Modifiers) -> Event {
    Event::Key(KeyEvent { code, modifiers })
}

/// Semicolon-separated decimal parameters. Colon sub-parameters are ignored.
fn parse_csi_params(raw: &[u8]) -> Vec<u16> {
    raw.split(|&b| b == b';')
        .filter(|chunk| !chunk.is_empty())
        .map(|chunk| {
            chunk
                .iter()
                .take_while(|b| b.is_ascii_digit())
                .fold(0u16, |acc, &b| {
                    acc.saturating_mul(10).saturating_add(u16::from(b - b'0'))
                })
        })
        .collect()
}

/// The encoding is `1 + bitmask`; 0 or 1 means no modifiers.
#[allow(clippy::cast_possible_truncation)]
const fn decode_modifiers(param: u16) -> Modifiers {
    let val = if param > 0 { param - 1 } else { 0 };
    Modifiers::from_bits_truncate(val as u8)
}

// ─── Tests ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn parse(data: &[u8]) -> Vec<Event> {
        Parser::new().advance(data)
    }

    fn parse_one(data: &[u8]) -> Event {
        let events = parse(data);
        assert_eq!(events.len(), 1, "expected one event from {data:?}");
        events[0]
    }

    fn key(code: KeyCode) -> Event {
        press(code)
    }

    fn key_mod(code: KeyCode, modifiers: Modifiers) -> Event {
        key_with(code, modifiers)
    }

    // ── Printable ───────────────────────────────────────────────

    #[test]
    fn ascii_single_char() {
        assert_eq!(parse_one(b"a"), key(KeyCode::Char('a')));
    }

    #[test]
    fn ascii_multiple_chars() {
        assert_eq!(
            parse(b"hi!"),
            vec![
                key(KeyCode::Char('h')),
                key(KeyCode::Char('i')),
                key(KeyCode::Char('!')),
            ]
        );
    }

    #[test]
    fn high_bytes_are_skipped() {
        assert_eq!(parse(b"a\xc3\xa9b"), vec![key(KeyCode::Char('a')), key(KeyCode::Char('b'))]);
    }

    // ── Control bytes ───────────────────────────────────────────

    #[test]
    fn ctrl_f() {
        assert_eq!(parse_one(b"\x06"), key_mod(KeyCode::Char('f'), Modifiers::CTRL));
    }

    #[test]
    fn ctrl_space_is_ctrl_at() {
        assert_eq!(parse_one(b"\x00"), key_mod(KeyCode::Char('@'), Modifiers::CTRL));
    }

    #[test]
    fn ctrl_underscore() {
        assert_eq!(parse_one(b"\x1f"), key_mod(KeyCode::Char('_'), Modifiers::CTRL));
    }

    #[test]
    fn enter_cr_and_lf() {
        assert_eq!(parse_one(b"\r"), key(KeyCode::Enter));
        assert_eq!(parse_one(b"\n"), key(KeyCode::Enter));
    }

    #[test]
    fn tab_and_backspace() {
        assert_eq!(parse_one(b"\t"), key(KeyCode::Tab));
        assert_eq!(parse_one(b"\x7f"), key(KeyCode::Backspace));
        assert_eq!(parse_one(b"\x08"), key(KeyCode::Backspace));
    }

    // ── CSI ─────────────────────────────────────────────────────

    #[test]
    fn arrows() {
        assert_eq!(parse_one(b"\x1b[A"), key(KeyCode::Up));
        assert_eq!(parse_one(b"\x1b[B"), key(KeyCode::Down));
        assert_eq!(parse_one(b"\x1b[C"), key(KeyCode::Right));
        assert_eq!(parse_one(b"\x1b[D"), key(KeyCode::Left));
    }

    #[test]
    fn ctrl_right_with_modifier_param() {
        assert_eq!(parse_one(b"\x1b[1;5C"), key_mod(KeyCode::Right, Modifiers::CTRL));
    }

    #[test]
    fn tilde_keys() {
        assert_eq!(parse_one(b"\x1b[3~"), key(KeyCode::Delete));
        assert_eq!(parse_one(b"\x1b[5~"), key(KeyCode::PageUp));
        assert_eq!(parse_one(b"\x1b[6~"), key(KeyCode::PageDown));
        assert_eq!(parse_one(b"\x1b[1~"), key(KeyCode::Home));
        assert_eq!(parse_one(b"\x1b[4~"), key(KeyCode::End));
    }

    #[test]
    fn f10() {
        assert_eq!(parse_one(b"\x1b[21~"), key(KeyCode::F(10)));
    }

    #[test]
    fn unknown_tilde_is_skipped() {
        assert!(parse(b"\x1b[99~").is_empty());
    }

    #[test]
    fn shift_tab() {
        assert_eq!(parse_one(b"\x1b[Z"), key_mod(KeyCode::Tab, Modifiers::SHIFT));
    }

    // ── SS3 ─────────────────────────────────────────────────────

    #[test]
    fn f1_ss3() {
        assert_eq!(parse_one(b"\x1bOP"), key(KeyCode::F(1)));
    }

    #[test]
    fn ss3_arrow() {
        assert_eq!(parse_one(b"\x1bOA"), key(KeyCode::Up));
    }

    // ── Meta ────────────────────────────────────────────────────

    #[test]
    fn alt_f() {
        assert_eq!(parse_one(b"\x1bf"), key_mod(KeyCode::Char('f'), Modifiers::ALT));
    }

    #[test]
    fn alt_less_than() {
        assert_eq!(parse_one(b"\x1b<"), key_mod(KeyCode::Char('<'), Modifiers::ALT));
    }

    #[test]
    fn alt_ctrl_a() {
        assert_eq!(
            parse_one(b"\x1b\x01"),
            key_mod(KeyCode::Char('a'), Modifiers::ALT | Modifiers::CTRL)
        );
    }

    // ── Split reads and flush ───────────────────────────────────

    #[test]
    fn lone_escape_is_pending() {
        let mut parser = Parser::new();
        assert!(parser.advance(b"\x1b").is_empty());
        assert!(parser.has_pending());
        assert_eq!(parser.flush(), vec![key(KeyCode::Escape)]);
        assert!(!parser.has_pending());
    }

    #[test]
    fn sequence_split_across_reads() {
        let mut parser = Parser::new();
        assert!(parser.advance(b"\x1b[").is_empty());
        assert_eq!(parser.advance(b"A"), vec![key(KeyCode::Up)]);
    }

    #[test]
    fn incomplete_csi_flushes_as_alt_bracket() {
        let mut parser = Parser::new();
        assert!(parser.advance(b"\x1b[1;").is_empty());
        assert_eq!(
            parser.flush(),
            vec![
                key_mod(KeyCode::Char('['), Modifiers::ALT),
                key(KeyCode::Char('1')),
                key(KeyCode::Char(';')),
            ]
        );
    }

    #[test]
    fn mixed_stream() {
        assert_eq!(
            parse(b"a\x1b[Bb\x0b"),
            vec![
                key(KeyCode::Char('a')),
                key(KeyCode::Down),
                key(KeyCode::Char('b')),
                key_mod(KeyCode::Char('k'), Modifiers::CTRL),
            ]
        );
    }

    // ── Constructors ────────────────────────────────────────────

    #[test]
    fn key_event_constructors() {
        assert_eq!(KeyEvent::ctrl('x').modifiers, Modifiers::CTRL);
        assert_eq!(KeyEvent::alt('g').code, KeyCode::Char('g'));
        assert!(KeyEvent::plain(KeyCode::Enter).modifiers.is_empty());
    }

    #[test]
    fn decode_modifiers_zero_and_one() {
        assert_eq!(decode_modifiers(0), Modifiers::empty());
        assert_eq!(decode_modifiers(1), Modifiers::empty());
        assert_eq!(decode_modifiers(3), Modifiers::ALT);
    }
}
