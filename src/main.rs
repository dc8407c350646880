// SPDX-License-Identifier: MIT
//
// ae: a small emacs-style terminal text editor.
//
// This is the main binary that wires the two crates together:
//
//   ae-term   → terminal control, key decoding, differential rendering
//   ae-editor → line store, edit gap, point and mark, commands, view
//
// The Editor struct implements ae-term's App trait. Each keypress flows
// through:
//
//   stdin → decoder → on_event → prompt or keymap → Command → EditorState
//   paint → view::paint → framebuffer → diff renderer → terminal
//
// Layout:
//
//   ┌──────────────────────────────┐
//   │ text area                    │  ← h - 2 rows
//   ├──────────────────────────────┤
//   │ status line (INVERSE)        │  ← 1 row
//   ├──────────────────────────────┤
//   │ minibuffer                   │  ← 1 row
//   └──────────────────────────────┘

mod logging;

use std::env;
use std::io;
use std::path::{Path, PathBuf};
use std::process;

use thiserror::Error;
use tracing::{debug, info, warn};

use ae_editor::config::Config;
use ae_editor::cursor::Viewport;
use ae_editor::error::{EditError, Result as EditResult};
use ae_editor::keymap::{Command, Keymap};
use ae_editor::minibuffer::{self, Prompt, PromptKind, PromptOutcome};
use ae_editor::search::SearchDirection;
use ae_editor::state::EditorState;
use ae_editor::view::{self, CHROME_ROWS};

use ae_term::buffer::FrameBuffer;
use ae_term::event_loop::{Action, App, EventLoop, LoopConfig};
use ae_term::input::{Event, KeyEvent};
use ae_term::terminal::Size;

const USAGE: &str = "usage: ae [--log FILE] [--log-level LEVEL] [--set DIRECTIVE]... [FILE]";

// ─── Start-up errors ────────────────────────────────────────────────────────

#[derive(Debug, Error)]
enum StartupError {
    #[error("{flag} needs a value\n{usage}", usage = USAGE)]
    MissingValue { flag: &'static str },

    #[error("unknown flag {flag}\n{usage}", usage = USAGE)]
    UnknownFlag { flag: String },

    #[error("only one file can be opened, got another: {0}")]
    ExtraFile(String),

    #[error(transparent)]
    Config(#[from] EditError),

    #[error(transparent)]
    Logging(#[from] logging::LoggingError),

    #[error("failed to initialize terminal: {0}")]
    Terminal(#[source] io::Error),

    #[error(transparent)]
    Io(#[from] io::Error),
}

// ─── Command line ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
struct Args {
    file: Option<PathBuf>,
    log_file: Option<PathBuf>,
    log_level: String,
    settings: Vec<String>,
    help: bool,
}

impl Default for Args {
    fn default() -> Self {
        Self {
            file: None,
            log_file: None,
            log_level: "info".to_string(),
            settings: Vec::new(),
            help: false,
        }
    }
}

fn parse_args(argv: impl IntoIterator<Item = String>) -> Result<Args, StartupError> {
    let mut args = Args::default();
    let mut argv = argv.into_iter();
    while let Some(arg) = argv.next() {
        match arg.as_str() {
            "-h" | "--help" => args.help = true,
            "--log" => {
                let value = argv.next().ok_or(StartupError::MissingValue { flag: "--log" })?;
                args.log_file = Some(PathBuf::from(value));
            }
            "--log-level" => {
                args.log_level = argv
                    .next()
                    .ok_or(StartupError::MissingValue { flag: "--log-level" })?;
            }
            "--set" => {
                let value = argv.next().ok_or(StartupError::MissingValue { flag: "--set" })?;
                args.settings.push(value);
            }
            flag if flag.starts_with('-') && flag.len() > 1 => {
                return Err(StartupError::UnknownFlag { flag: arg });
            }
            _ if args.file.is_some() => return Err(StartupError::ExtraFile(arg)),
            _ => args.file = Some(PathBuf::from(arg)),
        }
    }
    Ok(args)
}

// ─── Editor ─────────────────────────────────────────────────────────────────

/// The application: editor state plus the input side (keymap and prompt).
struct Editor {
    state: EditorState,
    keymap: Keymap,
    /// Minibuffer prompt in progress. While set, every key goes to it.
    prompt: Option<Prompt>,
    cursor_screen: Option<(u16, u16)>,
}

/// Text-area size for a terminal of `size`.
fn viewport_for(size: Size) -> Viewport {
    Viewport::new(
        usize::from(size.rows.saturating_sub(CHROME_ROWS)),
        usize::from(size.cols),
    )
}

impl Editor {
    fn new(config: Config, size: Size) -> Self {
        Self::with_state(EditorState::new(config, viewport_for(size)))
    }

    fn with_state(state: EditorState) -> Self {
        Self {
            state,
            keymap: Keymap::new(),
            prompt: None,
            cursor_screen: None,
        }
    }

    fn ask(&mut self, kind: PromptKind) {
        self.prompt = Some(Prompt::new(kind));
    }

    /// Run an editing command, reporting failure on the minibuffer.
    fn edit<T>(&mut self, f: impl FnOnce(&mut EditorState) -> EditResult<T>) {
        let result = f(&mut self.state);
        self.report(result);
    }

    /// Turn a failed command into a minibuffer message.
    fn report<T>(&mut self, result: EditResult<T>) {
        if let Err(err) = result {
            warn!(error = %err, "command failed");
            self.state.set_message(err.to_string());
        }
    }

    // ── Keys ──────────────────────────────────────────────────────────────

    fn handle_key(&mut self, key: KeyEvent) -> Action {
        if let Some(prompt) = self.prompt.as_mut() {
            let kind = prompt.kind();
            return match prompt.handle_key(key) {
                PromptOutcome::Pending => Action::Continue,
                PromptOutcome::Cancelled => {
                    self.prompt = None;
                    self.state.cancel();
                    Action::Continue
                }
                PromptOutcome::Submitted(input) => {
                    self.prompt = None;
                    self.answer(kind, &input)
                }
            };
        }

        match self.keymap.resolve(key) {
            Some(cmd) => {
                debug!(?cmd, "command");
                self.execute(cmd)
            }
            None => Action::Continue,
        }
    }

    fn execute(&mut self, cmd: Command) -> Action {
        match cmd {
            // Editing
            Command::Insert(byte) => self.edit(|st| st.self_insert(byte)),
            Command::Newline => self.edit(EditorState::newline),
            Command::InsertTab => self.edit(EditorState::insert_tab),
            Command::Backspace => self.edit(EditorState::backspace),
            Command::DeleteChar => self.edit(EditorState::delete_char),
            Command::KillLine => self.edit(EditorState::kill_line),
            Command::KillWord => self.edit(EditorState::kill_word),
            Command::KillRegion => self.edit(EditorState::kill_region),

            // Motion
            Command::ForwardChar => self.state.point_forward(),
            Command::BackwardChar => self.state.point_backward(),
            Command::ForwardWord => self.state.forward_word(),
            Command::BackwardWord => self.state.backward_word(),
            Command::NextLine => self.state.next_line(),
            Command::PriorLine => self.state.prior_line(),
            Command::LineStart => self.state.line_start(),
            Command::LineEnd => self.state.line_end(),
            Command::PageDown => self.state.page_down(),
            Command::PageUp => self.state.page_up(),
            Command::BufferStart => self.state.point_to_beginning_buffer(),
            Command::BufferEnd => self.state.point_to_end_buffer(),
            Command::CenterLine => self.state.center_line(),
            Command::JumpToLine => self.ask(PromptKind::JumpToLine),
            Command::SearchForward => self.search(SearchDirection::Forward),
            Command::SearchBackward => self.search(SearchDirection::Backward),

            // Mark
            Command::SetMark => self.state.set_mark(),
            Command::SwapPointAndMark => {
                if !self.state.swap_point_and_mark() {
                    self.state.set_message("No mark set in this buffer");
                }
            }
            Command::Cancel => self.state.cancel(),

            // Rectangles
            Command::KillRectangle => self.edit(EditorState::kill_rectangle),
            Command::RectangleInsert => {
                if self.state.cursor().mark().is_some() {
                    self.ask(PromptKind::RectangleText);
                } else {
                    self.state.set_message("No mark set in this buffer");
                }
            }
            Command::NumberLines => self.edit(EditorState::rectangle_number_lines),

            // Files
            Command::Save => self.edit(EditorState::save),
            Command::SaveAs => self.ask(PromptKind::SaveAs),
            Command::OpenFile => {
                if self.state.is_modified() {
                    self.ask(PromptKind::DiscardBeforeOpen);
                } else {
                    self.ask(PromptKind::OpenFile);
                }
            }
            Command::KillBuffer => {
                if self.state.is_modified() {
                    self.ask(PromptKind::DiscardChanges);
                } else {
                    self.state.kill_buffer();
                }
            }
            Command::Quit => {
                if !self.state.is_modified() {
                    return Action::Quit;
                }
                self.ask(PromptKind::SaveBeforeQuit);
            }
        }
        Action::Continue
    }

    /// `C-s` / `C-r`: repeat the last search, or ask for a pattern.
    fn search(&mut self, direction: SearchDirection) {
        if !self.state.repeat_search(direction) {
            self.ask(PromptKind::Search(direction));
        }
    }

    // ── Prompt answers ────────────────────────────────────────────────────

    fn answer(&mut self, kind: PromptKind, input: &str) -> Action {
        match kind {
            PromptKind::Search(direction) => {
                self.state.submit_search(direction, input);
            }
            PromptKind::JumpToLine => {
                self.state.jump_to_line(minibuffer::as_integer(input));
            }
            PromptKind::RectangleText => {
                self.edit(|st| st.rectangle_insert(input.as_bytes()));
            }
            PromptKind::SaveAs => {
                if !input.is_empty() {
                    self.edit(|st| st.save_as(Path::new(input)));
                }
            }
            PromptKind::OpenFile => {
                if !input.is_empty() {
                    self.state.open(Path::new(input));
                }
            }
            PromptKind::SaveBeforeQuit => match minibuffer::as_yes_no(input) {
                Some(true) => match self.state.save() {
                    Ok(_) => return Action::Quit,
                    Err(err) => self.report::<()>(Err(err)),
                },
                Some(false) => return Action::Quit,
                None => self.ask(kind),
            },
            PromptKind::DiscardChanges => match minibuffer::as_yes_no(input) {
                Some(true) => self.state.kill_buffer(),
                Some(false) => {}
                None => self.ask(kind),
            },
            PromptKind::DiscardBeforeOpen => match minibuffer::as_yes_no(input) {
                Some(true) => self.ask(PromptKind::OpenFile),
                Some(false) => {}
                None => self.ask(kind),
            },
        }
        Action::Continue
    }
}

// ─── App implementation ─────────────────────────────────────────────────────

impl App for Editor {
    fn on_event(&mut self, event: &Event) -> Action {
        match *event {
            Event::Key(key) => self.handle_key(key),
        }
    }

    fn on_resize(&mut self, size: Size) {
        debug!(cols = size.cols, rows = size.rows, "resize");
        self.state.set_viewport(viewport_for(size));
    }

    fn paint(&mut self, frame: &mut FrameBuffer) {
        self.cursor_screen = view::paint(
            &self.state,
            frame,
            self.prompt.as_ref(),
            self.keymap.pending(),
        );
    }

    fn cursor(&self) -> Option<(u16, u16)> {
        self.cursor_screen
    }
}

// ─── Entry point ────────────────────────────────────────────────────────────

fn run() -> Result<(), StartupError> {
    let args = parse_args(env::args().skip(1))?;
    if args.help {
        println!("{USAGE}");
        return Ok(());
    }

    // Dropping the guard flushes the log, so it lives until run returns.
    let _log_guard = args
        .log_file
        .as_deref()
        .map(|path| logging::init(path, &args.log_level))
        .transpose()?;

    let mut config = Config::default();
    for directive in &args.settings {
        config.set(directive)?;
    }
    info!(?config, file = ?args.file, "starting");

    let mut event_loop =
        EventLoop::with_config(LoopConfig { tick: config.tick() }).map_err(StartupError::Terminal)?;
    let mut editor = Editor::new(config, event_loop.size());
    if let Some(path) = &args.file {
        editor.state.open(path);
    }

    event_loop.run(&mut editor)?;
    info!("exit");
    Ok(())
}

fn main() {
    if let Err(e) = run() {
        eprintln!("ae: {e}");
        process::exit(1);
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────
