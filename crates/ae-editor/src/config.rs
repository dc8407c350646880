//! Editor options and the `--set` directive parser.
//!
//! Options are set from the command line with `--set`, one directive per
//! flag, using the same argument syntax as Vim's `:set`:
//!
//! | Syntax         | Effect                  |
//! |----------------|-------------------------|
//! | `option`       | Enable a boolean        |
//! | `nooption`     | Disable a boolean       |
//! | `option!`      | Toggle a boolean        |
//! | `option=value` | Assign a numeric value  |
//!
//! | Full name      | Abbrev | Type    | Default |
//! |----------------|--------|---------|---------|
//! | `tabwidth`     | `tw`   | integer | 8       |
//! | `editcapacity` | `ec`   | integer | 64      |
//! | `autoindent`   | `ai`   | bool    | true    |
//! | `tick`         |        | integer | 100     |

use std::time::Duration;

use crate::buffer::DEFAULT_TAB_WIDTH;
use crate::error::{EditError, Result};
use crate::gap::DEFAULT_CAPACITY;

/// Smallest accepted edit accumulator capacity.
pub const MIN_EDIT_CAPACITY: usize = 8;

// ---------------------------------------------------------------------------
// Directives
// ---------------------------------------------------------------------------

/// One parsed `--set` argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SetDirective {
    On(String),
    Off(String),
    Toggle(String),
    Assign(String, String),
}

/// Canonical name for a boolean option, or `None`.
#[must_use]
pub fn bool_option(name: &str) -> Option<&'static str> {
    match name {
        "autoindent" | "ai" => Some("autoindent"),
        _ => None,
    }
}

/// Canonical name for a numeric option, or `None`.
#[must_use]
pub fn numeric_option(name: &str) -> Option<&'static str> {
    match name {
        "tabwidth" | "tw" => Some("tabwidth"),
        "editcapacity" | "ec" => Some("editcapacity"),
        "tick" => Some("tick"),
        _ => None,
    }
}

/// Parse a single directive.
#[must_use]
pub fn parse_set_arg(arg: &str) -> SetDirective {
    if let Some((name, value)) = arg.split_once('=') {
        return SetDirective::Assign(name.to_string(), value.to_string());
    }
    if let Some(name) = arg.strip_suffix('!') {
        return SetDirective::Toggle(name.to_string());
    }
    // Only a known boolean after "no" counts as negation.
    if let Some(name) = arg.strip_prefix("no") {
        if bool_option(name).is_some() {
            return SetDirective::Off(name.to_string());
        }
    }
    SetDirective::On(arg.to_string())
}

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Spaces a tab expands to, on load and for the Tab key.
    pub tab_width: usize,
    /// Bytes the edit accumulator holds before a forced commit.
    pub edit_capacity: usize,
    /// Copy the previous line's indentation after Enter.
    pub auto_indent: bool,
    /// Input poll timeout in milliseconds.
    pub tick_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tab_width: DEFAULT_TAB_WIDTH,
            edit_capacity: DEFAULT_CAPACITY,
            auto_indent: true,
            tick_ms: 100,
        }
    }
}

impl Config {
    #[must_use]
    pub const fn tick(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }

    /// Parse and apply one `--set` argument.
    ///
    /// # Errors
    ///
    /// See [`apply`](Self::apply).
    pub fn set(&mut self, arg: &str) -> Result<()> {
        self.apply(&parse_set_arg(arg))
    }

    /// Apply a directive.
    ///
    /// # Errors
    ///
    /// [`EditError::UnknownOption`] for names that are not options, or a
    /// boolean directive on a numeric option and vice versa.
    /// [`EditError::InvalidOption`] for values that are not numbers or are
    /// out of range.
    pub fn apply(&mut self, directive: &SetDirective) -> Result<()> {
        match directive {
            SetDirective::On(name) => *self.bool_mut(name)? = true,
            SetDirective::Off(name) => *self.bool_mut(name)? = false,
            SetDirective::Toggle(name) => {
                let flag = self.bool_mut(name)?;
                *flag = !*flag;
            }
            SetDirective::Assign(name, value) => self.assign(name, value)?,
        }
        Ok(())
    }

    fn bool_mut(&mut self, name: &str) -> Result<&mut bool> {
        match bool_option(name) {
            Some("autoindent") => Ok(&mut self.auto_indent),
            _ => Err(EditError::UnknownOption(name.to_string())),
        }
    }

    fn assign(&mut self, name: &str, value: &str) -> Result<()> {
        let canonical =
            numeric_option(name).ok_or_else(|| EditError::UnknownOption(name.to_string()))?;
        let invalid = || EditError::InvalidOption {
            name: canonical.to_string(),
            value: value.to_string(),
        };
        let n: u64 = value.trim().parse().map_err(|_| invalid())?;
        let n_usize = usize::try_from(n).map_err(|_| invalid())?;
        match canonical {
            "tabwidth" if (1..=16).contains(&n_usize) => self.tab_width = n_usize,
            "editcapacity" if n_usize >= MIN_EDIT_CAPACITY => self.edit_capacity = n_usize,
            "tick" if n > 0 => self.tick_ms = n,
            _ => return Err(invalid()),
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    // -- parse_set_arg ------------------------------------------------------

    #[test]
    fn parse_forms() {
        assert_eq!(parse_set_arg("ai"), SetDirective::On("ai".into()));
        assert_eq!(parse_set_arg("noai"), SetDirective::Off("ai".into()));
        assert_eq!(
            parse_set_arg("autoindent!"),
            SetDirective::Toggle("autoindent".into())
        );
        assert_eq!(
            parse_set_arg("tw=4"),
            SetDirective::Assign("tw".into(), "4".into())
        );
    }

    #[test]
    fn no_prefix_needs_known_bool() {
        // "nothing" is not "no" + a boolean option.
        assert_eq!(parse_set_arg("nothing"), SetDirective::On("nothing".into()));
    }

    // -- Config -------------------------------------------------------------

    #[test]
    fn defaults() {
        let config = Config::default();
        assert_eq!(config.tab_width, 8);
        assert_eq!(config.edit_capacity, 64);
        assert!(config.auto_indent);
        assert_eq!(config.tick(), Duration::from_millis(100));
    }

    #[test]
    fn set_booleans() {
        let mut config = Config::default();
        config.set("noautoindent").unwrap();
        assert!(!config.auto_indent);
        config.set("ai!").unwrap();
        assert!(config.auto_indent);
    }

    #[test]
    fn set_numbers() {
        let mut config = Config::default();
        config.set("tw=4").unwrap();
        config.set("editcapacity=128").unwrap();
        config.set("tick=50").unwrap();
        assert_eq!(config.tab_width, 4);
        assert_eq!(config.edit_capacity, 128);
        assert_eq!(config.tick_ms, 50);
    }

    #[test]
    fn unknown_option_is_rejected() {
        let mut config = Config::default();
        assert!(matches!(
            config.set("bogus"),
            Err(EditError::UnknownOption(name)) if name == "bogus"
        ));
        // Boolean form of a numeric option.
        assert!(matches!(config.set("tw"), Err(EditError::UnknownOption(_))));
        assert!(matches!(config.set("ai=3"), Err(EditError::UnknownOption(_))));
    }

    #[test]
    fn invalid_values_are_rejected() {
        let mut config = Config::default();
        assert!(matches!(
            config.set("tw=abc"),
            Err(EditError::InvalidOption { name, .. }) if name == "tabwidth"
        ));
        assert!(config.set("tw=0").is_err());
        assert!(config.set("ec=2").is_err());
        assert!(config.set("tick=0").is_err());
        assert_eq!(config, Config::default());
    }
}
