//! logos-based tokenizer for menu shortcuts.
//!
//! A shortcut is zero or more modifiers followed by one key:
//! `C-` (Ctrl), `S-` (Shift), `A-` (Alt); the key is a letter, a digit or a
//! function key `F1`..`F24`. Examples: `C-O`, `C-S-Z`, `F5`.

use std::fmt;
use std::str::FromStr;

use logos::Logos;

use super::SpecError;

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
enum Token {
    /// `C-`, `S-` or `A-`; longest match beats the plain letter.
    #[regex(r"[CSA]-")]
    Modifier,

    #[regex(r"F[0-9]{1,2}")]
    FunctionKey,

    #[regex(r"[a-zA-Z0-9]")]
    Char,
}

/// The key part of a shortcut.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    /// A letter (stored uppercase) or digit.
    Char(char),
    /// Function key `F<n>`.
    F(u8),
}

/// A parsed keyboard shortcut.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Shortcut {
    pub ctrl: bool,
    pub shift: bool,
    pub alt: bool,
    pub key: Key,
}

impl FromStr for Shortcut {
    type Err = SpecError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let fail = |reason: &str| SpecError::Menu {
            text: text.to_owned(),
            reason: reason.to_owned(),
        };

        let (mut ctrl, mut shift, mut alt) = (false, false, false);
        let mut key = None;
        let mut lex = Token::lexer(text);
        while let Some(token) = lex.next() {
            let token = token.map_err(|_| fail("unexpected character in shortcut"))?;
            if key.is_some() {
                return Err(fail("shortcut continues after its key"));
            }
            let slice = lex.slice();
            match token {
                Token::Modifier => match slice.as_bytes()[0] {
                    b'C' => ctrl = true,
                    b'S' => shift = true,
                    _ => alt = true,
                },
                Token::FunctionKey => {
                    let n: u8 = slice[1..]
                        .parse()
                        .map_err(|_| fail("invalid function key"))?;
                    if !(1..=24).contains(&n) {
                        return Err(fail("function key out of range"));
                    }
                    key = Some(Key::F(n));
                }
                Token::Char => {
                    let c = slice.chars().next().unwrap_or_default();
                    key = Some(Key::Char(c.to_ascii_uppercase()));
                }
            }
        }

        let key = key.ok_or_else(|| fail("shortcut has no key"))?;
        Ok(Shortcut { ctrl, shift, alt, key })
    }
}

impl fmt::Display for Shortcut {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.ctrl {
            f.write_str("Ctrl+")?;
        }
        if self.shift {
            f.write_str("Shift+")?;
        }
        if self.alt {
            f.write_str("Alt+")?;
        }
        match self.key {
            Key::Char(c) => write!(f, "{c}"),
            Key::F(n) => write!(f, "F{n}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> Shortcut {
        text.parse().unwrap()
    }

    #[test]
    fn modifiers_and_key() {
        let s = parse("C-S-Z");
        assert!(s.ctrl && s.shift && !s.alt);
        assert_eq!(s.key, Key::Char('Z'));
        assert_eq!(s.to_string(), "Ctrl+Shift+Z");
    }

    #[test]
    fn lowercase_key_is_uppercased() {
        assert_eq!(parse("A-x").key, Key::Char('X'));
    }

    #[test]
    fn plain_letter_c_is_a_key() {
        let s = parse("C");
        assert!(!s.ctrl);
        assert_eq!(s.key, Key::Char('C'));
    }

    #[test]
    fn function_keys() {
        assert_eq!(parse("F5").key, Key::F(5));
        assert_eq!(parse("C-F12").to_string(), "Ctrl+F12");
    }

    #[test]
    fn invalid_shortcuts() {
        assert!("".parse::<Shortcut>().is_err());
        assert!("C-".parse::<Shortcut>().is_err());
        assert!("C-xy".parse::<Shortcut>().is_err());
        assert!("F0".parse::<Shortcut>().is_err());
        assert!("C+x".parse::<Shortcut>().is_err());
    }
}
