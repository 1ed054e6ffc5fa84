// ABOUTME: REPL syntax highlighter — colors keywords, strings, and numbers
// ABOUTME: as rustyline redraws the input line

use rustyline::completion::Completer;
use rustyline::highlight::{CmdKind, Highlighter};
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::Helper;
use std::borrow::Cow;

const COLOR_RESET: &str = "\x1b[0m";
const COLOR_KEYWORD: &str = "\x1b[1;35m";
const COLOR_NUMBER: &str = "\x1b[33m";
const COLOR_STRING: &str = "\x1b[32m";
const COLOR_BOOLEAN: &str = "\x1b[33m";

const KEYWORDS: &[&str] = &["let", "fn", "if", "else", "return", "null", "macro"];
const BOOLEANS: &[&str] = &["true", "false"];

/// Highlighter for the REPL's `rustyline` editor. Recognizes the
/// language's keywords, string/integer literals, and booleans; everything
/// else passes through uncolored.
pub struct MonkeyHelper;

impl MonkeyHelper {
    pub fn new() -> Self {
        MonkeyHelper
    }
}

impl Default for MonkeyHelper {
    fn default() -> Self {
        Self::new()
    }
}

impl Helper for MonkeyHelper {}

impl Completer for MonkeyHelper {
    type Candidate = String;
}

impl Hinter for MonkeyHelper {
    type Hint = String;
}

impl Validator for MonkeyHelper {}

impl Highlighter for MonkeyHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        let highlighted = highlight_line(line);
        if highlighted == line {
            Cow::Borrowed(line)
        } else {
            Cow::Owned(highlighted)
        }
    }

    fn highlight_char(&self, _line: &str, _pos: usize, _kind: CmdKind) -> bool {
        true
    }
}

fn highlight_line(line: &str) -> String {
    let mut result = String::new();
    let chars: Vec<char> = line.chars().collect();
    let mut i = 0;

    while i < chars.len() {
        match chars[i] {
            '"' => {
                result.push_str(COLOR_STRING);
                result.push('"');
                i += 1;
                while i < chars.len() && chars[i] != '"' {
                    result.push(chars[i]);
                    i += 1;
                }
                if i < chars.len() {
                    result.push('"');
                    i += 1;
                }
                result.push_str(COLOR_RESET);
            }
            '0'..='9' => {
                result.push_str(COLOR_NUMBER);
                while i < chars.len() && chars[i].is_ascii_digit() {
                    result.push(chars[i]);
                    i += 1;
                }
                result.push_str(COLOR_RESET);
            }
            c if c.is_ascii_alphabetic() || c == '_' => {
                let start = i;
                while i < chars.len() && (chars[i].is_ascii_alphanumeric() || chars[i] == '_') {
                    i += 1;
                }
                let word: String = chars[start..i].iter().collect();
                if KEYWORDS.contains(&word.as_str()) {
                    result.push_str(COLOR_KEYWORD);
                    result.push_str(&word);
                    result.push_str(COLOR_RESET);
                } else if BOOLEANS.contains(&word.as_str()) {
                    result.push_str(COLOR_BOOLEAN);
                    result.push_str(&word);
                    result.push_str(COLOR_RESET);
                } else {
                    result.push_str(&word);
                }
            }
            other => {
                result.push(other);
                i += 1;
            }
        }
    }

    result
}
