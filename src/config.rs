// ABOUTME: Version, banner, and REPL constants

pub const VERSION: &str = "1.0.0";
pub const WELCOME_MESSAGE: &str = "Monkey interpreter v1.0";
pub const WELCOME_SUBTITLE: &str = "A tree-walking interpreter with quasiquotation macros";
/// Two trailing spaces, per spec.md §6.
pub const PROMPT: &str = ">>  ";
pub const HISTORY_FILE: &str = ".monkey_history";
