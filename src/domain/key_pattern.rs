//! Key patterns in the Redis `KEYS` syntax.
//!
//! `*` matches any run of characters, `?` one character, `[...]` a character
//! class (`[^...]` negated) and `\` quotes the next character. The in-memory
//! backend evaluates these with [`glob::Pattern`].

use glob::{Pattern, PatternError};

/// Quotes `literal` so it only matches itself, both on Redis and in
/// [`compile`].
pub fn escape(literal: &str) -> String {
    Pattern::escape(literal).replace('\\', "\\\\")
}

/// Translates a Redis-style pattern into a [`glob::Pattern`].
pub fn compile(pattern: &str) -> Result<Pattern, PatternError> {
    let mut translated = String::with_capacity(pattern.len() + 8);
    let mut chars = pattern.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            // A trailing backslash matches itself.
            '\\' => {
                translated.push('[');
                translated.push(chars.next().unwrap_or('\\'));
                translated.push(']');
            }
            '[' if chars.peek() == Some(&'^') => {
                chars.next();
                translated.push_str("[!");
            }
            other => translated.push(other),
        }
    }
    Pattern::new(&translated)
}
