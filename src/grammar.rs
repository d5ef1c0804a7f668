//! Command-position queries.
//!
//! Whether a word sits where the shell expects a command is a question for
//! the surrounding grammar. The expander only asks it through
//! [`CommandPosition`]; [`ShellGrammar`] is a small default for front ends
//! that have no grammar of their own.

/// Answers whether `context[index..]` starts a command word for `key`.
///
/// Implementations must not have side effects: the expander may ask the same
/// question more than once while it rewrites a line.
pub trait CommandPosition {
    fn is_command_position(&self, key: &str, context: &str, index: usize) -> bool;
}

impl<F> CommandPosition for F
where
    F: Fn(&str, &str, usize) -> bool,
{
    fn is_command_position(&self, key: &str, context: &str, index: usize) -> bool {
        self(key, context, index)
    }
}

/// Characters after which a new command word may begin.
const COMMAND_SEPARATORS: &[char] = &['|', ';', '&', '(', '{', '`', '!', '\n'];

/// Characters that end a word without needing whitespace.
const WORD_TERMINATORS: &[char] = &['|', ';', '&', ')', '<', '>', '`'];

/// Minimal POSIX-ish command-position rules.
///
/// A key is in command position when only blanks separate it from the start
/// of the line or from a command separator, and it forms a whole word.
#[derive(Debug, Default, Clone, Copy)]
pub struct ShellGrammar;

impl CommandPosition for ShellGrammar {
    fn is_command_position(&self, key: &str, context: &str, index: usize) -> bool {
        let (Some(before), Some(after)) = (context.get(..index), context.get(index + key.len()..))
        else {
            return false;
        };

        let starts_command = before
            .trim_end_matches(|c| c == ' ' || c == '\t')
            .chars()
            .next_back()
            .map_or(true, |c| COMMAND_SEPARATORS.contains(&c));

        let whole_word = after
            .chars()
            .next()
            .map_or(true, |c| c.is_whitespace() || WORD_TERMINATORS.contains(&c));

        starts_command && whole_word
    }
}
