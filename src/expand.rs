//! Alias expansion over a single input line.
//!
//! Aliases are applied in definition order. For each alias every occurrence
//! of its key is visited left to right; a valid occurrence is replaced by the
//! alias value and scanning continues after the inserted text. Values are
//! never rescanned by the alias that produced them, but later aliases in the
//! same pass do see them.

use tracing::{debug, warn};

use crate::config::ExpansionMode;
use crate::error::AliasResult;
use crate::grammar::CommandPosition;
use crate::table::AliasTable;

pub const BUILTIN_SENTINEL: char = '~';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Occurrence {
    Escaped,
    Valid,
    Invalid,
}

/// Classifies the occurrence of `key` at byte `index` of `context`.
///
/// This only inspects `context`; removing an escaping backslash is left to
/// [`unescape_at`].
pub fn classify<P>(key: &str, context: &str, index: usize, predicate: &P) -> Occurrence
where
    P: CommandPosition + ?Sized,
{
    if index > 0 && context.as_bytes().get(index - 1) == Some(&b'\\') {
        return Occurrence::Escaped;
    }

    if key.starts_with(BUILTIN_SENTINEL) {
        return Occurrence::Valid;
    }

    if predicate.is_command_position(key, context, index) {
        Occurrence::Valid
    } else {
        Occurrence::Invalid
    }
}

/// Drops the backslash in front of the occurrence at `index` and returns the
/// occurrence's new index, or `None` if it is not escaped.
pub fn unescape_at(buf: &mut String, index: usize) -> Option<usize> {
    let escape = index.checked_sub(1)?;
    if buf.as_bytes().get(escape) != Some(&b'\\') {
        return None;
    }
    buf.remove(escape);
    Some(escape)
}

pub fn expand<P>(input: &str, table: &AliasTable, predicate: &P) -> String
where
    P: CommandPosition + ?Sized,
{
    let mut buf = String::with_capacity(input.len() + table.total_value_len());
    buf.push_str(input);
    run(&mut buf, table, predicate);
    buf
}

/// Like [`expand`], but reports a failure to allocate the working buffer
/// instead of aborting.
pub fn try_expand<P>(input: &str, table: &AliasTable, predicate: &P) -> AliasResult<String>
where
    P: CommandPosition + ?Sized,
{
    let mut buf = String::new();
    buf.try_reserve(input.len().saturating_add(table.total_value_len()))?;
    buf.push_str(input);
    run(&mut buf, table, predicate);
    Ok(buf)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Unescape {
    Immediate,
    // Keep backslashes until every pass is done.
    Deferred,
}

fn run<P>(buf: &mut String, table: &AliasTable, predicate: &P)
where
    P: CommandPosition + ?Sized,
{
    match table.settings().expansion {
        ExpansionMode::SinglePass => {
            expand_pass(buf, table, predicate, Unescape::Immediate);
        }
        mode @ ExpansionMode::FixedPoint { .. } => {
            // Escaped keys must stay escaped across passes, so the backslashes
            // only go once the line has settled.
            let max_passes = mode.max_passes();
            let mut settled = false;
            for _ in 0..max_passes {
                if expand_pass(buf, table, predicate, Unescape::Deferred) == 0 {
                    settled = true;
                    break;
                }
            }
            if !settled {
                warn!(max_passes, "alias expansion did not settle, giving up");
            }
            unescape_all(buf, table);
        }
    }

    debug!("alias: input resolved to: '{}'", buf);
}

// Returns the number of substitutions made.
fn expand_pass<P>(buf: &mut String, table: &AliasTable, predicate: &P, unescape: Unescape) -> usize
where
    P: CommandPosition + ?Sized,
{
    let mut substitutions = 0;

    for entry in table.entries() {
        let (key, value) = (entry.key(), entry.value());
        if key.is_empty() {
            continue;
        }

        let mut from = 0;
        while let Some(offset) = buf.get(from..).and_then(|rest| rest.find(key)) {
            let index = from + offset;
            match classify(key, buf.as_str(), index, predicate) {
                Occurrence::Escaped => {
                    debug!("alias: escaping '{}'", key);
                    let index = match unescape {
                        Unescape::Immediate => unescape_at(buf, index).unwrap_or(index),
                        Unescape::Deferred => index,
                    };
                    from = index + key.len();
                }
                Occurrence::Valid => {
                    debug!("alias: '{}' VALID in context '{}'", key, &buf[index..]);
                    buf.replace_range(index..index + key.len(), value);
                    from = index + value.len();
                    substitutions += 1;
                }
                Occurrence::Invalid => {
                    debug!("alias: '{}' INVALID in context '{}'", key, &buf[index..]);
                    from = index + key.len();
                }
            }
        }
    }

    substitutions
}

fn unescape_all(buf: &mut String, table: &AliasTable) {
    for entry in table.entries() {
        let key = entry.key();
        if key.is_empty() {
            continue;
        }

        let mut from = 0;
        while let Some(offset) = buf.get(from..).and_then(|rest| rest.find(key)) {
            let index = from + offset;
            from = unescape_at(buf, index).unwrap_or(index) + key.len();
        }
    }
}
