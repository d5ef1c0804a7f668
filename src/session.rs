//! The alias surface a shell front end talks to.
//!
//! A [`Session`] owns one alias table together with the grammar used to
//! decide command positions. Lines handed to [`Session::run_line`] are either
//! alias builtins or ordinary command lines, which come back expanded.

use std::io::{self, Write};

use tracing::{debug, warn};

use crate::complete::KeyCache;
use crate::config::{self, Settings};
use crate::error::AliasResult;
use crate::expand;
use crate::grammar::{CommandPosition, ShellGrammar};
use crate::listing;
use crate::table::AliasTable;

/// Key of the home-directory alias seeded into new sessions.
pub const HOME_ALIAS: &str = "~";

pub struct Session<P = ShellGrammar> {
    table: AliasTable,
    grammar: P,
    keys: KeyCache,
}

impl Session<ShellGrammar> {
    pub fn new(settings: Settings) -> Self {
        Session::with_grammar(settings, ShellGrammar)
    }
}

impl<P: CommandPosition> Session<P> {
    pub fn with_grammar(settings: Settings, grammar: P) -> Self {
        let seed_home = settings.home_alias;
        let mut session = Session {
            table: AliasTable::with_settings(settings),
            grammar,
            keys: KeyCache::new(),
        };

        if seed_home {
            match config::home_dir() {
                Ok(home) => {
                    if let Err(e) = session.table.restore(HOME_ALIAS, &home) {
                        warn!("failed to seed home alias: {}", e);
                    }
                }
                Err(e) => debug!("no home alias: {}", e),
            }
        }

        session
    }

    pub fn table(&self) -> &AliasTable {
        &self.table
    }

    /// Defines or overwrites an alias.
    pub fn alias(&mut self, key: &str, value: &str) -> AliasResult<()> {
        self.table.define(key, value, &self.grammar)
    }

    pub fn unalias(&mut self, key: &str) -> AliasResult<()> {
        self.table.remove(key)
    }

    /// Writes every alias as `alias key = 'value'`.
    pub fn printaliases<W: Write>(&self, out: &mut W) -> io::Result<()> {
        listing::print_aliases(&self.table, out)
    }

    /// See [`AliasTable::snapshot_keys`].
    pub fn get_all_alias_keys(&mut self, only_on_change: bool) -> Option<Vec<String>> {
        self.table.snapshot_keys(only_on_change)
    }

    /// Expands all aliases in `input`.
    pub fn resolvealiases(&self, input: &str) -> String {
        expand::expand(input, &self.table, &self.grammar)
    }

    /// Runs one input line. Builtins print their own output; any other line
    /// is printed in expanded form.
    ///
    /// Returns `Ok(false)` when a builtin failed. Its message has already
    /// been written to `err`.
    pub fn run_line<O, E>(&mut self, line: &str, out: &mut O, err: &mut E) -> io::Result<bool>
    where
        O: Write,
        E: Write,
    {
        let trimmed = line.trim();
        let builtin = match trimmed.split_whitespace().next() {
            None => return Ok(true),
            Some(word @ ("alias" | "unalias" | "complete")) => word,
            Some(_) => {
                writeln!(out, "{}", self.resolvealiases(line))?;
                return Ok(true);
            }
        };

        let words = match shell_words::split(trimmed) {
            Ok(words) => words,
            Err(e) => {
                writeln!(err, "{}: {}", builtin, e)?;
                return Ok(false);
            }
        };
        let args = &words[1..];

        match builtin {
            "alias" => self.alias_builtin(args, out, err),
            "unalias" => self.unalias_builtin(args, err),
            _ => self.complete_builtin(args, out),
        }
    }

    fn alias_builtin<O: Write, E: Write>(
        &mut self,
        args: &[String],
        out: &mut O,
        err: &mut E,
    ) -> io::Result<bool> {
        let (key, value) = match args {
            [] => {
                self.printaliases(out)?;
                return Ok(true);
            }
            [name] if !name.contains('=') => {
                return match self.table.entry(name) {
                    Some(entry) => {
                        writeln!(out, "{}", listing::format_entry(entry.key(), entry.value()))?;
                        Ok(true)
                    }
                    None => {
                        writeln!(err, "alias: {}: not found", name)?;
                        Ok(false)
                    }
                };
            }
            [first, rest @ ..] => match first.split_once('=') {
                Some((key, head)) => {
                    let mut value = head.to_string();
                    for word in rest {
                        value.push(' ');
                        value.push_str(word);
                    }
                    (key.to_string(), value)
                }
                None => match rest {
                    [eq, tail @ ..] if eq == "=" => (first.clone(), tail.join(" ")),
                    _ => (first.clone(), rest.join(" ")),
                },
            },
        };

        match self.alias(&key, &value) {
            Ok(()) => Ok(true),
            Err(e) => {
                writeln!(err, "alias: {}", e)?;
                Ok(false)
            }
        }
    }

    fn unalias_builtin<E: Write>(&mut self, args: &[String], err: &mut E) -> io::Result<bool> {
        if args.is_empty() {
            writeln!(err, "unalias: missing alias name")?;
            return Ok(false);
        }

        let mut ok = true;
        for name in args {
            if let Err(e) = self.unalias(name) {
                writeln!(err, "unalias: {}", e)?;
                ok = false;
            }
        }
        Ok(ok)
    }

    fn complete_builtin<O: Write>(&mut self, args: &[String], out: &mut O) -> io::Result<bool> {
        self.keys.refresh(&mut self.table);
        let prefix = args.first().map_or("", String::as_str);
        for key in self.keys.complete(prefix) {
            writeln!(out, "{}", key)?;
        }
        Ok(true)
    }
}
