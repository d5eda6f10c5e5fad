//! [`ArgParser`] backed by `clap`.
//!
//! The command text becomes the binary name, so usage and help output read
//! `Usage: /ban@mybot <user>`. Every clap error is a [`ParserExit`]: clap uses
//! errors for help and version output as well as for bad input.

use botcmd_types::argument::Argument;
use botcmd_types::config::{ArgKind, ArgSpec, CommandSpec};
use botcmd_types::error::{ConfigError, ExitKind, ParseError, ParserExit};
use botcmd_types::namespace::{ArgValue, Namespace, ParsedValue};
use clap::error::ErrorKind;
use clap::parser::ValueSource;
use clap::{Arg, ArgAction, ArgMatches, ColorChoice};

use crate::parser::ArgParser;

/// Argument grammar held as a `clap::Command` template.
///
/// The template is cloned per parse, so one `ClapParser` can serve any number
/// of concurrent invocations.
#[derive(Debug, Clone)]
pub struct ClapParser {
    command: clap::Command,
}

impl ClapParser {
    pub fn new(command: clap::Command) -> Self {
        Self {
            command: command.color(ColorChoice::Never),
        }
    }

    /// Build a parser from a declarative command definition.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] for definitions clap would reject or
    /// could never satisfy: duplicate ids or option names, option names on a
    /// positional, a default on a flag or count, a required positional after
    /// an optional one, or a positional following a `rest` argument.
    pub fn from_spec(spec: &CommandSpec) -> Result<Self, ConfigError> {
        validate_spec(spec)?;

        let name = spec.name.trim_start_matches('/').to_string();
        let mut command = clap::Command::new(name);
        if let Some(about) = &spec.about {
            command = command.about(about.clone());
        }
        for arg in &spec.args {
            command = command.arg(build_arg(arg));
        }
        Ok(Self::new(command))
    }

    pub fn command(&self) -> &clap::Command {
        &self.command
    }
}

impl ArgParser for ClapParser {
    fn parse(&self, prog: &str, tokens: &[Argument]) -> Result<Namespace, ParseError> {
        let argv = std::iter::once(prog.to_string()).chain(tokens.iter().map(|t| t.value.clone()));

        let matches = self
            .command
            .clone()
            .bin_name(prog.to_string())
            .try_get_matches_from(argv)
            .map_err(exit_from_clap)?;

        let layout = index_layout(&self.command, tokens);
        let mut namespace = Namespace::new();
        for arg in self.command.get_arguments() {
            let id = arg.get_id().as_str();
            if let Some(value) = read_value(&matches, arg, tokens, &layout)? {
                namespace.insert(id, value);
            }
        }
        Ok(namespace)
    }
}

fn exit_from_clap(err: clap::Error) -> ParserExit {
    let kind = match err.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => {
            ExitKind::Help
        }
        ErrorKind::DisplayVersion => ExitKind::Version,
        _ => ExitKind::Usage,
    };
    ParserExit {
        kind,
        message: err.to_string().trim_end().to_string(),
    }
}

fn internal(err: clap::parser::MatchesError) -> ParseError {
    ParseError::Internal(err.to_string())
}

fn read_value(
    matches: &ArgMatches,
    arg: &Arg,
    tokens: &[Argument],
    layout: &[usize],
) -> Result<Option<ParsedValue>, ParseError> {
    let id = arg.get_id().as_str();
    let value = match arg.get_action() {
        ArgAction::SetTrue | ArgAction::SetFalse => matches
            .try_get_one::<bool>(id)
            .map_err(internal)?
            .map(|v| ParsedValue::Flag(*v)),
        ArgAction::Count => matches
            .try_get_one::<u8>(id)
            .map_err(internal)?
            .map(|v| ParsedValue::Count(*v)),
        ArgAction::Set | ArgAction::Append => {
            let Some(raw) = matches.try_get_raw(id).map_err(internal)? else {
                return Ok(None);
            };
            let from_default = matches.value_source(id) == Some(ValueSource::DefaultValue);
            let indices: Vec<usize> = matches
                .indices_of(id)
                .map(|indices| indices.collect())
                .unwrap_or_default();

            let values = raw
                .enumerate()
                .map(|(n, raw)| {
                    let value = raw.to_string_lossy().into_owned();
                    let token = if from_default {
                        None
                    } else {
                        indices
                            .get(n)
                            .and_then(|&index| source_token(tokens, layout, index, &value))
                    };
                    ArgValue::new(value, token)
                })
                .collect();
            Some(ParsedValue::Values(values))
        }
        _ => None,
    };
    Ok(value)
}

/// Token index behind each clap index.
///
/// clap numbers the flags and values it sees rather than argv entries: an
/// attached value (`--reason=spam`, `-rspam`) takes an index of its own after
/// its flag, and each letter of a short cluster (`-sv`) takes one. `--` takes
/// none. Entry `n` of the result is the token behind clap index `n + 1`
/// (index 0 is the binary name).
fn index_layout(command: &clap::Command, tokens: &[Argument]) -> Vec<usize> {
    let long_takes_value = |name: &str| {
        command
            .get_arguments()
            .any(|a| a.get_long() == Some(name) && a.get_action().takes_values())
    };
    let short_takes_value = |c: char| {
        command
            .get_arguments()
            .any(|a| a.get_short() == Some(c) && a.get_action().takes_values())
    };
    let leading_positionals = command
        .get_positionals()
        .filter(|a| !a.is_trailing_var_arg_set())
        .count();
    let has_trailing = command.get_positionals().any(|a| a.is_trailing_var_arg_set());

    let mut layout = Vec::with_capacity(tokens.len());
    let mut escaped = false;
    let mut pending_value = false;
    let mut positionals = 0;

    for (i, token) in tokens.iter().enumerate() {
        let value = token.value.as_str();
        if escaped || pending_value || value == "-" || !value.starts_with('-') {
            if !pending_value && !escaped {
                positionals += 1;
                // Once the trailing argument starts, everything is its value.
                escaped = has_trailing && positionals > leading_positionals;
            }
            pending_value = false;
            layout.push(i);
        } else if value == "--" {
            escaped = true;
        } else if let Some(long) = value.strip_prefix("--") {
            layout.push(i);
            match long.split_once('=') {
                Some(_) => layout.push(i),
                None => pending_value = long_takes_value(long),
            }
        } else {
            let cluster = &value[1..];
            for (at, c) in cluster.char_indices() {
                layout.push(i);
                if short_takes_value(c) {
                    if at + c.len_utf8() < cluster.len() {
                        layout.push(i);
                    } else {
                        pending_value = true;
                    }
                    break;
                }
            }
        }
    }
    layout
}

/// Find the token a parsed value came from, if its text confirms it.
fn source_token(
    tokens: &[Argument],
    layout: &[usize],
    clap_index: usize,
    value: &str,
) -> Option<usize> {
    let token = *layout.get(clap_index.checked_sub(1)?)?;
    let text = tokens.get(token)?.value.as_str();
    (text == value || text.ends_with(value)).then_some(token)
}

fn build_arg(spec: &ArgSpec) -> Arg {
    let mut arg = Arg::new(spec.id.clone());

    let long = spec.long.clone().unwrap_or_else(|| spec.id.clone());
    arg = match spec.kind {
        ArgKind::Positional => arg.action(ArgAction::Set).required(spec.required),
        ArgKind::Rest => arg
            .action(ArgAction::Append)
            .num_args(1..)
            .trailing_var_arg(true)
            .required(spec.required),
        ArgKind::Option => arg.long(long).action(ArgAction::Set).required(spec.required),
        ArgKind::Append => arg
            .long(long)
            .action(ArgAction::Append)
            .required(spec.required),
        ArgKind::Flag => arg.long(long).action(ArgAction::SetTrue),
        ArgKind::Count => arg.long(long).action(ArgAction::Count),
    };

    if let Some(short) = spec.short.filter(|_| !is_positional(spec.kind)) {
        arg = arg.short(short);
    }
    if let Some(help) = &spec.help {
        arg = arg.help(help.clone());
    }
    if let Some(default) = &spec.default {
        arg = arg.default_value(default.clone());
    }
    arg
}

fn is_positional(kind: ArgKind) -> bool {
    matches!(kind, ArgKind::Positional | ArgKind::Rest)
}

fn validate_spec(spec: &CommandSpec) -> Result<(), ConfigError> {
    let name = spec.name.trim_start_matches('/');
    if name.is_empty() || name.contains(char::is_whitespace) {
        return Err(ConfigError::Invalid(format!(
            "command name '{}' must be a single non-empty word",
            spec.name
        )));
    }

    let mut ids = Vec::new();
    let mut longs = Vec::new();
    let mut shorts = Vec::new();
    let mut seen_optional_positional = false;
    let mut seen_rest = false;

    for arg in &spec.args {
        if arg.id.is_empty() {
            return Err(ConfigError::Invalid(format!(
                "/{name}: argument id cannot be empty"
            )));
        }
        if ids.contains(&arg.id.as_str()) {
            return Err(ConfigError::Invalid(format!(
                "/{name}: duplicate argument id '{}'",
                arg.id
            )));
        }
        ids.push(arg.id.as_str());

        if is_positional(arg.kind) {
            if arg.long.is_some() || arg.short.is_some() {
                return Err(ConfigError::Invalid(format!(
                    "/{name}: positional '{}' cannot have an option name",
                    arg.id
                )));
            }
            if seen_rest {
                return Err(ConfigError::Invalid(format!(
                    "/{name}: positional '{}' follows a rest argument",
                    arg.id
                )));
            }
            if arg.required && seen_optional_positional {
                return Err(ConfigError::Invalid(format!(
                    "/{name}: required positional '{}' follows an optional one",
                    arg.id
                )));
            }
            seen_optional_positional |= !arg.required;
            seen_rest |= arg.kind == ArgKind::Rest;
            continue;
        }

        if arg.default.is_some() && matches!(arg.kind, ArgKind::Flag | ArgKind::Count) {
            return Err(ConfigError::Invalid(format!(
                "/{name}: {} '{}' cannot have a default value",
                if arg.kind == ArgKind::Flag { "flag" } else { "count" },
                arg.id
            )));
        }

        let long = arg.long.as_deref().unwrap_or(&arg.id);
        if long == "help" || longs.contains(&long) {
            return Err(ConfigError::Invalid(format!(
                "/{name}: option name '--{long}' is already taken"
            )));
        }
        longs.push(long);

        if let Some(short) = arg.short {
            if short == 'h' || short == '-' || shorts.contains(&short) {
                return Err(ConfigError::Invalid(format!(
                    "/{name}: short option '-{short}' is already taken"
                )));
            }
            shorts.push(short);
        }
    }
    Ok(())
}
