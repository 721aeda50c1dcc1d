//! Parser for the command language.
//!
//! A script is split into statements on `\n` and `;`. Each statement parses
//! into a closed [`Statement`] value whose variants carry typed arguments,
//! or into a [`ParseError`] whose display text is the feedback line shown to
//! the user. Parsing never touches scene state, so a statement that fails to
//! parse changes nothing.
//!
//! ```text
//! p[(SELECTOR)].ACTION[(ARGS)]    point commands
//! b.mode(MODE)                    blend mode
//! part.force(VALUE)               particle force effect
//! part.info[(TEXT)]               particle info text
//! ```

use std::collections::BTreeSet;

use thiserror::Error;

use crate::blend::BlendMode;

/// One parsed statement.
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    Point {
        selector: Selector,
        action: PointAction,
    },
    SetBlendMode(BlendMode),
    SetParticleForce(f32),
    SetParticleInfo(String),
}

/// Which sources a point command targets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    /// Every source currently in the registry.
    All,
    /// Explicit 0-based registry positions, sorted ascending and unique.
    /// Never empty.
    Positions(Vec<usize>),
}

/// Mutating action of a point command.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointAction {
    Remove,
    SetXy(f32, f32),
    SetFrequency(f32),
    SetAmplitude(f32),
    SetPhase(f32),
    SetPhaseSpeed(f32),
    Circle,
    Grid,
}

impl PointAction {
    /// The command-language name of the action.
    pub fn name(self) -> &'static str {
        match self {
            PointAction::Remove => "rem",
            PointAction::SetXy(..) => "xy",
            PointAction::SetFrequency(_) => "freq",
            PointAction::SetAmplitude(_) => "ampl",
            PointAction::SetPhase(_) => "phase",
            PointAction::SetPhaseSpeed(_) => "phasespeed",
            PointAction::Circle => "circle",
            PointAction::Grid => "grid",
        }
    }
}

/// Why a statement was rejected. The `Display` text is user-facing feedback.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("Unrecognized command prefix in \"{0}\".")]
    UnknownPrefix(String),

    #[error("Unrecognized point command: \"{0}\".")]
    MalformedPoint(String),

    #[error("Invalid selector \"{selector}\" in \"{statement}\".")]
    InvalidSelector { selector: String, statement: String },

    #[error("Unknown point action \"{action}\" in \"{statement}\".")]
    UnknownAction { action: String, statement: String },

    #[error("No args for {action} in \"{statement}\".")]
    MissingArgs { action: String, statement: String },

    #[error("Invalid args for {action} in \"{statement}\".")]
    InvalidArgs { action: String, statement: String },

    #[error("Unknown blend command \"{0}\".")]
    UnknownBlendCommand(String),

    #[error("Invalid blend mode \"{mode}\" in \"{statement}\".")]
    InvalidBlendMode { mode: String, statement: String },

    #[error("Invalid part.force arg in \"{0}\".")]
    InvalidForce(String),

    #[error("Unknown particle command \"{0}\".")]
    UnknownParticleCommand(String),
}

/// Splits a script into trimmed, non-empty statements.
pub fn split_statements(script: &str) -> impl Iterator<Item = &str> {
    script
        .split(['\n', ';'])
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

/// Parses one trimmed statement.
pub fn parse_statement(statement: &str) -> Result<Statement, ParseError> {
    if let Some(rest) = strip_prefix_ignore_case(statement, "part.") {
        parse_particle(statement, rest)
    } else if let Some(rest) = strip_prefix_ignore_case(statement, "b.") {
        parse_blend(statement, rest)
    } else if let Some(rest) = strip_prefix_ignore_case(statement, "p") {
        parse_point(statement, rest)
    } else {
        Err(ParseError::UnknownPrefix(statement.to_string()))
    }
}

fn strip_prefix_ignore_case<'a>(s: &'a str, prefix: &str) -> Option<&'a str> {
    let head = s.get(..prefix.len())?;
    head.eq_ignore_ascii_case(prefix).then(|| &s[prefix.len()..])
}

/// Splits `name(args)` or `name` into its parts. `name` is one or more word
/// characters; the argument text is returned verbatim.
fn split_call(s: &str) -> Option<(&str, Option<&str>)> {
    let name_len = s
        .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
        .unwrap_or(s.len());
    if name_len == 0 {
        return None;
    }
    let (name, rest) = s.split_at(name_len);
    if rest.is_empty() {
        return Some((name, None));
    }
    let args = rest.strip_prefix('(')?.strip_suffix(')')?;
    Some((name, Some(args)))
}

fn parse_point(statement: &str, rest: &str) -> Result<Statement, ParseError> {
    let malformed = || ParseError::MalformedPoint(statement.to_string());

    let (selector, call) = match rest.strip_prefix('(') {
        Some(inner) => {
            let close = inner.find(')').ok_or_else(malformed)?;
            let selector_text = &inner[..close];
            if selector_text.trim().is_empty() {
                return Err(malformed());
            }
            let call = inner[close + 1..].strip_prefix('.').ok_or_else(malformed)?;
            (parse_selector(statement, selector_text)?, call)
        }
        None => (Selector::All, rest.strip_prefix('.').ok_or_else(malformed)?),
    };

    let (name, args) = split_call(call).ok_or_else(malformed)?;
    let action = parse_point_action(statement, name, args)?;
    Ok(Statement::Point { selector, action })
}

/// Parses a 1-based selector list (`3`, `1-4`, `2,5-6`) into sorted unique
/// 0-based positions.
fn parse_selector(statement: &str, text: &str) -> Result<Selector, ParseError> {
    let invalid = || ParseError::InvalidSelector {
        selector: text.to_string(),
        statement: statement.to_string(),
    };
    let one_based = |s: &str| -> Result<usize, ParseError> {
        match s.trim().parse::<usize>() {
            Ok(n) if n >= 1 => Ok(n - 1),
            _ => Err(invalid()),
        }
    };

    let mut positions = BTreeSet::new();
    for part in text.split(',') {
        match part.split_once('-') {
            Some((a, b)) => {
                let (start, end) = (one_based(a)?, one_based(b)?);
                if start > end {
                    return Err(invalid());
                }
                positions.extend(start..=end);
            }
            None => {
                positions.insert(one_based(part)?);
            }
        }
    }
    Ok(Selector::Positions(positions.into_iter().collect()))
}

fn parse_point_action(
    statement: &str,
    name: &str,
    args: Option<&str>,
) -> Result<PointAction, ParseError> {
    let action = name.to_ascii_lowercase();
    let args = args.map(str::trim).filter(|a| !a.is_empty());

    let missing = || ParseError::MissingArgs {
        action: action.clone(),
        statement: statement.to_string(),
    };
    let invalid = || ParseError::InvalidArgs {
        action: action.clone(),
        statement: statement.to_string(),
    };

    let nullary = |a: PointAction| match args {
        None => Ok(a),
        Some(_) => Err(invalid()),
    };
    let floats = |n: usize| -> Result<Vec<f32>, ParseError> {
        let text = args.ok_or_else(missing)?;
        let values = parse_floats(text).ok_or_else(invalid)?;
        if values.len() == n {
            Ok(values)
        } else {
            Err(invalid())
        }
    };

    match action.as_str() {
        "rem" => nullary(PointAction::Remove),
        "circle" => nullary(PointAction::Circle),
        "grid" => nullary(PointAction::Grid),
        "xy" => floats(2).map(|v| PointAction::SetXy(v[0], v[1])),
        "freq" => floats(1).map(|v| PointAction::SetFrequency(v[0])),
        "ampl" => floats(1).map(|v| PointAction::SetAmplitude(v[0])),
        "phase" => floats(1).map(|v| PointAction::SetPhase(v[0])),
        "phasespeed" => floats(1).map(|v| PointAction::SetPhaseSpeed(v[0])),
        _ => Err(ParseError::UnknownAction {
            action: action.clone(),
            statement: statement.to_string(),
        }),
    }
}

/// Parses a comma-separated list of finite floats.
fn parse_floats(text: &str) -> Option<Vec<f32>> {
    text.split(',')
        .map(|s| s.trim().parse::<f32>().ok().filter(|v| v.is_finite()))
        .collect()
}

fn parse_blend(statement: &str, rest: &str) -> Result<Statement, ParseError> {
    let unknown = || ParseError::UnknownBlendCommand(statement.to_string());
    let (name, args) = split_call(rest).ok_or_else(unknown)?;
    if !name.eq_ignore_ascii_case("mode") {
        return Err(unknown());
    }
    let mode_text = args.map(str::trim).filter(|a| !a.is_empty()).ok_or_else(unknown)?;
    mode_text
        .parse::<BlendMode>()
        .map(Statement::SetBlendMode)
        .map_err(|_| ParseError::InvalidBlendMode {
            mode: mode_text.to_ascii_lowercase(),
            statement: statement.to_string(),
        })
}

fn parse_particle(statement: &str, rest: &str) -> Result<Statement, ParseError> {
    let unknown = || ParseError::UnknownParticleCommand(statement.to_string());
    let (name, args) = split_call(rest).ok_or_else(unknown)?;
    match name.to_ascii_lowercase().as_str() {
        "force" => args
            .and_then(|a| a.trim().parse::<f32>().ok())
            .filter(|v| v.is_finite())
            .map(Statement::SetParticleForce)
            .ok_or_else(|| ParseError::InvalidForce(statement.to_string())),
        "info" => Ok(Statement::SetParticleInfo(args.unwrap_or_default().to_string())),
        _ => Err(unknown()),
    }
}
