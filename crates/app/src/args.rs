use std::fmt;
use std::path::PathBuf;

use learn_core::model::{BookmarkableEntity, CardId, EntityKind};

pub const SESSION_FILE_VAR: &str = "LEARN_SESSION_FILE";
pub const DEFAULT_SESSION_FILE: &str = ".learn-session.json";

#[derive(Debug, PartialEq, Eq)]
pub enum ArgsError {
    MissingCommand,
    MissingValue { flag: &'static str },
    MissingArgument { name: &'static str },
    UnknownArg(String),
    UnknownCommand(String),
    InvalidCardId { raw: String },
    InvalidKind { raw: String },
    InvalidBool { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingCommand => write!(f, "a command is required"),
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::MissingArgument { name } => write!(f, "missing <{name}>"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::UnknownCommand(cmd) => write!(f, "unknown command: {cmd}"),
            ArgsError::InvalidCardId { raw } => write!(f, "invalid --id value: {raw}"),
            ArgsError::InvalidKind { raw } => write!(f, "invalid --kind value: {raw}"),
            ArgsError::InvalidBool { raw } => write!(f, "invalid --initial value: {raw}"),
        }
    }
}

impl std::error::Error for ArgsError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgressInput {
    Files { tree: PathBuf, records: PathBuf },
    Remote,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavAction {
    Push(String),
    Back(String),
    Show,
    Clear,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookmarkAction {
    Toggle,
    Status,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    Progress(ProgressInput),
    Nav {
        session: PathBuf,
        action: NavAction,
    },
    Bookmark {
        action: BookmarkAction,
        entity: BookmarkableEntity,
        initial: Option<bool>,
    },
}

pub fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  app progress --tree <file.json> --records <file.json>");
    eprintln!("  app progress --remote");
    eprintln!("  app nav push <path>    [--session <file>]");
    eprintln!("  app nav back <current> [--session <file>]");
    eprintln!("  app nav show|clear     [--session <file>]");
    eprintln!("  app bookmark toggle|status --id <card> [--kind public|user_owned] [--initial true|false]");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  {SESSION_FILE_VAR} (default {DEFAULT_SESSION_FILE})");
    eprintln!("  LEARN_API_BASE_URL, LEARN_API_TOKEN, LEARN_API_TIMEOUT_SECS");
    eprintln!("  RUST_LOG (default info)");
}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

impl Command {
    /// Parse everything after the program name. `session_default` is used when
    /// `--session` is absent.
    pub fn parse(
        args: impl IntoIterator<Item = String>,
        session_default: PathBuf,
    ) -> Result<Self, ArgsError> {
        let mut args = args.into_iter();
        match args.next().as_deref() {
            None => Err(ArgsError::MissingCommand),
            Some("--help" | "-h" | "help") => Ok(Self::Help),
            Some("progress") => Self::parse_progress(&mut args),
            Some("nav") => Self::parse_nav(&mut args, session_default),
            Some("bookmark") => Self::parse_bookmark(&mut args),
            Some(other) => Err(ArgsError::UnknownCommand(other.to_owned())),
        }
    }

    fn parse_progress(args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut tree = None;
        let mut records = None;
        let mut remote = false;
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--tree" => tree = Some(PathBuf::from(require_value(args, "--tree")?)),
                "--records" => records = Some(PathBuf::from(require_value(args, "--records")?)),
                "--remote" => remote = true,
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }
        if remote {
            if tree.is_some() {
                return Err(ArgsError::UnknownArg("--tree".into()));
            }
            if records.is_some() {
                return Err(ArgsError::UnknownArg("--records".into()));
            }
            return Ok(Self::Progress(ProgressInput::Remote));
        }
        Ok(Self::Progress(ProgressInput::Files {
            tree: tree.ok_or(ArgsError::MissingValue { flag: "--tree" })?,
            records: records.ok_or(ArgsError::MissingValue { flag: "--records" })?,
        }))
    }

    fn parse_nav(
        args: &mut impl Iterator<Item = String>,
        mut session: PathBuf,
    ) -> Result<Self, ArgsError> {
        let mut verb = None;
        let mut operand = None;
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--session" => session = PathBuf::from(require_value(args, "--session")?),
                _ if verb.is_none() => verb = Some(arg),
                _ if operand.is_none() => operand = Some(arg),
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        let action = match (verb.as_deref(), operand) {
            (Some("push"), operand) => {
                NavAction::Push(operand.ok_or(ArgsError::MissingArgument { name: "path" })?)
            }
            (Some("back"), operand) => {
                NavAction::Back(operand.ok_or(ArgsError::MissingArgument { name: "current" })?)
            }
            (Some("show" | "clear"), Some(extra)) => return Err(ArgsError::UnknownArg(extra)),
            (Some("show"), None) => NavAction::Show,
            (Some("clear"), None) => NavAction::Clear,
            (Some(other), _) => return Err(ArgsError::UnknownCommand(format!("nav {other}"))),
            (None, _) => return Err(ArgsError::MissingArgument { name: "action" }),
        };
        Ok(Self::Nav { session, action })
    }

    fn parse_bookmark(args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let action = match args.next().as_deref() {
            Some("toggle") => BookmarkAction::Toggle,
            Some("status") => BookmarkAction::Status,
            Some(other) => return Err(ArgsError::UnknownCommand(format!("bookmark {other}"))),
            None => return Err(ArgsError::MissingArgument { name: "action" }),
        };

        let mut id = None;
        let mut kind = EntityKind::default();
        let mut initial = None;
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--id" => {
                    let value = require_value(args, "--id")?;
                    let parsed: CardId = value
                        .parse()
                        .map_err(|_| ArgsError::InvalidCardId { raw: value.clone() })?;
                    id = Some(parsed);
                }
                "--kind" => {
                    let value = require_value(args, "--kind")?;
                    kind = value
                        .parse()
                        .map_err(|_| ArgsError::InvalidKind { raw: value.clone() })?;
                }
                "--initial" => {
                    let value = require_value(args, "--initial")?;
                    let parsed: bool = value
                        .parse()
                        .map_err(|_| ArgsError::InvalidBool { raw: value.clone() })?;
                    initial = Some(parsed);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        let id = id.ok_or(ArgsError::MissingValue { flag: "--id" })?;
        Ok(Self::Bookmark {
            action,
            entity: BookmarkableEntity::new(id, kind),
            initial,
        })
    }
}
