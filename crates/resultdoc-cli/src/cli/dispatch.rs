//! Dispatch logic: extract params from ArgMatches and convert to command args.

use std::path::PathBuf;

use clap::ArgMatches;

use super::ColorChoice;
use crate::commands::dump::DumpArgs;
use crate::commands::fmt::FmtArgs;
use crate::commands::get::GetArgs;
use crate::commands::merge::MergeArgs;

pub struct FmtParams {
    pub input: PathBuf,
    pub indent: Option<u8>,
    pub crlf: bool,
    pub ascii: bool,
    pub max_depth: u32,
}

impl FmtParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        Self {
            input: input_path(m),
            indent: m.get_one::<u8>("indent").copied(),
            crlf: m.get_flag("crlf"),
            ascii: m.get_flag("ascii"),
            max_depth: m.get_one::<u32>("max_depth").copied().unwrap_or(1000),
        }
    }
}

impl From<FmtParams> for FmtArgs {
    fn from(p: FmtParams) -> Self {
        Self {
            input: p.input,
            indent: p.indent,
            crlf: p.crlf,
            ascii: p.ascii,
            max_depth: p.max_depth,
        }
    }
}

pub struct DumpParams {
    pub input: PathBuf,
    pub color: ColorChoice,
}

impl DumpParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        Self {
            input: input_path(m),
            color: parse_color(m),
        }
    }
}

impl From<DumpParams> for DumpArgs {
    fn from(p: DumpParams) -> Self {
        Self {
            input: p.input,
            color: p.color.should_colorize(),
        }
    }
}

pub struct GetParams {
    pub input: PathBuf,
    pub path: String,
    pub indent: Option<u8>,
}

impl GetParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        Self {
            input: input_path(m),
            path: m.get_one::<String>("path").cloned().unwrap_or_default(),
            indent: m.get_one::<u8>("indent").copied(),
        }
    }
}

impl From<GetParams> for GetArgs {
    fn from(p: GetParams) -> Self {
        Self {
            input: p.input,
            path: p.path,
            indent: p.indent,
        }
    }
}

pub struct MergeParams {
    pub inputs: Vec<PathBuf>,
    pub indent: Option<u8>,
    pub trace: bool,
    pub dump: bool,
    pub color: ColorChoice,
}

impl MergeParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        Self {
            inputs: m
                .get_many::<PathBuf>("inputs")
                .map(|paths| paths.cloned().collect())
                .unwrap_or_default(),
            indent: m.get_one::<u8>("indent").copied(),
            trace: m.get_flag("trace"),
            dump: m.get_flag("dump"),
            color: parse_color(m),
        }
    }
}

impl From<MergeParams> for MergeArgs {
    fn from(p: MergeParams) -> Self {
        Self {
            inputs: p.inputs,
            indent: p.indent,
            trace: p.trace,
            dump: p.dump,
            color: p.color.should_colorize(),
        }
    }
}

fn input_path(m: &ArgMatches) -> PathBuf {
    m.get_one::<PathBuf>("input")
        .cloned()
        .unwrap_or_else(|| PathBuf::from("-"))
}

fn parse_color(m: &ArgMatches) -> ColorChoice {
    match m.get_one::<String>("color").map(|s| s.as_str()) {
        Some("always") => ColorChoice::Always,
        Some("never") => ColorChoice::Never,
        _ => ColorChoice::Auto,
    }
}
