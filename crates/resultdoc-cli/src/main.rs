mod cli;
mod commands;

use cli::{DumpParams, FmtParams, GetParams, MergeParams, build_cli};

fn main() {
    let matches = build_cli().get_matches();

    match matches.subcommand() {
        Some(("fmt", m)) => {
            let params = FmtParams::from_matches(m);
            commands::fmt::run(params.into());
        }
        Some(("dump", m)) => {
            let params = DumpParams::from_matches(m);
            commands::dump::run(params.into());
        }
        Some(("get", m)) => {
            let params = GetParams::from_matches(m);
            commands::get::run(params.into());
        }
        Some(("merge", m)) => {
            let params = MergeParams::from_matches(m);
            commands::merge::run(params.into());
        }
        _ => unreachable!("clap should have caught this"),
    }
}
