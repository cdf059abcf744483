use super::super::args::*;
use crate::exit_codes::SUCCESS;

pub fn dispatch(cli: Cli) -> anyhow::Result<i32> {
    match cli.cmd {
        Command::Run(args) => super::run::run(args),
        Command::Cache(args) => match args.cmd {
            CacheSub::Stats(target) => super::cache::cmd_stats(target),
            CacheSub::Clear(target) => super::cache::cmd_clear(target),
        },
        Command::Init(args) => super::init::run(args),
        Command::Version => {
            println!("{}", env!("CARGO_PKG_VERSION"));
            Ok(SUCCESS)
        }
    }
}
