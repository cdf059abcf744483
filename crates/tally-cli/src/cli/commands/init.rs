use super::InitArgs;
use crate::exit_codes;
use tally_core::config::write_sample_config;

pub fn run(args: InitArgs) -> anyhow::Result<i32> {
    if args.config.exists() && !args.force {
        eprintln!(
            "{} already exists (use --force to overwrite)",
            args.config.display()
        );
        return Ok(exit_codes::CONFIG_ERROR);
    }
    write_sample_config(&args.config)?;
    println!("created {}", args.config.display());
    Ok(exit_codes::SUCCESS)
}
