//! Config command

use crate::app::{ConfigAction, ConfigArgs};
use anyhow::Result;
use nlquery_core::Config;

pub fn run(args: ConfigArgs, config: &Config) -> Result<()> {
    match args.action {
        ConfigAction::Show => print!("{}", config.to_yaml_redacted()?),
        ConfigAction::Path => println!("{}", Config::default_path().display()),
    }
    Ok(())
}
