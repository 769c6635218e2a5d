//! Ask command

use crate::app::{OutputFormat, PromptArgs};
use crate::output;
use anyhow::Result;
use nlquery_core::{Config, Pipeline};

pub async fn run(args: PromptArgs, config: &Config, format: OutputFormat) -> Result<i32> {
    let pipeline = Pipeline::from_config(config)?;
    let response = pipeline.handle(&args.text()).await;

    print!("{}", output::format_response(&response, format));

    Ok(response.exit_code())
}
