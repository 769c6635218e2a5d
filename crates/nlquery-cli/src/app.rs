//! CLI argument definitions

use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "nlquery")]
#[command(
    author,
    version,
    about = "Ask questions about vulnerability and component records in plain language"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format
    #[arg(long, global = true, value_enum, default_value = "cli")]
    pub format: OutputFormat,

    /// Verbose output (debug logging, including full prompts)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run a natural language prompt against the index
    Ask(PromptArgs),

    /// Print the exact prompt the model would receive
    Prompt(PromptArgs),

    /// Inspect or rebuild the schema snapshot
    Schema(SchemaArgs),

    /// Show configuration
    Config(ConfigArgs),

    /// Start MCP server
    Mcp,
}

#[derive(Args)]
pub struct PromptArgs {
    /// Prompt text (words are joined with spaces)
    #[arg(trailing_var_arg = true)]
    pub prompt: Vec<String>,
}

impl PromptArgs {
    pub fn text(&self) -> String {
        self.prompt.join(" ")
    }
}

#[derive(Args)]
pub struct SchemaArgs {
    #[command(subcommand)]
    pub action: SchemaAction,
}

#[derive(Subcommand)]
pub enum SchemaAction {
    /// Show the live schema snapshot
    Show,

    /// Rescan the data index and replace the snapshot
    Refresh,
}

#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print the effective configuration (API key redacted)
    Show,

    /// Print the configuration file path
    Path,
}

#[derive(Clone, Copy, ValueEnum, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Cli,
    Json,
}
