use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "nexusctl")]
#[command(author = "Alberto Cavalcante")]
#[command(version)]
#[command(about = "Converge a Nexus repository manager towards a declared state", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Server base URL
    #[arg(long, global = true, env = "NEXUSCTL_URL")]
    pub url: Option<String>,

    /// Username for basic auth
    #[arg(long, global = true, env = "NEXUSCTL_USERNAME")]
    pub username: Option<String>,

    /// Password for basic auth
    #[arg(long, global = true, env = "NEXUSCTL_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Request timeout in seconds
    #[arg(long, global = true, env = "NEXUSCTL_TIMEOUT")]
    pub timeout: Option<u64>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show how every declared resource compares to the server
    Status(StateFileArgs),

    /// Show only the resources that would change
    Diff(StateFileArgs),

    /// Converge the server towards the declared state
    Apply(ApplyArgs),

    /// Manage and run Groovy scripts via the Script API
    #[command(subcommand)]
    Script(ScriptCommand),

    /// Server administration via stock scripts
    #[command(subcommand)]
    Server(ServerCommand),

    /// Send a test email through the configured SMTP settings
    Email(EmailArgs),

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Parser)]
pub struct StateFileArgs {
    /// Path to the state file
    #[arg(short, long)]
    pub file: PathBuf,

    /// Emit results as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Parser)]
pub struct ApplyArgs {
    /// Path to the state file
    #[arg(short, long)]
    pub file: PathBuf,

    /// Plan changes without mutating the server
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Emit results as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Subcommand)]
pub enum ScriptCommand {
    /// List stored scripts
    List,

    /// Show a stored script
    Get {
        /// Script name
        name: String,
    },

    /// Upload a script, replacing any existing one of the same name
    Upload {
        /// Script name
        name: String,

        /// Path to the Groovy source
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Run a stored script
    Run {
        /// Script name
        name: String,

        /// JSON arguments passed to the script
        #[arg(short, long, default_value = "{}")]
        args: String,
    },

    /// Delete a stored script
    Delete {
        /// Script name
        name: String,
    },
}

#[derive(Subcommand)]
pub enum ServerCommand {
    /// Set the server base URL capability
    BaseUrl {
        /// The URL clients reach the server at
        url: String,
    },

    /// Create or update a scheduled task
    Task(TaskArgs),
}

#[derive(Parser)]
pub struct TaskArgs {
    /// Task name
    pub name: String,

    /// Task type id (db.backup, blobstore.compact, ...)
    #[arg(long)]
    pub type_id: String,

    /// Task properties as a JSON object
    #[arg(long, default_value = "{}")]
    pub properties: String,

    /// Cron schedule, quartz syntax
    #[arg(long)]
    pub cron: String,

    /// Address to send task alerts to
    #[arg(long)]
    pub alert_email: Option<String>,
}

#[derive(Parser)]
pub struct EmailArgs {
    /// Recipient of the verification email
    #[arg(long)]
    pub to: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn apply_parses_dry_run_and_file() {
        let cli = Cli::try_parse_from([
            "nexusctl", "apply", "--file", "state.json", "--dry-run", "--json",
        ])
        .unwrap();
        match cli.command {
            Commands::Apply(args) => {
                assert!(args.dry_run);
                assert!(args.json);
                assert_eq!(args.file, PathBuf::from("state.json"));
            }
            _ => panic!("expected apply"),
        }
    }

    #[test]
    fn connection_flags_are_global() {
        let cli = Cli::try_parse_from([
            "nexusctl",
            "status",
            "--file",
            "state.json",
            "--url",
            "https://nexus.example.org",
            "--timeout",
            "5",
        ])
        .unwrap();
        assert_eq!(cli.url.as_deref(), Some("https://nexus.example.org"));
        assert_eq!(cli.timeout, Some(5));
    }
}
