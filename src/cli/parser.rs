use crate::export::ExportFormat;
use crate::models::player::CategoryFilter;
use clap::{Parser, Subcommand};

/// Command-line interface definition for squadlog
/// Team attendance register with monthly analytics, stored in a SQLite workbook
#[derive(Parser)]
#[command(
    name = "squadlog",
    version = env!("CARGO_PKG_VERSION"),
    about = "Team attendance register: record training attendance and build monthly summaries",
    long_about = None
)]
pub struct Cli {
    /// Override workbook path (useful for tests or a custom workbook)
    #[arg(global = true, long = "db")]
    pub db: Option<String>,

    /// Run in test mode (no config file update)
    #[arg(global = true, long = "test", hide = true)]
    pub test: bool,

    /// Password required for writes when `access_password` is configured
    #[arg(global = true, long = "password")]
    pub password: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the configuration and the workbook
    Init,

    /// Manage the configuration file (view, check or edit)
    Config {
        #[arg(long = "print", help = "Print the current configuration")]
        print_config: bool,

        #[arg(long = "check", help = "Check configuration file for missing fields")]
        check: bool,

        #[arg(
            long = "edit",
            help = "Edit the configuration file (default editor: $EDITOR, or nano/notepad)"
        )]
        edit_config: bool,

        #[arg(
            long = "editor",
            help = "Specify the editor to use (vim, nano, or custom path)"
        )]
        editor: Option<String>,
    },

    /// Manage the workbook database (migrations, integrity checks, etc.)
    Db {
        #[arg(long = "migrate", help = "Run pending database migrations")]
        migrate: bool,

        #[arg(long = "check", help = "Check database integrity")]
        check: bool,

        #[arg(long = "vacuum", help = "Optimize the database using VACUUM")]
        vacuum: bool,

        #[arg(long = "info", help = "Show workbook information")]
        info: bool,
    },

    /// Print the internal log table
    Log {
        #[arg(long = "print", help = "Print rows from the internal log table")]
        print: bool,
    },

    /// List the roster or add a player to it
    Roster {
        #[arg(long, value_enum, default_value = "todas")]
        category: CategoryFilter,

        /// Name of the player to add
        #[arg(long, value_name = "NAME", requires = "code")]
        add: Option<String>,

        /// Category codes of the new player: 1, 2 or 1,2
        #[arg(long, value_name = "CODES")]
        code: Option<String>,
    },

    /// Show who is already present and who is still pending for a date
    Pending {
        /// Training date (YYYY-MM-DD or "today")
        date: String,

        #[arg(long, value_enum, default_value = "todas")]
        category: CategoryFilter,
    },

    /// Record attendance for a date
    Submit {
        /// Training date (YYYY-MM-DD or "today")
        date: String,

        #[arg(long, value_enum, default_value = "todas")]
        category: CategoryFilter,

        /// Player who attended (repeatable)
        #[arg(long = "present", value_name = "NAME")]
        present: Vec<String>,

        /// Player who arrived late (repeatable; only kept for present players)
        #[arg(long = "late", value_name = "NAME")]
        late: Vec<String>,

        /// Comment for a player, as NAME=TEXT (repeatable)
        #[arg(long = "comment", value_name = "NAME=TEXT")]
        comment: Vec<String>,
    },

    /// Print the attendance summary, optionally publishing it to the workbook
    Summary {
        #[arg(long, value_enum, default_value = "todas")]
        category: CategoryFilter,

        #[arg(
            long,
            value_name = "RANGE",
            help = "Filter by year/month/day or a custom range"
        )]
        range: Option<String>,

        /// Write the summary tables to the summary worksheet
        #[arg(long)]
        publish: bool,
    },

    /// Export the attendance summary to a file
    Export {
        #[arg(long, value_enum, default_value = "csv")]
        format: ExportFormat,

        #[arg(long, value_name = "FILE")]
        file: String,

        #[arg(long, value_enum, default_value = "todas")]
        category: CategoryFilter,

        #[arg(
            long,
            value_name = "RANGE",
            help = "Filter export by year/month/day or a custom range"
        )]
        range: Option<String>,

        /// Overwrite output file without confirmation
        #[arg(long, short = 'f')]
        force: bool,
    },

    /// Copy the workbook file to a backup location
    Backup {
        #[arg(long, value_name = "FILE")]
        file: String,

        #[arg(long)]
        compress: bool,
    },
}
