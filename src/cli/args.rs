// src/cli/args.rs
use crate::domain::client_state::ActiveCategory;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "navigator", author, version, about, long_about = None)]
/// A personal bookmark navigator: categories of links, kept by a tiny JSON server
pub struct Cli {
    /// Sets a custom config file
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Operate on this data file directly instead of talking to the server
    #[arg(long, value_name = "FILE")]
    pub local: Option<PathBuf>,

    /// Turn debugging information on
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub debug: u8,

    /// Disable colored output
    #[arg(long = "no-color")]
    pub no_color: bool,

    #[arg(long = "generate-config", help = "print default configuration as TOML")]
    pub generate_config: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// On/off switch for client-local toggles
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Switch {
    On,
    Off,
}

impl Switch {
    pub fn enabled(self) -> bool {
        self == Switch::On
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ViewMode {
    /// Only the active category's bookmarks
    Single,
    /// Every category under its own header
    Grouped,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Runs the persistence server
    Serve {
        /// Listen address, e.g. 127.0.0.1:3000
        #[arg(long, value_name = "ADDR")]
        bind: Option<String>,

        /// Data file to serve
        #[arg(long = "data-file", value_name = "FILE")]
        data_file: Option<String>,
    },

    /// Shows categories and bookmarks
    Show {
        #[arg(long = "json", help = "output the view as JSON")]
        is_json: bool,
    },

    /// Opens a bookmark in the default browser
    Open { id: i64 },

    /// Adds a category and selects it
    AddCategory { name: String },

    /// Renames a category
    RenameCategory { id: i64, name: String },

    /// Deletes a category together with its bookmarks
    DeleteCategory {
        id: i64,

        #[arg(short = 'y', long = "yes", help = "skip confirmation")]
        yes: bool,
    },

    /// Adds a bookmark to a category
    AddBookmark {
        /// Category id
        category: i64,
        name: String,
        url: String,
    },

    /// Changes name, URL or category of a bookmark
    EditBookmark {
        id: i64,

        #[arg(short = 'n', long = "name")]
        name: Option<String>,

        #[arg(short = 'u', long = "url")]
        url: Option<String>,

        #[arg(short = 'c', long = "category", help = "move to this category id")]
        category: Option<i64>,
    },

    /// Deletes a bookmark
    DeleteBookmark {
        id: i64,

        #[arg(short = 'y', long = "yes", help = "skip confirmation")]
        yes: bool,
    },

    /// Puts categories in a new order (requires allow-drag on)
    MoveCategories {
        /// Every category id, in the new order (space or comma separated)
        #[arg(required = true, num_args = 1..)]
        ids: Vec<String>,
    },

    /// Puts the bookmarks of one category in a new order
    MoveBookmarks {
        category: i64,

        /// Every bookmark id of the category, in the new order
        #[arg(required = true, num_args = 1..)]
        ids: Vec<String>,
    },

    /// Collapses a category group
    Collapse { id: i64 },

    /// Expands a category group
    Expand { id: i64 },

    /// Flips a category group between collapsed and expanded
    Toggle { id: i64 },

    /// Expands every category group
    ExpandAll,

    /// Collapses every category group
    CollapseAll,

    /// Selects a category, or `all`
    Select { target: ActiveCategory },

    /// Switches between single-category and grouped view
    View {
        #[arg(value_enum)]
        mode: ViewMode,
    },

    /// Enables or disables category reordering
    AllowDrag {
        #[arg(value_enum)]
        state: Switch,
    },

    /// Writes a dated backup of all data
    Export {
        /// Target directory (defaults to the configured backup directory)
        dir: Option<PathBuf>,
    },

    /// Replaces all data with the content of a backup file
    Import {
        file: PathBuf,

        #[arg(short = 'y', long = "yes", help = "skip confirmation")]
        yes: bool,
    },

    /// Interactive shell running the commands above
    Shell,

    /// Generates shell completion scripts
    Completion {
        /// Shell to generate completions for (bash, zsh, fish)
        shell: String,
    },
}

/// One line typed into the interactive shell
#[derive(Parser, Debug)]
#[command(name = "navigator", no_binary_name = true, disable_version_flag = true)]
pub struct ShellLine {
    #[command(subcommand)]
    pub command: Commands,
}
