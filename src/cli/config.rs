use clap::{Parser, Subcommand};

/// Arguments for the config command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Point the project at a private index:\n    mur config set index-url http://localhost:8080/simple\n\n\
                  Show effective settings:\n    mur config list\n\n\
                  Write defaults to ~/.murmurrc:\n    mur config init --global")]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum ConfigSubcommand {
    /// Set a value
    Set {
        key: String,
        value: String,
        /// Write to ~/.murmurrc instead of ./.murmurrc
        #[arg(long)]
        global: bool,
    },

    /// Print a value
    Get {
        key: String,
        /// Read only ~/.murmurrc
        #[arg(long)]
        global: bool,
    },

    /// Print all values
    List {
        /// Read only ~/.murmurrc
        #[arg(long)]
        global: bool,
    },

    /// Remove a value
    Unset {
        key: String,
        /// Remove from ~/.murmurrc instead of ./.murmurrc
        #[arg(long)]
        global: bool,
    },

    /// Write the default registry settings
    Init {
        /// Initialize ~/.murmurrc instead of ./.murmurrc
        #[arg(long)]
        global: bool,
    },
}
