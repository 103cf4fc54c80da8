use clap::Parser;
use std::path::PathBuf;

/// Arguments for the publish command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Publish using murmur-build.yaml and the files in <name>/dist:\n    mur publish\n\n\
                  Publish files from another directory:\n    mur publish --dist-dir build/dist")]
pub struct PublishArgs {
    /// Directory holding the built wheel and source archive (defaults to <name>/dist)
    #[arg(long)]
    pub dist_dir: Option<PathBuf>,
}
