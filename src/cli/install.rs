use clap::Parser;

/// Arguments for the install command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Install every agent and tool in murmur.yaml:\n    mur install\n\n\
                  Install the latest version of one artifact:\n    mur install my-agent")]
pub struct InstallArgs {
    /// Artifact to install (if omitted, installs everything in murmur.yaml)
    pub name: Option<String>,
}
