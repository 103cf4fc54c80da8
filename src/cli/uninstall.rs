use clap::Parser;

/// Arguments for the uninstall command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Uninstall one artifact:\n    mur uninstall my-agent\n\n\
                  Uninstall every artifact listed in murmur.yaml:\n    mur uninstall")]
pub struct UninstallArgs {
    /// Artifact to uninstall (if omitted, uninstalls everything in murmur.yaml)
    pub name: Option<String>,
}
