use clap::Parser;

/// Arguments for completions command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Generate bash completions:\n    mur completions bash > ~/.bash_completion.d/mur\n\n\
                  Generate zsh completions:\n    mur completions zsh > ~/.zfunc/_mur\n\n\
                  Generate fish completions:\n    mur completions fish > ~/.config/fish/completions/mur.fish")]
pub struct CompletionsArgs {
    /// Shell type (bash, elvish, fish, powershell, zsh)
    pub shell: String,
}
