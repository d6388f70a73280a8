use clap::Parser;

/// Arguments for completions command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Generate PowerShell completions:\n    ime-repair completions powershell >> $PROFILE\n\n\
                  Generate bash completions:\n    ime-repair completions bash > ~/.bash_completion.d/ime-repair\n\n\
                  Generate zsh completions:\n    ime-repair completions zsh > ~/.zfunc/_ime-repair\n\n\
                  Generate fish completions:\n    ime-repair completions fish > ~/.config/fish/completions/ime-repair.fish")]
pub struct CompletionsArgs {
    /// Shell type (bash, elvish, fish, powershell, zsh)
    pub shell: String,
}
