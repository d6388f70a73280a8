use clap::Parser;

/// Arguments for the list command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  List apps found in the IME logs:\n    ime-repair list\n\n\
                  Read logs from another directory:\n    ime-repair list --log-dir D:\\collected\\Logs\n\n\
                  Print JSON for scripting:\n    ime-repair list --json")]
pub struct ListArgs {
    /// Print discoveries as a JSON array
    #[arg(long)]
    pub json: bool,
}
