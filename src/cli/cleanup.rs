use clap::Parser;

/// Arguments for the cleanup command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Show what would be removed for an app:\n    ime-repair cleanup 3f2a9c1e-0b7d-4e55-9a61-2c8f0d4b7e13\n\n\
                  Remove it and restart the IME service:\n    ime-repair cleanup 3f2a9c1e-0b7d-4e55-9a61-2c8f0d4b7e13 --live\n\n\
                  Process several apps in one run:\n    ime-repair cleanup <APP_ID> <APP_ID> --live")]
pub struct CleanupArgs {
    /// App identifiers (GUIDs) to clean up
    #[arg(value_name = "APP_ID", required = true)]
    pub app_ids: Vec<String>,

    /// Delete for real (requires Administrator). Without it nothing is changed.
    #[arg(long)]
    pub live: bool,
}
