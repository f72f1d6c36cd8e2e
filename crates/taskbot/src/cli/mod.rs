use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to the config file holding the gateway token
    ///
    /// Defaults to TASKBOT_CONFIG_PATH or the platform config directory.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Path to the task store file
    ///
    /// Defaults to TASKBOT_STORE_PATH or the platform config directory.
    #[arg(long, value_name = "PATH")]
    pub store: Option<PathBuf>,

    /// Chat id the console session is attributed to
    #[arg(long, default_value_t = 1)]
    pub chat_id: i64,
}
