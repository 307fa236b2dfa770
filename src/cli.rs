//! Command-line interface definitions for the G1 news report run.
//!
//! The search criteria themselves come from the JSON work-items document;
//! the CLI only locates that document and controls where output lands and
//! how the browser is launched.

use clap::Parser;
use std::path::PathBuf;

/// Command-line arguments for one report run.
///
/// # Examples
///
/// ```sh
/// # Default locations
/// g1_news_report
///
/// # Custom work items, visible browser window
/// g1_news_report -w ./devdata/work-items.json --headless false
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Path to the JSON work-items document with the search criteria
    #[arg(short, long, default_value = "devdata/work-items.json")]
    pub work_items: PathBuf,

    /// Output directory for the report and downloaded photos
    #[arg(short, long, default_value = "output")]
    pub output_dir: PathBuf,

    /// Browser binary to launch, skipping detection/installation
    #[arg(long, env = "G1_BROWSER_PATH")]
    pub browser_path: Option<PathBuf>,

    /// Run the browser without a visible window
    #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
    pub headless: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::parse_from(["g1_news_report"]);
        assert_eq!(cli.work_items, PathBuf::from("devdata/work-items.json"));
        assert_eq!(cli.output_dir, PathBuf::from("output"));
        assert_eq!(cli.browser_path, None);
        assert!(cli.headless);
    }

    #[test]
    fn test_cli_overrides() {
        let cli = Cli::parse_from([
            "g1_news_report",
            "-w",
            "/tmp/items.json",
            "-o",
            "/tmp/out",
            "--browser-path",
            "/usr/bin/chromium",
            "--headless",
            "false",
        ]);
        assert_eq!(cli.work_items, PathBuf::from("/tmp/items.json"));
        assert_eq!(cli.output_dir, PathBuf::from("/tmp/out"));
        assert_eq!(cli.browser_path, Some(PathBuf::from("/usr/bin/chromium")));
        assert!(!cli.headless);
    }
}
