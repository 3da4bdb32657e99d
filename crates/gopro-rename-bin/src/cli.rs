use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "gopro-rename")]
#[command(version)]
#[command(about = "Rename GoPro video chapters so they sort by recording session")]
#[command(long_about = "GoPro cameras name the chapters of one recording GH010527.MP4, GH020527.MP4, ... so a \
listing sorted by name interleaves unrelated sessions. This tool prefixes each file with its session and \
chapter number (052701-GH010527.MP4) and can strip the prefix again.")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(short, long, global = true, help = "Log every directory and ignored file")]
    pub verbose: bool,

    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Prefix GoPro file names with their session and chapter number")]
    Rename {
        #[arg(env = "GOPRO_RENAME_ROOT", help = "Root directory (defaults to current directory)")]
        target: Option<PathBuf>,

        #[arg(short = 'n', long, help = "Do not descend into subdirectories")]
        no_recursive: bool,

        #[arg(long, help = "Perform a dry run without renaming any file")]
        dry_run: bool,

        #[arg(short, long, help = "Interactive mode - prompt for each rename")]
        interactive: bool,
    },

    #[command(about = "Strip the session and chapter prefix added by `rename`")]
    Revert {
        #[arg(env = "GOPRO_RENAME_ROOT", help = "Root directory (defaults to current directory)")]
        target: Option<PathBuf>,

        #[arg(short = 'n', long, help = "Do not descend into subdirectories")]
        no_recursive: bool,

        #[arg(long, help = "Perform a dry run without renaming any file")]
        dry_run: bool,

        #[arg(short, long, help = "Interactive mode - prompt for each rename")]
        interactive: bool,
    },
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_rename_command() {
        let args = vec!["gopro-rename", "rename", "/videos", "--dry-run", "-n"];

        let cli = Cli::try_parse_from(args).unwrap();

        match cli.command {
            Commands::Rename { target, no_recursive, dry_run, interactive } => {
                assert_eq!(target, Some(PathBuf::from("/videos")));
                assert!(no_recursive);
                assert!(dry_run);
                assert!(!interactive);
            }
            _ => panic!("Expected Rename command"),
        }
    }

    #[test]
    fn test_revert_command() {
        let args = vec!["gopro-rename", "--verbose", "revert", "/videos", "--interactive"];

        let cli = Cli::try_parse_from(args).unwrap();

        assert!(cli.verbose);
        match cli.command {
            Commands::Revert { target, no_recursive, dry_run, interactive } => {
                assert_eq!(target, Some(PathBuf::from("/videos")));
                assert!(!no_recursive);
                assert!(!dry_run);
                assert!(interactive);
            }
            _ => panic!("Expected Revert command"),
        }
    }

    #[test]
    fn test_verbose_conflicts_with_quiet() {
        let args = vec!["gopro-rename", "-v", "-q", "rename", "/videos"];

        assert!(Cli::try_parse_from(args).is_err());
    }

    #[test]
    fn test_command_required() {
        assert!(Cli::try_parse_from(vec!["gopro-rename"]).is_err());
    }
}
