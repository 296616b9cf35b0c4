use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "framepress")]
#[command(author, version, about = "Frame-by-frame video recompressor")]
pub struct Cli {
    /// Input video file
    #[arg(required = true)]
    pub input: PathBuf,

    /// Output video file
    #[arg(required = true)]
    pub output: PathBuf,

    /// Per-frame quality level, 1 (best) to 31 (smallest)
    #[arg(short, long, default_value = "1")]
    pub level: u8,

    /// Path to config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_positional_paths_and_level() {
        let cli = Cli::parse_from(["framepress", "in.mp4", "out.mp4", "--level", "5"]);
        assert_eq!(cli.input, PathBuf::from("in.mp4"));
        assert_eq!(cli.output, PathBuf::from("out.mp4"));
        assert_eq!(cli.level, 5);
        assert!(cli.config.is_none());
    }

    #[test]
    fn level_defaults_to_best() {
        let cli = Cli::parse_from(["framepress", "in.mp4", "out.mp4"]);
        assert_eq!(cli.level, 1);
    }

    #[test]
    fn requires_both_paths() {
        assert!(Cli::try_parse_from(["framepress", "in.mp4"]).is_err());
    }
}
