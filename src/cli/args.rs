//! Command-line argument parsing for threadpeek.
//!
//! This module handles parsing command-line arguments and determining
//! which CLI command to execute.

use std::path::PathBuf;

/// Parsed CLI command to execute.
#[derive(Debug, Clone, PartialEq)]
pub enum CliCommand {
    /// Fetch a day's entry, compose and resolve it, and print the preview
    Preview { day: u32 },
    /// Compose an entry read from a local JSON file, without network access
    Compose { path: PathBuf },
    /// Publish a single text post
    Post { text: String },
    /// Show version information
    Version,
    /// Show usage
    Help,
    /// Arguments could not be understood
    Invalid(String),
}

pub const USAGE: &str = "\
Usage:
  threadpeek <day>               Preview the thread for a day (1-31)
  threadpeek preview <day>       Same as above
  threadpeek compose <file.json> Compose a local entry file without fetching images
  threadpeek post <text...>      Publish a single text post
  threadpeek --version | -V
  threadpeek --help | -h";

/// Parse command-line arguments and return the appropriate command.
///
/// # Arguments
///
/// * `args` - Iterator of command-line arguments (typically `std::env::args()`)
///
/// # Examples
///
/// ```
/// use threadpeek::cli::args::{parse_args, CliCommand};
///
/// let args = vec!["threadpeek".to_string(), "12".to_string()];
/// assert_eq!(parse_args(args.into_iter()), CliCommand::Preview { day: 12 });
/// ```
pub fn parse_args<I>(args: I) -> CliCommand
where
    I: Iterator<Item = String>,
{
    // Skip the program name
    let args: Vec<String> = args.skip(1).collect();

    if args.iter().any(|a| a == "--version" || a == "-V") {
        return CliCommand::Version;
    }
    if args.iter().any(|a| a == "--help" || a == "-h") {
        return CliCommand::Help;
    }

    let Some((first, rest)) = args.split_first() else {
        return CliCommand::Help;
    };

    match first.as_str() {
        "preview" => match rest {
            [day] => parse_day(day),
            _ => CliCommand::Invalid("preview takes exactly one day".to_string()),
        },
        "compose" => match rest {
            [path] => CliCommand::Compose {
                path: PathBuf::from(path),
            },
            _ => CliCommand::Invalid("compose takes exactly one file".to_string()),
        },
        "post" => {
            let text = rest.join(" ");
            if text.trim().is_empty() {
                CliCommand::Invalid("post needs some text".to_string())
            } else {
                CliCommand::Post { text }
            }
        }
        day if rest.is_empty() => parse_day(day),
        other => CliCommand::Invalid(format!("unknown command: {}", other)),
    }
}

fn parse_day(raw: &str) -> CliCommand {
    match raw.trim().parse::<u32>() {
        Ok(day) => CliCommand::Preview { day },
        Err(_) => CliCommand::Invalid(format!("not a day number: {}", raw)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> CliCommand {
        let mut all = vec!["threadpeek".to_string()];
        all.extend(args.iter().map(|s| s.to_string()));
        parse_args(all.into_iter())
    }

    #[test]
    fn test_parse_version_flag() {
        assert_eq!(parse(&["--version"]), CliCommand::Version);
        assert_eq!(parse(&["-V"]), CliCommand::Version);
        assert_eq!(parse(&["preview", "3", "-V"]), CliCommand::Version);
    }

    #[test]
    fn test_parse_help() {
        assert_eq!(parse(&[]), CliCommand::Help);
        assert_eq!(parse(&["-h"]), CliCommand::Help);
        assert_eq!(parse(&["post", "--help"]), CliCommand::Help);
    }

    #[test]
    fn test_parse_bare_day() {
        assert_eq!(parse(&["12"]), CliCommand::Preview { day: 12 });
    }

    #[test]
    fn test_parse_preview_day() {
        assert_eq!(parse(&["preview", "31"]), CliCommand::Preview { day: 31 });
    }

    #[test]
    fn test_out_of_range_day_is_left_to_the_fetch() {
        assert_eq!(parse(&["40"]), CliCommand::Preview { day: 40 });
        assert_eq!(parse(&["0"]), CliCommand::Preview { day: 0 });
    }

    #[test]
    fn test_parse_non_numeric_day() {
        assert!(matches!(parse(&["preview", "tomorrow"]), CliCommand::Invalid(_)));
        assert!(matches!(parse(&["-3"]), CliCommand::Invalid(_)));
    }

    #[test]
    fn test_parse_compose() {
        assert_eq!(
            parse(&["compose", "day.json"]),
            CliCommand::Compose {
                path: PathBuf::from("day.json")
            }
        );
        assert!(matches!(parse(&["compose"]), CliCommand::Invalid(_)));
    }

    #[test]
    fn test_parse_post_joins_words() {
        assert_eq!(
            parse(&["post", "hello", "world"]),
            CliCommand::Post {
                text: "hello world".to_string()
            }
        );
        assert!(matches!(parse(&["post"]), CliCommand::Invalid(_)));
    }

    #[test]
    fn test_parse_unknown_command() {
        assert_eq!(
            parse(&["publish", "x"]),
            CliCommand::Invalid("unknown command: publish".to_string())
        );
    }
}
