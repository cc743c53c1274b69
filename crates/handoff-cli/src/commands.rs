//! Interactive commands read from stdin.

use std::str::FromStr;

pub const HELP: &str = "\
commands:
  start  (s)  allocate a buffer and hand it to the worker
  toggle (t)  switch between copy and transfer mode
  status      show run state and transfer mode
  log         print the whole console
  help   (h)  show this help
  quit   (q)  exit";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Start,
    Toggle,
    Status,
    Log,
    Help,
    Quit,
}

impl FromStr for Command {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "start" | "s" => Ok(Self::Start),
            "toggle" | "t" => Ok(Self::Toggle),
            "status" => Ok(Self::Status),
            "log" => Ok(Self::Log),
            "help" | "h" | "?" => Ok(Self::Help),
            "quit" | "q" | "exit" => Ok(Self::Quit),
            other => Err(format!("unknown command: {other} (try `help`)")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("start", Command::Start)]
    #[case("s", Command::Start)]
    #[case("  Toggle ", Command::Toggle)]
    #[case("status", Command::Status)]
    #[case("log", Command::Log)]
    #[case("?", Command::Help)]
    #[case("exit", Command::Quit)]
    fn parses_commands(#[case] input: &str, #[case] expected: Command) {
        assert_eq!(input.parse::<Command>().unwrap(), expected);
    }

    #[test]
    fn unknown_command_mentions_help() {
        let err = "launch".parse::<Command>().unwrap_err();
        assert!(err.contains("launch"));
        assert!(err.contains("help"));
    }
}
