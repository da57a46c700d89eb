/// Actions the logic thread understands, produced from stdin lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameAction {
    Click,
    Restart,
    /// Submit the final score under the given name.
    Submit(String),
    Quit,
}

impl GameAction {
    /// Parses one input line. Unknown commands yield `None`.
    ///
    /// An empty line or `c` clicks, `r` restarts, `q` quits and
    /// `s NAME` submits.
    pub fn parse(line: &str) -> Option<Self> {
        let line = line.trim();
        let (command, rest) = match line.split_once(char::is_whitespace) {
            Some((command, rest)) => (command, rest.trim()),
            None => (line, ""),
        };

        match command.to_ascii_lowercase().as_str() {
            "" | "c" | "click" => Some(Self::Click),
            "r" | "restart" => Some(Self::Restart),
            "q" | "quit" | "exit" => Some(Self::Quit),
            "s" | "submit" => Some(Self::Submit(rest.to_string())),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_commands() {
        assert_eq!(GameAction::parse(""), Some(GameAction::Click));
        assert_eq!(GameAction::parse("  c "), Some(GameAction::Click));
        assert_eq!(GameAction::parse("R"), Some(GameAction::Restart));
        assert_eq!(GameAction::parse("q"), Some(GameAction::Quit));
        assert_eq!(
            GameAction::parse("s  ace pilot "),
            Some(GameAction::Submit("ace pilot".into()))
        );
        assert_eq!(GameAction::parse("s"), Some(GameAction::Submit(String::new())));
        assert_eq!(GameAction::parse("jump"), None);
    }
}
