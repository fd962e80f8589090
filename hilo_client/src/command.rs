use hilo_core::{ClientMessage, HiLo};

/// 一行输入对应的动作
#[derive(Debug, PartialEq, Eq)]
pub enum Command {
    Send(ClientMessage),
    Help,
    Exit,
    Empty,
    Unknown(String),
}

pub fn parse_command(line: &str) -> Command {
    let line = line.trim();
    match line.to_ascii_lowercase().as_str() {
        "" => Command::Empty,
        "h" | "higher" => Command::Send(HiLo::Higher.into()),
        "l" | "lower" => Command::Send(HiLo::Lower.into()),
        "r" | "restart" => Command::Send(ClientMessage::Restart),
        "?" | "help" => Command::Help,
        "q" | "exit" => Command::Exit,
        _ => Command::Unknown(line.to_string()),
    }
}

pub const HELP: &str = "\
可用命令:
  h, higher      - 猜下一张牌更大
  l, lower       - 猜下一张牌更小
  r, restart     - 换一副新牌重新开始
  ?, help        - 显示帮助
  q, exit        - 退出";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guess_commands() {
        assert_eq!(parse_command("h"), Command::Send(ClientMessage::Guess(HiLo::Higher)));
        assert_eq!(parse_command("  LOWER \n"), Command::Send(ClientMessage::Guess(HiLo::Lower)));
    }

    #[test]
    fn test_other_commands() {
        assert_eq!(parse_command("restart"), Command::Send(ClientMessage::Restart));
        assert_eq!(parse_command("q"), Command::Exit);
        assert_eq!(parse_command(""), Command::Empty);
        assert_eq!(parse_command("fold"), Command::Unknown("fold".to_string()));
    }
}
