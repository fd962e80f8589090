use crate::card::Card;
use crate::error::ErrorKind;
use crate::state::{GameSession, Guess, HistoryRecord};
use serde::{Deserialize, Serialize};

// --- 客户端 -> 服务器 的消息 ---

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub enum ClientMessage {
    /// 猜下一张牌比当前牌高还是低
    Guess(Guess),
    /// 重新开始：换一副新牌，分数和记录清零
    Restart,
}

// --- 服务器 -> 客户端 的消息 ---

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub enum ServerMessage {
    /// 完整对局状态的快照，每次状态变化后发送
    SessionSnapshot(GameSession),

    /// 本轮已揭晓，在揭晓延时开始前发送
    RoundResolved {
        record: HistoryRecord,
        drawn: Card,
    },

    Error { kind: ErrorKind, message: String },
}

impl From<Guess> for ClientMessage {
    fn from(guess: Guess) -> Self {
        ClientMessage::Guess(guess)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::HiLo;

    #[test]
    fn test_client_message_wire_format() {
        let json = serde_json::to_string(&ClientMessage::Guess(HiLo::Higher)).unwrap();
        assert_eq!(json, r#"{"Guess":"higher"}"#);
        let json = serde_json::to_string(&ClientMessage::Restart).unwrap();
        assert_eq!(json, r#""Restart""#);
    }

    #[test]
    fn test_snapshot_hides_internal_fields() {
        let mut session = GameSession::new();
        session.begin_restart();
        let json = serde_json::to_value(ServerMessage::SessionSnapshot(session)).unwrap();
        let snapshot = &json["SessionSnapshot"];
        assert_eq!(snapshot["phase"], "Empty");
        assert!(snapshot.get("deck_id").is_some());
        assert!(snapshot.get("generation").is_some());
        assert!(snapshot.get("issued_generation").is_none());
        assert!(snapshot.get("pending_guess").is_none());
    }
}
