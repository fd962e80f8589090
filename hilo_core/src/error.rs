use serde::{Deserialize, Serialize};

/// 状态转换失败的原因。任何错误都不会改变对局状态。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameError {
    /// 远端牌堆服务返回失败或网络请求出错
    ServiceUnavailable(String),
    /// 牌堆 ID 无效或已过期
    InvalidSession(String),
    /// 上一次猜测还没有结束
    GuessPending,
    /// 还没有开始一局
    NotStarted,
    /// 牌已抽完，只能重新开始
    GameFinished,
}

/// 发给客户端的错误类别
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ErrorKind {
    ServiceUnavailable,
    InvalidSession,
    GuessPending,
    NotStarted,
    GameFinished,
    MalformedMessage,
}

impl GameError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            GameError::ServiceUnavailable(_) => ErrorKind::ServiceUnavailable,
            GameError::InvalidSession(_) => ErrorKind::InvalidSession,
            GameError::GuessPending => ErrorKind::GuessPending,
            GameError::NotStarted => ErrorKind::NotStarted,
            GameError::GameFinished => ErrorKind::GameFinished,
        }
    }
}

impl std::error::Error for GameError {}

impl std::fmt::Display for GameError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GameError::ServiceUnavailable(reason) => {
                write!(f, "牌堆服务不可用: {}", reason)
            }
            GameError::InvalidSession(reason) => write!(f, "牌堆已失效: {}", reason),
            GameError::GuessPending => write!(f, "上一张牌还没有揭晓"),
            GameError::NotStarted => write!(f, "请先开始新的一局"),
            GameError::GameFinished => write!(f, "牌已抽完，请重新开始"),
        }
    }
}
