use crate::card::{Card, CardCode, CardSlot};
use serde::{Deserialize, Serialize};

/// 远端牌堆服务分配的牌堆 ID
pub type DeckId = String;

/// 高或低：既是玩家的猜测，也是一轮的客观结果。没有"相等"。
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum HiLo {
    Higher,
    Lower,
}

pub type Guess = HiLo;
pub type RoundOutcome = HiLo;

/// 一轮的记录，写入后不再修改
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HistoryRecord {
    pub previous: CardCode,
    pub current: CardCode,
    pub outcome: RoundOutcome,
    pub was_correct: bool,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum GamePhase {
    /// 还没有牌堆
    #[default]
    Empty,
    /// 上一张牌已就位，等待玩家猜测
    Ready,
    /// 已提交猜测：正在抽牌，或已揭晓、等待进入下一轮
    AwaitingReveal,
    /// 牌已抽完，分数不再变化，只接受重新开始
    Finished,
}

/// 一局游戏的全部状态
///
/// 所有修改都通过 `logic` 中的方法完成。需要等待网络的操作被拆成两步：
/// 先领取票据 (ticket)，拿到网络结果后再凭票据提交；
/// 票据的代数 (generation) 落后于当前代数时，结果会被丢弃。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct GameSession {
    pub deck_id: Option<DeckId>,
    pub remaining: u32,
    pub score: u32,
    /// 上一张牌，本轮比较的基准
    pub previous: CardSlot,
    /// 本轮抽到的牌，揭晓前为空
    pub current: CardSlot,
    /// 最新的记录在最前面
    pub history: Vec<HistoryRecord>,
    pub phase: GamePhase,
    /// 最近一次成功重开的代数
    pub generation: u64,

    // 服务端内部使用，不发给客户端
    #[serde(skip)]
    pub(crate) issued_generation: u64,
    #[serde(skip)]
    pub(crate) pending_guess: Option<Guess>,
}

/// 远端服务一次发牌的结果：新牌堆或继续抽牌都返回这个
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deal {
    pub deck_id: DeckId,
    pub card: Card,
    pub remaining: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RestartTicket {
    pub generation: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrawTicket {
    pub generation: u64,
    pub round: usize,
    pub deck_id: DeckId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RevealTicket {
    pub generation: u64,
    pub round: usize,
}

impl GameSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// 本局是否还能继续猜
    pub fn can_guess(&self) -> bool {
        self.phase == GamePhase::Ready && self.remaining > 0
    }

    pub fn is_finished(&self) -> bool {
        self.phase == GamePhase::Finished
    }

    pub fn pending_guess(&self) -> Option<Guess> {
        self.pending_guess
    }
}
