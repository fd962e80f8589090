use crate::card::{Card, CardSlot};
use crate::error::GameError;
use crate::state::*;
use std::cmp::Ordering;

// --- 判定一轮结果 ---

/// 一轮的判定结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub outcome: RoundOutcome,
    pub was_correct: bool,
    pub score_delta: u32,
    pub record: HistoryRecord,
}

/// 抽到的牌相对上一张牌是高还是低
///
/// 先比点数；点数相同再比花色 (红心 < 方块 < 黑桃 < 梅花)。
/// 点数和花色都相同在一副牌里不可能出现，这种情况算作低。
pub fn compare_cards(previous: &Card, drawn: &Card) -> RoundOutcome {
    let by_rank = drawn.rank.position().cmp(&previous.rank.position());
    let ordering = match by_rank {
        Ordering::Equal => drawn.suit.position().cmp(&previous.suit.position()),
        other => other,
    };
    match ordering {
        Ordering::Greater => HiLo::Higher,
        Ordering::Less | Ordering::Equal => HiLo::Lower,
    }
}

/// 根据玩家的猜测结算一轮，纯函数
pub fn resolve_round(previous: &Card, drawn: &Card, guess: Guess) -> Resolution {
    let outcome = compare_cards(previous, drawn);
    let was_correct = outcome == guess;
    Resolution {
        outcome,
        was_correct,
        score_delta: if was_correct { 1 } else { 0 },
        record: HistoryRecord {
            previous: previous.code.clone(),
            current: drawn.code.clone(),
            outcome,
            was_correct,
        },
    }
}

/// 上一张牌还不存在时没有可比较的对象，返回 None
pub fn resolve_against(previous: &CardSlot, drawn: &Card, guess: Guess) -> Option<Resolution> {
    previous.card().map(|prev| resolve_round(prev, drawn, guess))
}

// --- 对局状态转换 ---

/// 提交网络结果后的处理情况
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Applied<T> {
    Done(T),
    /// 票据已过期 (期间发生过重开)，结果被丢弃
    Stale,
}

impl GameSession {
    /// 申请重开。不改变可见状态，任何阶段都可以调用。
    pub fn begin_restart(&mut self) -> RestartTicket {
        self.issued_generation = self.issued_generation.max(self.generation) + 1;
        RestartTicket { generation: self.issued_generation }
    }

    /// 拿到新牌堆后完成重开
    ///
    /// 分数清零、记录清空、第一张牌成为上一张牌，一步完成。
    /// 失败时状态不变，错误原样返回；比当前代数旧的票据被丢弃。
    pub fn complete_restart(
        &mut self,
        ticket: RestartTicket,
        result: Result<Deal, GameError>,
    ) -> Result<Applied<()>, GameError> {
        if ticket.generation <= self.generation {
            return Ok(Applied::Stale);
        }
        let deal = result?;

        self.generation = ticket.generation;
        self.deck_id = Some(deal.deck_id);
        self.remaining = deal.remaining;
        self.score = 0;
        self.history.clear();
        self.previous = CardSlot::Dealt(deal.card);
        self.current = CardSlot::Empty;
        self.pending_guess = None;
        self.phase = if self.remaining > 0 { GamePhase::Ready } else { GamePhase::Finished };
        Ok(Applied::Done(()))
    }

    /// 玩家提交猜测，进入等待揭晓阶段，返回抽牌票据
    pub fn submit_guess(&mut self, guess: Guess) -> Result<DrawTicket, GameError> {
        match self.phase {
            GamePhase::Empty => return Err(GameError::NotStarted),
            GamePhase::AwaitingReveal => return Err(GameError::GuessPending),
            GamePhase::Finished => return Err(GameError::GameFinished),
            GamePhase::Ready => {}
        }
        if self.remaining == 0 {
            return Err(GameError::GameFinished);
        }
        if self.previous.is_empty() {
            return Err(GameError::NotStarted);
        }
        let deck_id = self.deck_id.clone().ok_or(GameError::NotStarted)?;

        self.phase = GamePhase::AwaitingReveal;
        self.pending_guess = Some(guess);
        Ok(DrawTicket { generation: self.generation, round: self.history.len(), deck_id })
    }

    /// 抽牌结果返回后结算本轮
    ///
    /// 成功时更新分数、记录和剩余张数，抽到的牌放在 `current` 上，阶段保持不变，
    /// 等 `advance` 进入下一轮。失败时回到 `Ready`，其余不变。
    pub fn complete_draw(
        &mut self,
        ticket: &DrawTicket,
        result: Result<Deal, GameError>,
    ) -> Result<Applied<(Resolution, RevealTicket)>, GameError> {
        if !self.draw_in_flight(ticket) {
            return Ok(Applied::Stale);
        }
        let Some(guess) = self.pending_guess else {
            // 没有待结算的猜测，放弃本次抽牌，回到 Ready 以免卡住
            self.phase = GamePhase::Ready;
            return Ok(Applied::Stale);
        };

        let deal = match result {
            Ok(deal) => deal,
            Err(err) => {
                self.phase = GamePhase::Ready;
                self.pending_guess = None;
                return Err(err);
            }
        };

        // submit_guess 已保证上一张牌存在
        let Some(resolution) = resolve_against(&self.previous, &deal.card, guess) else {
            self.phase = GamePhase::Ready;
            self.pending_guess = None;
            return Ok(Applied::Stale);
        };
        self.score += resolution.score_delta;
        self.history.insert(0, resolution.record.clone());
        self.remaining = deal.remaining;
        self.current = CardSlot::Dealt(deal.card);
        self.pending_guess = None;

        let reveal = RevealTicket { generation: self.generation, round: ticket.round };
        Ok(Applied::Done((resolution, reveal)))
    }

    /// 揭晓结束：抽到的牌成为上一张牌，进入下一轮或结束
    pub fn advance(&mut self, ticket: RevealTicket) -> Applied<GamePhase> {
        let current_round = self.history.len().checked_sub(1);
        if ticket.generation != self.generation
            || self.phase != GamePhase::AwaitingReveal
            || self.current.is_empty()
            || current_round != Some(ticket.round)
        {
            return Applied::Stale;
        }

        self.previous = std::mem::take(&mut self.current);
        self.phase = if self.remaining > 0 { GamePhase::Ready } else { GamePhase::Finished };
        Applied::Done(self.phase)
    }

    fn draw_in_flight(&self, ticket: &DrawTicket) -> bool {
        ticket.generation == self.generation
            && self.phase == GamePhase::AwaitingReveal
            && self.current.is_empty()
            && self.history.len() == ticket.round
            && self.deck_id.as_deref() == Some(ticket.deck_id.as_str())
    }
}

// --- 单元测试 ---
