use std::sync::Arc;
use std::time::Duration;

use hilo_core::{
    Applied, ClientMessage, Deal, DeckService, DrawTicket, ErrorKind, GameError, GamePhase, GameSession,
    Guess, RestartTicket, RevealTicket, ServerMessage,
};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// 后台任务完成后送回事件循环的结果，都带着领取时的票据
enum Event {
    Restarted(RestartTicket, Result<Deal, GameError>),
    Drawn(DrawTicket, Result<Deal, GameError>),
    Revealed(RevealTicket),
}

/// 一个连接对应的一局游戏
///
/// 对局状态只在 `run` 的事件循环里修改。网络请求和揭晓延时放在单独的任务里，
/// 完成后通过通道把结果送回来，所以抽牌期间仍然可以处理重开。
pub struct SessionHost<D> {
    deck: Arc<D>,
    reveal_delay: Duration,
    session: GameSession,
    outbound: mpsc::Sender<ServerMessage>,
    events_tx: mpsc::Sender<Event>,
    events_rx: mpsc::Receiver<Event>,
}

impl<D: DeckService> SessionHost<D> {
    pub fn new(deck: Arc<D>, reveal_delay: Duration, outbound: mpsc::Sender<ServerMessage>) -> Self {
        let (events_tx, events_rx) = mpsc::channel(16);
        SessionHost {
            deck,
            reveal_delay,
            session: GameSession::new(),
            outbound,
            events_tx,
            events_rx,
        }
    }

    /// 事件循环，客户端消息通道关闭后退出
    /// 一开始就发一次快照并申请第一副牌。
    pub async fn run(mut self, mut inbound: mpsc::Receiver<ClientMessage>) {
        self.send_snapshot().await;
        self.restart();

        loop {
            tokio::select! {
                msg = inbound.recv() => match msg {
                    Some(msg) => self.handle_client_message(msg).await,
                    None => break,
                },
                Some(event) = self.events_rx.recv() => self.handle_event(event).await,
            }
        }
        debug!("对局结束，最终得分 {}", self.session.score);
    }

    async fn handle_client_message(&mut self, msg: ClientMessage) {
        match msg {
            ClientMessage::Restart => self.restart(),
            ClientMessage::Guess(guess) => self.guess(guess).await,
        }
    }

    fn restart(&mut self) {
        let ticket = self.session.begin_restart();
        let deck = self.deck.clone();
        let events = self.events_tx.clone();
        tokio::spawn(async move {
            let result = deck.new_deck().await;
            let _ = events.send(Event::Restarted(ticket, result)).await;
        });
    }

    async fn guess(&mut self, guess: Guess) {
        let ticket = match self.session.submit_guess(guess) {
            Ok(ticket) => ticket,
            Err(err) => {
                self.send_error(&err).await;
                return;
            }
        };
        self.send_snapshot().await;

        let deck = self.deck.clone();
        let events = self.events_tx.clone();
        tokio::spawn(async move {
            let result = deck.draw_card(&ticket.deck_id).await;
            let _ = events.send(Event::Drawn(ticket, result)).await;
        });
    }

    async fn handle_event(&mut self, event: Event) {
        match event {
            Event::Restarted(ticket, result) => match self.session.complete_restart(ticket, result) {
                Ok(Applied::Done(())) => {
                    info!(
                        "新牌堆 {}，剩余 {} 张",
                        self.session.deck_id.as_deref().unwrap_or_default(),
                        self.session.remaining
                    );
                    self.send_snapshot().await;
                }
                Ok(Applied::Stale) => debug!("丢弃过期的新牌堆 (第 {} 代)", ticket.generation),
                Err(err) => {
                    warn!("开新牌堆失败: {}", err);
                    self.send_error(&err).await;
                }
            },
            Event::Drawn(ticket, result) => match self.session.complete_draw(&ticket, result) {
                Ok(Applied::Done((resolution, reveal))) => {
                    if let Some(drawn) = self.session.current.card().cloned() {
                        let msg = ServerMessage::RoundResolved { record: resolution.record, drawn };
                        let _ = self.outbound.send(msg).await;
                    }
                    self.send_snapshot().await;
                    self.schedule_reveal(reveal);
                }
                Ok(Applied::Stale) => debug!("丢弃过期的抽牌结果 (第 {} 代)", ticket.generation),
                Err(err) => {
                    warn!("抽牌失败: {}", err);
                    self.send_error(&err).await;
                    self.send_snapshot().await;
                }
            },
            Event::Revealed(ticket) => match self.session.advance(ticket) {
                Applied::Done(phase) => {
                    if phase == GamePhase::Finished {
                        info!("牌已抽完，得分 {}", self.session.score);
                    }
                    self.send_snapshot().await;
                }
                Applied::Stale => debug!("丢弃过期的揭晓 (第 {} 代)", ticket.generation),
            },
        }
    }

    fn schedule_reveal(&self, ticket: RevealTicket) {
        let delay = self.reveal_delay;
        let events = self.events_tx.clone();
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = events.send(Event::Revealed(ticket)).await;
        });
    }

    async fn send_snapshot(&self) {
        let _ = self.outbound.send(ServerMessage::SessionSnapshot(self.session.clone())).await;
    }

    async fn send_error(&self, err: &GameError) {
        let msg = ServerMessage::Error { kind: err.kind(), message: err.to_string() };
        let _ = self.outbound.send(msg).await;
    }
}

/// 无法解析的客户端消息，不经过事件循环直接回复
pub fn malformed_message(reason: impl std::fmt::Display) -> ServerMessage {
    ServerMessage::Error { kind: ErrorKind::MalformedMessage, message: format!("无法解析的消息: {}", reason) }
}
