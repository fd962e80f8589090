use crate::error::GameError;
use crate::state::{Deal, DeckId};
use std::future::Future;

/// 远端牌堆服务
///
/// 洗牌和保存牌堆都由服务端完成，这里只消费"开新牌堆"和"抽一张"两个操作。
pub trait DeckService: Send + Sync + 'static {
    /// 分配一副洗好的 52 张新牌，并立即发出第一张
    fn new_deck(&self) -> impl Future<Output = Result<Deal, GameError>> + Send;

    /// 从指定牌堆抽下一张牌；牌堆 ID 无效时返回 `GameError::InvalidSession`
    fn draw_card(&self, deck_id: &DeckId) -> impl Future<Output = Result<Deal, GameError>> + Send;
}
