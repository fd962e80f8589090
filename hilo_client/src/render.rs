use crossterm::style::{StyledContent, Stylize};
use hilo_core::{Card, CardCode, CardSlot, GamePhase, GameSession, HiLo, HistoryRecord, ServerMessage};

/// 还没有发牌时显示的牌背图片
pub const CARD_BACK_IMAGE: &str = "https://opengameart.org/sites/default/files/card%20back%20black.png";

// 红色花色用红字显示，黑色花色保持终端默认颜色
fn suit_colored(label: String, red: bool) -> StyledContent<String> {
    if red { label.red().bold() } else { label.bold() }
}

pub fn card_label(card: &Card) -> StyledContent<String> {
    suit_colored(card.to_string(), card.suit.is_red())
}

pub fn code_label(code: &CardCode) -> StyledContent<String> {
    suit_colored(code.to_string(), code.suit().is_some_and(|s| s.is_red()))
}

fn slot_label(slot: &CardSlot) -> String {
    match slot {
        CardSlot::Empty => "[??]".to_string(),
        CardSlot::Dealt(card) => card_label(card).to_string(),
    }
}

// 牌面图片的地址；本轮还没有牌时用牌背
fn image_line(label: &str, slot: &CardSlot, fallback: Option<&str>) -> Option<String> {
    let image = match slot {
        CardSlot::Dealt(card) if !card.image.is_empty() => card.image.as_str(),
        CardSlot::Dealt(_) => return None,
        CardSlot::Empty => fallback?,
    };
    Some(format!("  {}图片: {}", label, image))
}

/// 一条记录：`本轮牌 >/< 上一张牌 结果`
pub fn history_line(record: &HistoryRecord) -> String {
    let arrow = match record.outcome {
        HiLo::Higher => ">",
        HiLo::Lower => "<",
    };
    let point = if record.was_correct { "🟢" } else { "🔴" };
    format!("{} {} {} {}", code_label(&record.current), arrow, code_label(&record.previous), point)
}

/// 整张牌桌
pub fn render_session(session: &GameSession) -> String {
    let mut lines = vec![
        "LOWER or HIGHER".bold().to_string(),
        format!("Points 🟢: {}   Cards left 🃏: {}", session.score, session.remaining),
        format!("上一张: {}   本轮: {}", slot_label(&session.previous), slot_label(&session.current)),
    ];
    lines.extend(image_line("上一张", &session.previous, None));
    lines.extend(image_line("本轮", &session.current, Some(CARD_BACK_IMAGE)));

    match session.phase {
        GamePhase::Empty => lines.push("正在发牌...".to_string()),
        GamePhase::Ready => {
            lines.push("Will the next card be higher or lower?  (h)igher / (l)ower".to_string())
        }
        GamePhase::AwaitingReveal => lines.push("揭晓中...".to_string()),
        GamePhase::Finished => {
            lines.push("Game Over".bold().to_string());
            lines.push(format!("Your score: {}", session.score));
        }
    }

    if !session.history.is_empty() {
        lines.push("History:".to_string());
        lines.extend(session.history.iter().map(|r| format!("  {}", history_line(r))));
    }
    lines.join("\n")
}

pub fn render_message(msg: &ServerMessage) -> String {
    match msg {
        ServerMessage::SessionSnapshot(session) => render_session(session),
        ServerMessage::RoundResolved { record, drawn } => {
            let verdict = if record.was_correct { "猜对了 🟢" } else { "猜错了 🔴" };
            let outcome = match record.outcome {
                HiLo::Higher => "higher",
                HiLo::Lower => "lower",
            };
            let mut text = format!("抽到 {}：{}，{}", card_label(drawn), outcome, verdict);
            if !drawn.image.is_empty() {
                text.push_str(&format!("\n  图片: {}", drawn.image));
            }
            text
        }
        ServerMessage::Error { message, .. } => format!("错误: {}", message),
    }
}
