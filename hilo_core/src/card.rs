use serde::{Deserialize, Serialize};
use std::fmt;

// --- 核心数据结构定义 ---

/// 花色 (Suit)
/// 变体顺序即比大小时的顺序：红心 < 方块 < 黑桃 < 梅花。
/// 只在点数相同时用来决胜负。
/// deckofcardsapi 返回全大写的花色名，同时兼容首字母大写的写法。
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy, Serialize, Deserialize)]
#[repr(u8)]
pub enum Suit {
    #[serde(rename = "HEARTS", alias = "Hearts")]
    Hearts = 0, // 红心 ♥
    #[serde(rename = "DIAMONDS", alias = "Diamonds")]
    Diamonds = 1, // 方块 ♦
    #[serde(rename = "SPADES", alias = "Spades")]
    Spades = 2, // 黑桃 ♠
    #[serde(rename = "CLUBS", alias = "Clubs")]
    Clubs = 3, // 梅花 ♣
}

/// 点数 (Rank)
/// 从 2 到 A 递增，A 最大。序列化格式与 deckofcardsapi 的 `value` 字段一致。
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy, Serialize, Deserialize)]
#[repr(u8)]
pub enum Rank {
    #[serde(rename = "2")]
    Two = 0,
    #[serde(rename = "3")]
    Three,
    #[serde(rename = "4")]
    Four,
    #[serde(rename = "5")]
    Five,
    #[serde(rename = "6")]
    Six,
    #[serde(rename = "7")]
    Seven,
    #[serde(rename = "8")]
    Eight,
    #[serde(rename = "9")]
    Nine,
    #[serde(rename = "10")]
    Ten,
    #[serde(rename = "JACK")]
    Jack,
    #[serde(rename = "QUEEN")]
    Queen,
    #[serde(rename = "KING")]
    King,
    #[serde(rename = "ACE")]
    Ace,
}

impl Rank {
    /// 在点数顺序中的位置，2 为 0，A 为 12
    pub fn position(self) -> u8 {
        self as u8
    }
}

impl Suit {
    /// 在花色顺序中的位置，红心为 0，梅花为 3
    pub fn position(self) -> u8 {
        self as u8
    }

    pub fn is_red(self) -> bool {
        matches!(self, Suit::Hearts | Suit::Diamonds)
    }

    /// 牌面代码第二个字符对应的花色，如 `"KH"` 中的 `H`
    pub fn from_code_letter(letter: char) -> Option<Suit> {
        match letter {
            'H' => Some(Suit::Hearts),
            'D' => Some(Suit::Diamonds),
            'S' => Some(Suit::Spades),
            'C' => Some(Suit::Clubs),
            _ => None,
        }
    }
}

/// 牌面代码，两个字符：点数 + 花色，例如 `"KH"`、`"0D"` (10 用 `0` 表示)
#[derive(Debug, PartialEq, Eq, Hash, Clone, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CardCode(String);

impl CardCode {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// 代码中的点数部分，`0` 还原为 `10`
    pub fn rank_label(&self) -> &str {
        match &self.0[..1] {
            "0" => "10",
            r => r,
        }
    }

    pub fn suit(&self) -> Option<Suit> {
        self.0.chars().nth(1).and_then(Suit::from_code_letter)
    }
}

impl TryFrom<String> for CardCode {
    type Error = String;

    fn try_from(code: String) -> Result<Self, Self::Error> {
        if code.len() == 2 && code.is_ascii() {
            Ok(CardCode(code))
        } else {
            Err(format!("无效的牌面代码: {:?}", code))
        }
    }
}

impl TryFrom<&str> for CardCode {
    type Error = String;

    fn try_from(code: &str) -> Result<Self, Self::Error> {
        CardCode::try_from(code.to_string())
    }
}

impl From<CardCode> for String {
    fn from(code: CardCode) -> Self {
        code.0
    }
}

/// 单张牌 (Card)，发出后不再改变
/// 字段名与 deckofcardsapi 的牌对象保持一致，可以直接反序列化。
#[derive(Debug, PartialEq, Eq, Hash, Clone, Serialize, Deserialize)]
pub struct Card {
    pub code: CardCode,
    #[serde(rename = "value")]
    pub rank: Rank,
    pub suit: Suit,
    /// 牌面图片地址，核心逻辑不解析
    #[serde(default)]
    pub image: String,
}

impl Card {
    pub fn new(code: CardCode, rank: Rank, suit: Suit, image: impl Into<String>) -> Card {
        Card { code, rank, suit, image: image.into() }
    }
}

/// 牌位：还没有牌，或者已经发了一张牌
#[derive(Debug, PartialEq, Eq, Clone, Default, Serialize, Deserialize)]
pub enum CardSlot {
    #[default]
    Empty,
    Dealt(Card),
}

impl CardSlot {
    pub fn card(&self) -> Option<&Card> {
        match self {
            CardSlot::Empty => None,
            CardSlot::Dealt(card) => Some(card),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, CardSlot::Empty)
    }
}

impl From<Card> for CardSlot {
    fn from(card: Card) -> Self {
        CardSlot::Dealt(card)
    }
}

// --- 实现辅助功能 ---

impl fmt::Display for Suit {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", match self {
            Suit::Hearts => "♥",
            Suit::Diamonds => "♦",
            Suit::Spades => "♠",
            Suit::Clubs => "♣",
        })
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", match self {
            Rank::Two => "2",
            Rank::Three => "3",
            Rank::Four => "4",
            Rank::Five => "5",
            Rank::Six => "6",
            Rank::Seven => "7",
            Rank::Eight => "8",
            Rank::Nine => "9",
            Rank::Ten => "10",
            Rank::Jack => "J",
            Rank::Queen => "Q",
            Rank::King => "K",
            Rank::Ace => "A",
        })
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}{}", self.rank, self.suit)
    }
}

impl fmt::Display for CardCode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.suit() {
            Some(suit) => write!(f, "{}{}", self.rank_label(), suit),
            None => write!(f, "{}", self.0),
        }
    }
}

// --- 单元测试 ---

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test]
    fn test_rank_positions_follow_order() {
        let ranks = [
            Rank::Two, Rank::Three, Rank::Four, Rank::Five, Rank::Six, Rank::Seven,
            Rank::Eight, Rank::Nine, Rank::Ten, Rank::Jack, Rank::Queen, Rank::King, Rank::Ace,
        ];
        for (i, rank) in ranks.iter().enumerate() {
            assert_eq!(rank.position() as usize, i);
        }
    }

    #[test]
    fn test_suit_positions_follow_order() {
        assert_eq!(Suit::Hearts.position(), 0);
        assert_eq!(Suit::Diamonds.position(), 1);
        assert_eq!(Suit::Spades.position(), 2);
        assert_eq!(Suit::Clubs.position(), 3);
    }

    #[test]
    fn test_deserialize_api_card() {
        let json = r#"{
            "code": "0H",
            "image": "https://deckofcardsapi.com/static/img/0H.png",
            "images": {"svg": "https://deckofcardsapi.com/static/img/0H.svg"},
            "value": "10",
            "suit": "HEARTS"
        }"#;
        let card: Card = serde_json::from_str(json).unwrap();
        assert_eq!(card.rank, Rank::Ten);
        assert_eq!(card.suit, Suit::Hearts);
        assert_eq!(card.code.as_str(), "0H");
        assert_eq!(card.to_string(), "10♥");
    }

    #[test]
    fn test_deserialize_title_case_suit() {
        let json = r#"{"code": "QC", "value": "QUEEN", "suit": "Clubs"}"#;
        let card: Card = serde_json::from_str(json).unwrap();
        assert_eq!(card.suit, Suit::Clubs);
        assert_eq!(card.image, "");
    }

    #[test]
    fn test_reject_bad_code() {
        let json = r#"{"code": "QCX", "value": "QUEEN", "suit": "CLUBS"}"#;
        assert!(serde_json::from_str::<Card>(json).is_err());
    }

    #[test_case("0D" => "10♦")]
    #[test_case("KS" => "K♠")]
    #[test_case("AH" => "A♥")]
    #[test_case("2C" => "2♣")]
    fn test_code_label(code: &str) -> String {
        CardCode::try_from(code).unwrap().to_string()
    }

    #[test]
    fn test_red_suits() {
        assert!(Suit::Hearts.is_red());
        assert!(Suit::Diamonds.is_red());
        assert!(!Suit::Spades.is_red());
        assert!(!Suit::Clubs.is_red());
    }
}
