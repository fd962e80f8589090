//! # 高低牌游戏核心逻辑库
//!
//! 这个 `core` crate 包含了牌的定义、每一轮的高低判定、
//! 对局状态机，以及客户端-服务器通信消息的定义。
//! 远端牌堆服务通过 [`DeckService`] 接入，与具体的网络实现解耦。

mod card;
mod error;
mod logic;
mod message;
mod service;
mod state;

pub use card::*;

pub use error::*;

pub use logic::*;

pub use message::*;

pub use service::*;

pub use state::*;
