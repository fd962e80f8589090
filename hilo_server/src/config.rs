use clap::Parser;
use std::net::SocketAddr;
use std::time::Duration;
use url::Url;

/// 高低牌游戏服务器
#[derive(Parser, Debug, Clone)]
#[command(version, about)]
pub struct ServerConfig {
    /// 监听地址
    #[arg(long, default_value = "0.0.0.0:25917")]
    pub listen: SocketAddr,

    /// 远端牌堆服务地址
    #[arg(long, default_value = "https://deckofcardsapi.com")]
    pub deck_api: Url,

    /// 揭晓后进入下一轮前的停顿 (毫秒)
    #[arg(long, default_value_t = 2000)]
    pub reveal_ms: u64,

    /// 请求牌堆服务的超时 (秒)
    #[arg(long, default_value_t = 10)]
    pub http_timeout_secs: u64,
}

impl ServerConfig {
    pub fn reveal_delay(&self) -> Duration {
        Duration::from_millis(self.reveal_ms)
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }
}
