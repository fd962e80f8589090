mod config;
mod deck_api;
mod session;

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use axum::{
    extract::{
        ws::{Message, WebSocket},
        State, WebSocketUpgrade,
    },
    response::IntoResponse,
    routing::get,
    Router,
};
use clap::Parser;
use futures_util::{stream::StreamExt, SinkExt};
use tokio::sync::mpsc;
use tracing::{info, info_span, warn, Instrument};
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

use hilo_core::{ClientMessage, ServerMessage};

use crate::config::ServerConfig;
use crate::deck_api::HttpDeckService;
use crate::session::{malformed_message, SessionHost};

// 服务器全局状态：所有连接共用一个牌堆服务客户端，对局之间不共享任何状态
struct AppState {
    deck: Arc<HttpDeckService>,
    reveal_delay: Duration,
}

type SharedState = Arc<AppState>;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = ServerConfig::parse();
    let deck = HttpDeckService::new(config.deck_api.clone(), config.http_timeout())?;

    let state = SharedState::new(AppState {
        deck: Arc::new(deck),
        reveal_delay: config.reveal_delay(),
    });

    let app = Router::new()
        .route("/ws", get(websocket_handler))
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(config.listen)
        .await
        .with_context(|| format!("无法监听 {}", config.listen))?;
    info!("服务器正在监听 {}，牌堆服务 {}", config.listen, config.deck_api);
    axum::serve(listener, app).await.context("服务器异常退出")?;
    Ok(())
}

/// 处理 WebSocket 连接请求
async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<SharedState>,
) -> impl IntoResponse {
    ws.on_upgrade(|socket| handle_socket(socket, state))
}

/// 处理单个 WebSocket 连接的生命周期，每个连接一局游戏
async fn handle_socket(socket: WebSocket, state: SharedState) {
    let conn_id = Uuid::new_v4();
    let span = info_span!("conn", id = %conn_id);
    let (mut sender, mut receiver) = socket.split();

    // 发往客户端的消息统一经过这个通道
    let (out_tx, mut out_rx) = mpsc::channel::<ServerMessage>(32);
    // 解析好的客户端消息交给对局的事件循环
    let (in_tx, in_rx) = mpsc::channel::<ClientMessage>(32);

    // 启动一个新任务，专门负责将 MPSC 通道中的消息发送到 WebSocket
    tokio::spawn(
        async move {
            while let Some(msg) = out_rx.recv().await {
                let payload = match serde_json::to_string(&msg) {
                    Ok(payload) => payload,
                    Err(e) => {
                        warn!("序列化消息失败: {}", e);
                        continue;
                    }
                };
                if sender.send(Message::Text(payload.into())).await.is_err() {
                    // 发送失败，说明客户端已断开，退出任务
                    break;
                }
            }
        }
        .instrument(span.clone()),
    );

    let host = SessionHost::new(state.deck.clone(), state.reveal_delay, out_tx.clone());
    let host_task = tokio::spawn(host.run(in_rx).instrument(span.clone()));

    async move {
        info!("客户端已连接");
        // 主循环，处理从客户端接收到的消息
        while let Some(Ok(msg)) = receiver.next().await {
            let Message::Text(text) = msg else { continue };
            match serde_json::from_str::<ClientMessage>(&text) {
                Ok(client_msg) => {
                    if in_tx.send(client_msg).await.is_err() {
                        break;
                    }
                }
                Err(e) => {
                    warn!("解析消息失败: {}", e);
                    let _ = out_tx.send(malformed_message(e)).await;
                }
            }
        }

        // 关闭输入通道，事件循环随之退出
        drop(in_tx);
        let _ = host_task.await;
        info!("客户端连接关闭");
    }
    .instrument(span)
    .await;
}
