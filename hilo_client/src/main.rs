mod command;
mod render;

use anyhow::Context;
use clap::Parser;
use futures_util::{SinkExt, StreamExt};
use std::io::Write;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio_tungstenite::{connect_async, tungstenite::protocol::Message};
use url::Url;

use hilo_core::ServerMessage;

use crate::command::{parse_command, Command, HELP};
use crate::render::render_message;

/// 高低牌游戏终端客户端
#[derive(Parser, Debug)]
#[command(version, about)]
struct ClientConfig {
    /// 服务器 WebSocket 地址
    #[arg(long, default_value = "ws://127.0.0.1:25917/ws")]
    server: Url,
}

fn prompt() -> std::io::Result<()> {
    print!("> ");
    std::io::stdout().flush()
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ClientConfig::parse();

    println!("正在连接到: {}", config.server);
    let (ws_stream, _) = connect_async(config.server.as_str())
        .await
        .with_context(|| format!("无法连接 {}", config.server))?;
    println!("连接成功!");

    let (mut write, mut read) = ws_stream.split();

    // 启动一个任务来处理从服务器接收的消息
    tokio::spawn(async move {
        while let Some(msg) = read.next().await {
            match msg {
                Ok(Message::Text(text)) => match serde_json::from_str::<ServerMessage>(&text) {
                    Ok(server_msg) => {
                        println!("\n{}\n", render_message(&server_msg));
                        let _ = prompt(); // 重新显示输入提示符
                    }
                    Err(e) => eprintln!("解析服务器消息失败: {}", e),
                },
                Ok(Message::Close(_)) => {
                    println!("\n服务器已关闭连接");
                    break;
                }
                Ok(_) => {}
                Err(e) => {
                    eprintln!("接收消息时出错: {}", e);
                    break;
                }
            }
        }
    });

    // 主任务处理用户输入
    let mut stdin = BufReader::new(tokio::io::stdin()).lines();

    println!("--- 高低牌 ---");
    println!("{}", HELP);

    loop {
        prompt()?;

        let Some(line) = stdin.next_line().await? else { break };
        match parse_command(&line) {
            Command::Send(msg) => {
                let payload = serde_json::to_string(&msg)?;
                write.send(Message::Text(payload.into())).await.context("发送失败，连接可能已断开")?;
            }
            Command::Help => println!("{}", HELP),
            Command::Empty => {}
            Command::Exit => {
                println!("正在断开连接...");
                break;
            }
            Command::Unknown(cmd) => println!("未知命令: {}", cmd),
        }
    }

    let _ = write.close().await;
    Ok(())
}
