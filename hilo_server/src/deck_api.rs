use anyhow::{bail, Context};
use hilo_core::{Card, Deal, DeckId, DeckService, GameError};
use reqwest::StatusCode;
use serde::Deserialize;
use std::time::Duration;
use url::Url;

/// deckofcardsapi 的抽牌响应
/// 新牌堆和继续抽牌都是这个格式；失败时只保证有 `success` 和 `error`。
#[derive(Debug, Deserialize)]
struct DrawResponse {
    success: bool,
    #[serde(default)]
    deck_id: Option<DeckId>,
    #[serde(default)]
    cards: Vec<Card>,
    #[serde(default)]
    remaining: u32,
    #[serde(default)]
    error: Option<String>,
}

/// 通过 HTTP 访问 deckofcardsapi (或兼容服务) 的牌堆服务，不做重试
#[derive(Debug, Clone)]
pub struct HttpDeckService {
    client: reqwest::Client,
    base: Url,
}

impl HttpDeckService {
    pub fn new(base: Url, timeout: Duration) -> anyhow::Result<Self> {
        if base.cannot_be_a_base() {
            bail!("牌堆服务地址不能作为基础路径: {}", base);
        }
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("无法创建 HTTP 客户端")?;
        Ok(HttpDeckService { client, base })
    }

    /// `{base}/api/deck/{deck}/draw/?count=1`，新牌堆时 `deck` 为 `new`
    fn draw_url(&self, deck: &str) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().extend(["api", "deck", deck, "draw", ""]);
        }
        url.query_pairs_mut().append_pair("count", "1");
        url
    }

    async fn fetch(&self, url: Url, deck_id: Option<&DeckId>) -> Result<Deal, GameError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| GameError::ServiceUnavailable(e.to_string()))?;

        let status = response.status();
        if let Some(id) = deck_id {
            if status == StatusCode::NOT_FOUND {
                return Err(GameError::InvalidSession(id.clone()));
            }
        }
        let body: DrawResponse = match response.json().await {
            Ok(body) => body,
            Err(_) if !status.is_success() => {
                return Err(GameError::ServiceUnavailable(format!("HTTP {}", status)));
            }
            Err(e) => return Err(GameError::ServiceUnavailable(e.to_string())),
        };

        if !body.success {
            let reason = body.error.unwrap_or_else(|| "success=false".to_string());
            return match deck_id {
                Some(id) if reason.contains("does not exist") => {
                    Err(GameError::InvalidSession(id.clone()))
                }
                _ => Err(GameError::ServiceUnavailable(reason)),
            };
        }

        let deck_id = body
            .deck_id
            .or_else(|| deck_id.cloned())
            .ok_or_else(|| GameError::ServiceUnavailable("响应中缺少 deck_id".to_string()))?;
        let card = body
            .cards
            .into_iter()
            .next()
            .ok_or_else(|| GameError::ServiceUnavailable("响应中没有牌".to_string()))?;
        Ok(Deal { deck_id, card, remaining: body.remaining })
    }
}

impl DeckService for HttpDeckService {
    async fn new_deck(&self) -> Result<Deal, GameError> {
        self.fetch(self.draw_url("new"), None).await
    }

    async fn draw_card(&self, deck_id: &DeckId) -> Result<Deal, GameError> {
        self.fetch(self.draw_url(deck_id), Some(deck_id)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::extract::Path;
    use axum::http::StatusCode as HttpStatus;
    use axum::routing::get;
    use axum::{Json, Router};
    use hilo_core::{Rank, Suit};
    use serde_json::{json, Value};

    async fn spawn_stub(router: Router) -> Url {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, router).await.unwrap() });
        Url::parse(&format!("http://{}", addr)).unwrap()
    }

    fn service(base: Url) -> HttpDeckService {
        HttpDeckService::new(base, Duration::from_secs(5)).unwrap()
    }

    // 模拟 deckofcardsapi：只认识 abc123 这一副牌
    async fn draw(Path(deck): Path<String>) -> (HttpStatus, Json<Value>) {
        match deck.as_str() {
            "new" => (
                HttpStatus::OK,
                Json(json!({
                    "success": true,
                    "deck_id": "abc123",
                    "cards": [{
                        "code": "7H",
                        "image": "https://deckofcardsapi.com/static/img/7H.png",
                        "images": {"png": "https://deckofcardsapi.com/static/img/7H.png"},
                        "value": "7",
                        "suit": "HEARTS"
                    }],
                    "remaining": 51
                })),
            ),
            "abc123" => (
                HttpStatus::OK,
                Json(json!({
                    "success": true,
                    "deck_id": "abc123",
                    "cards": [{"code": "KD", "image": "", "value": "KING", "suit": "DIAMONDS"}],
                    "remaining": 50
                })),
            ),
            _ => (
                HttpStatus::NOT_FOUND,
                Json(json!({"success": false, "error": "Deck ID does not exist."})),
            ),
        }
    }

    #[test]
    fn test_draw_url() {
        let svc = service(Url::parse("https://deckofcardsapi.com").unwrap());
        assert_eq!(svc.draw_url("new").as_str(), "https://deckofcardsapi.com/api/deck/new/draw/?count=1");

        let svc = service(Url::parse("http://localhost:8000/cards/").unwrap());
        assert_eq!(svc.draw_url("x1").as_str(), "http://localhost:8000/cards/api/deck/x1/draw/?count=1");
    }

    #[test]
    fn test_parse_failure_body() {
        let body: DrawResponse =
            serde_json::from_str(r#"{"success": false, "error": "Not enough cards remaining to draw 1 additional"}"#)
                .unwrap();
        assert!(!body.success);
        assert!(body.cards.is_empty());
        assert_eq!(body.remaining, 0);
    }

    #[tokio::test]
    async fn test_new_deck_and_draw() {
        let base = spawn_stub(Router::new().route("/api/deck/{deck}/draw/", get(draw))).await;
        let svc = service(base);

        let first = svc.new_deck().await.unwrap();
        assert_eq!(first.deck_id, "abc123");
        assert_eq!(first.card.rank, Rank::Seven);
        assert_eq!(first.card.suit, Suit::Hearts);
        assert_eq!(first.remaining, 51);

        let next = svc.draw_card(&first.deck_id).await.unwrap();
        assert_eq!(next.card.code.as_str(), "KD");
        assert_eq!(next.remaining, 50);
    }

    #[tokio::test]
    async fn test_unknown_deck_is_invalid_session() {
        let base = spawn_stub(Router::new().route("/api/deck/{deck}/draw/", get(draw))).await;
        let err = service(base).draw_card(&"gone".to_string()).await.unwrap_err();
        assert_eq!(err, GameError::InvalidSession("gone".to_string()));
    }

    #[tokio::test]
    async fn test_missing_deck_reported_in_body_is_invalid_session() {
        // 状态码是 200，只有响应体说明牌堆不存在
        let router = Router::new().route(
            "/api/deck/{deck}/draw/",
            get(|| async { Json(json!({"success": false, "error": "Deck ID does not exist."})) }),
        );
        let svc = service(spawn_stub(router).await);

        let err = svc.draw_card(&"zz".to_string()).await.unwrap_err();
        assert_eq!(err, GameError::InvalidSession("zz".to_string()));

        // 开新牌堆时没有可失效的牌堆，只能算服务不可用
        let err = svc.new_deck().await.unwrap_err();
        assert_eq!(err, GameError::ServiceUnavailable("Deck ID does not exist.".to_string()));
    }

    #[tokio::test]
    async fn test_non_json_error_body_is_service_unavailable() {
        let router = Router::new().route(
            "/api/deck/{deck}/draw/",
            get(|| async { (HttpStatus::INTERNAL_SERVER_ERROR, "Internal Server Error") }),
        );
        let svc = service(spawn_stub(router).await);

        let err = svc.draw_card(&"abc123".to_string()).await.unwrap_err();
        assert_eq!(err, GameError::ServiceUnavailable("HTTP 500 Internal Server Error".to_string()));
        assert!(matches!(svc.new_deck().await, Err(GameError::ServiceUnavailable(_))));
    }

    #[tokio::test]
    async fn test_non_json_success_body_is_service_unavailable() {
        let router = Router::new().route("/api/deck/new/draw/", get(|| async { "<html>maintenance</html>" }));
        let err = service(spawn_stub(router).await).new_deck().await.unwrap_err();
        assert!(matches!(err, GameError::ServiceUnavailable(_)));
    }

    #[tokio::test]
    async fn test_success_false_is_service_unavailable() {
        let router = Router::new().route(
            "/api/deck/new/draw/",
            get(|| async { Json(json!({"success": false, "error": "maintenance"})) }),
        );
        let err = service(spawn_stub(router).await).new_deck().await.unwrap_err();
        assert_eq!(err, GameError::ServiceUnavailable("maintenance".to_string()));
    }

    #[tokio::test]
    async fn test_empty_cards_is_service_unavailable() {
        let router = Router::new().route(
            "/api/deck/new/draw/",
            get(|| async { Json(json!({"success": true, "deck_id": "d", "cards": [], "remaining": 0})) }),
        );
        let err = service(spawn_stub(router).await).new_deck().await.unwrap_err();
        assert!(matches!(err, GameError::ServiceUnavailable(_)));
    }

    #[tokio::test]
    async fn test_unreachable_host_is_service_unavailable() {
        // 先占一个端口再释放，保证连接被拒绝
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let base = Url::parse(&format!("http://{}", addr)).unwrap();
        let err = service(base).new_deck().await.unwrap_err();
        assert!(matches!(err, GameError::ServiceUnavailable(_)));
    }

    #[test]
    fn test_rejects_non_base_url() {
        let base = Url::parse("mailto:dealer@example.com").unwrap();
        assert!(HttpDeckService::new(base, Duration::from_secs(1)).is_err());
    }
}
