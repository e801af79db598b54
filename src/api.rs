// src/api.rs
// HTTP client for the bingo core API: shop balance and round start.

use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::config::ClientConfig;
use crate::defs::CardId;
use crate::error::{ClientError, Result};
use crate::logging::log_info;
use crate::pattern::WinningPattern;
use crate::session::Session;
use crate::settings::{CardSelection, GameSettings, Language};

// ============================================================================
// Request/Response Structures
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BalanceResponse {
    pub balance: f64,
}

/// Body of `POST /startgame`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StartGameRequest {
    pub shop_id: String,
    pub bet_per_card: u64,
    pub commission_rate: f64,
    /// Milliseconds between calls.
    pub interval: u64,
    pub language: Language,
    pub winning_pattern: WinningPattern,
    pub prize: f64,
    pub total_cards: usize,
    pub selected_cards: Vec<CardId>,
}

impl StartGameRequest {
    pub fn new(shop_id: &str, settings: &GameSettings, selection: &CardSelection) -> Self {
        Self {
            shop_id: shop_id.to_string(),
            bet_per_card: settings.bet_per_card,
            commission_rate: settings.commission.rate(),
            interval: settings.interval.millis(),
            language: settings.language,
            winning_pattern: settings.pattern,
            prize: settings.calculate_prize(selection.len()),
            total_cards: selection.len(),
            selected_cards: selection.selected().to_vec(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct StartGameResponse {
    pub round_id: serde_json::Value,
}

impl StartGameResponse {
    /// Round ids come back as strings or numbers depending on the backend.
    pub fn round_id(&self) -> Result<String> {
        match &self.round_id {
            serde_json::Value::String(id) => Ok(id.clone()),
            serde_json::Value::Number(id) => Ok(id.to_string()),
            other => Err(ClientError::InvalidResponse(format!("unexpected round_id {other}"))),
        }
    }
}

/// Everything the live dashboard needs once a round has started.
#[derive(Debug, Clone, PartialEq)]
pub struct RoundInfo {
    pub round_id: String,
    pub shop_id: String,
    pub prize: f64,
    pub selected_cards: Vec<CardId>,
    pub interval_ms: u64,
    pub language: Language,
    pub bet_per_card: u64,
    pub commission_rate: f64,
    pub winning_pattern: WinningPattern,
}

impl RoundInfo {
    fn from_request(round_id: String, request: StartGameRequest) -> Self {
        Self {
            round_id,
            shop_id: request.shop_id,
            prize: request.prize,
            selected_cards: request.selected_cards,
            interval_ms: request.interval,
            language: request.language,
            bet_per_card: request.bet_per_card,
            commission_rate: request.commission_rate,
            winning_pattern: request.winning_pattern,
        }
    }
}

// ============================================================================
// API Client
// ============================================================================

#[derive(Debug, Clone)]
pub struct ApiClient {
    http_client: reqwest::Client,
}

impl ApiClient {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout))
            .build()?;
        Ok(Self { http_client })
    }

    pub async fn fetch_balance(&self, session: &Session) -> Result<f64> {
        let url = session.endpoint(&format!("balance/{}", session.shop_id()?));
        let response = self.http_client.get(&url).send().await?;
        let balance: BalanceResponse = read_json(response, "Unable to load balance").await?;
        Ok(balance.balance)
    }

    pub async fn start_game(
        &self,
        session: &Session,
        settings: &GameSettings,
        selection: &CardSelection,
    ) -> Result<RoundInfo> {
        if selection.is_empty() {
            return Err(ClientError::EmptySelection);
        }
        let request = StartGameRequest::new(session.shop_id()?, settings, selection);
        let url = session.endpoint("startgame");

        let response = self.http_client.post(&url).json(&request).send().await?;
        let started: StartGameResponse = read_json(response, "Game creation failed").await?;
        let round_id = started.round_id()?;

        log_info(&format!(
            "Round {round_id} started: {} cards, prize {:.2}",
            request.total_cards, request.prize
        ));
        Ok(RoundInfo::from_request(round_id, request))
    }
}

async fn read_json<T: DeserializeOwned>(response: reqwest::Response, context: &'static str) -> Result<T> {
    let status = response.status();
    if status.is_success() {
        Ok(response.json().await?)
    } else {
        let body = response.text().await.unwrap_or_default();
        Err(ClientError::Status { context, status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::{CallInterval, Commission};

    fn selection(cards: &[CardId]) -> CardSelection {
        CardSelection::try_from(cards).unwrap()
    }

    #[test]
    fn test_start_game_request_body() {
        let settings = GameSettings {
            bet_per_card: 100,
            commission: Commission::Twenty,
            interval: CallInterval::Five,
            pattern: WinningPattern::FourCorners,
            language: Language::English,
        };
        let request = StartGameRequest::new("shop-1", &settings, &selection(&[7, 3]));
        let body = serde_json::to_value(&request).unwrap();

        assert_eq!(body["shop_id"], "shop-1");
        assert_eq!(body["bet_per_card"], 100);
        assert_eq!(body["commission_rate"], 0.2);
        assert_eq!(body["interval"], 5000);
        assert_eq!(body["language"], "English");
        assert_eq!(body["winning_pattern"], "Four Corners");
        assert_eq!(body["prize"], 160.0);
        assert_eq!(body["total_cards"], 2);
        assert_eq!(body["selected_cards"], serde_json::json!([7, 3]));
    }

    #[test]
    fn test_round_id_formats() {
        let text: StartGameResponse = serde_json::from_str(r#"{"round_id": "r-19"}"#).unwrap();
        assert_eq!(text.round_id().unwrap(), "r-19");
        let number: StartGameResponse = serde_json::from_str(r#"{"round_id": 19}"#).unwrap();
        assert_eq!(number.round_id().unwrap(), "19");
        let missing: StartGameResponse = serde_json::from_str(r#"{"round_id": null}"#).unwrap();
        assert!(missing.round_id().is_err());
    }

    #[tokio::test]
    async fn test_start_game_needs_cards_and_shop() {
        let client = ApiClient::new(&ClientConfig::default()).unwrap();
        let settings = GameSettings::default();

        let logged_in = Session::new("http://127.0.0.1:9", Some("shop".to_string()));
        let result = client.start_game(&logged_in, &settings, &CardSelection::new()).await;
        assert!(matches!(result, Err(ClientError::EmptySelection)));

        let logged_out = Session::new("http://127.0.0.1:9", None);
        let result = client.start_game(&logged_out, &settings, &selection(&[1])).await;
        assert!(matches!(result, Err(ClientError::MissingShopId)));
    }
}
