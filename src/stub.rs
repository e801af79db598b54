// src/stub.rs
// Minimal local stand-in for the bingo core API, for development and tests.
// Serves GET /balance/{shop_id} and POST /startgame.

use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;

use http_body_util::{BodyExt, Full};
use hyper::header::{ACCESS_CONTROL_ALLOW_ORIGIN, CONTENT_TYPE, HeaderValue};
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Method, Request, Response, StatusCode, body::Bytes};
use hyper_util::rt::TokioIo;
use serde_json::json;
use tokio::net::TcpListener;

use crate::api::{BalanceResponse, StartGameRequest};
use crate::config::ServerConfig;
use crate::defs::TOTAL_CARDS;
use crate::logging::{log_error, log_info, log_warning};

pub struct StubState {
    balance: f64,
    rounds: AtomicU64,
}

impl StubState {
    pub fn new(balance: f64) -> Self {
        Self { balance, rounds: AtomicU64::new(0) }
    }

    pub fn rounds_started(&self) -> u64 {
        self.rounds.load(Ordering::Relaxed)
    }
}

/// Bind the configured address and serve in a background task until the returned flag is set.
pub async fn start_server(
    config: ServerConfig,
) -> std::io::Result<(tokio::task::JoinHandle<()>, Arc<AtomicBool>, SocketAddr)> {
    let listener = TcpListener::bind(config.bind_address()).await?;
    let addr = listener.local_addr()?;
    let state = Arc::new(StubState::new(config.balance));
    let shutdown_signal = Arc::new(AtomicBool::new(false));
    let shutdown_clone = Arc::clone(&shutdown_signal);

    log_info(&format!("Stub API server listening on {addr}"));
    let handle = tokio::spawn(serve(listener, state, shutdown_clone));
    Ok((handle, shutdown_signal, addr))
}

pub async fn serve(listener: TcpListener, state: Arc<StubState>, shutdown: Arc<AtomicBool>) {
    loop {
        if shutdown.load(Ordering::Relaxed) {
            break;
        }

        // Accept with a timeout so the shutdown flag is noticed
        let accept_result = tokio::time::timeout(Duration::from_millis(100), listener.accept()).await;

        match accept_result {
            Ok(Ok((stream, _))) => {
                let state = Arc::clone(&state);
                let io = TokioIo::new(stream);

                tokio::spawn(async move {
                    let service = service_fn(move |req| handle_request(req, Arc::clone(&state)));
                    if let Err(err) = http1::Builder::new().serve_connection(io, service).await {
                        log_error(&format!("Error serving connection: {err:?}"));
                    }
                });
            }
            Ok(Err(e)) => {
                log_error(&format!("Error accepting connection: {e}"));
                break;
            }
            Err(_) => {}
        }
    }
    log_info("Stub API server shutting down...");
}

async fn handle_request(
    req: Request<hyper::body::Incoming>,
    state: Arc<StubState>,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    let response = if method == Method::GET && path.starts_with("/balance/") {
        handle_balance(&path["/balance/".len()..], &state)
    } else if method == Method::POST && path == "/startgame" {
        handle_start_game(req, &state).await
    } else {
        json_response(StatusCode::NOT_FOUND, json!({ "error": "Not found" }))
    };
    Ok(response)
}

fn handle_balance(shop_id: &str, state: &StubState) -> Response<Full<Bytes>> {
    if shop_id.is_empty() || shop_id == "null" {
        return json_response(StatusCode::BAD_REQUEST, json!({ "error": "Missing shop id" }));
    }
    json_response(StatusCode::OK, json!(BalanceResponse { balance: state.balance }))
}

async fn handle_start_game(req: Request<hyper::body::Incoming>, state: &StubState) -> Response<Full<Bytes>> {
    let body = match req.collect().await {
        Ok(body) => body.to_bytes(),
        Err(_) => {
            return json_response(StatusCode::BAD_REQUEST, json!({ "error": "Failed to read request body" }));
        }
    };

    let request: StartGameRequest = match serde_json::from_slice(&body) {
        Ok(request) => request,
        Err(e) => {
            log_warning(&format!("Rejected startgame body: {e}"));
            return json_response(StatusCode::BAD_REQUEST, json!({ "error": "Invalid JSON in request body" }));
        }
    };

    if let Err(reason) = check_start_request(&request) {
        log_warning(&format!("Rejected startgame for shop {}: {reason}", request.shop_id));
        return json_response(StatusCode::UNPROCESSABLE_ENTITY, json!({ "error": reason }));
    }

    let round = state.rounds.fetch_add(1, Ordering::Relaxed) + 1;
    let round_id = format!("round_{round:04}");
    log_info(&format!(
        "Shop {} started {round_id} with {} cards ({}, {} ms)",
        request.shop_id, request.total_cards, request.winning_pattern, request.interval
    ));
    json_response(StatusCode::OK, json!({ "round_id": round_id }))
}

fn check_start_request(request: &StartGameRequest) -> Result<(), String> {
    if request.selected_cards.is_empty() {
        return Err("No cards selected".to_string());
    }
    if request.total_cards != request.selected_cards.len() {
        return Err("total_cards does not match selected_cards".to_string());
    }
    if let Some(card) = request.selected_cards.iter().find(|&&c| c == 0 || c > TOTAL_CARDS) {
        return Err(format!("Unknown card {card}"));
    }
    if !(0.0..1.0).contains(&request.commission_rate) {
        return Err("commission_rate must be a fraction".to_string());
    }
    Ok(())
}

fn json_response(status: StatusCode, body: serde_json::Value) -> Response<Full<Bytes>> {
    let mut response = Response::new(Full::new(Bytes::from(body.to_string())));
    *response.status_mut() = status;
    let headers = response.headers_mut();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ApiClient;
    use crate::config::ClientConfig;
    use crate::error::ClientError;
    use crate::session::Session;
    use crate::settings::{CardSelection, GameSettings};

    async fn spawn_stub(balance: f64) -> (Arc<StubState>, Arc<AtomicBool>, String) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let state = Arc::new(StubState::new(balance));
        let shutdown = Arc::new(AtomicBool::new(false));
        tokio::spawn(serve(listener, Arc::clone(&state), Arc::clone(&shutdown)));
        (state, shutdown, format!("http://{addr}"))
    }

    #[tokio::test]
    async fn test_fetch_balance() {
        let (_state, shutdown, url) = spawn_stub(2500.0).await;
        let client = ApiClient::new(&ClientConfig::default()).unwrap();
        let session = Session::new(url, Some("shop-1".to_string()));

        let balance = client.fetch_balance(&session).await.unwrap();
        assert_eq!(balance, 2500.0);
        shutdown.store(true, Ordering::Relaxed);
    }

    #[tokio::test]
    async fn test_start_game_round_trip() {
        let (state, shutdown, url) = spawn_stub(0.0).await;
        let client = ApiClient::new(&ClientConfig::default()).unwrap();
        let session = Session::new(url, Some("shop-9".to_string()));
        let settings = GameSettings::default();
        let selection = CardSelection::try_from(&[5, 17, 200][..]).unwrap();

        let first = client.start_game(&session, &settings, &selection).await.unwrap();
        assert_eq!(first.round_id, "round_0001");
        assert_eq!(first.shop_id, "shop-9");
        assert_eq!(first.selected_cards, vec![5, 17, 200]);
        assert_eq!(first.interval_ms, 4000);
        assert!((first.prize - 10500.0).abs() < 1e-6);

        let second = client.start_game(&session, &settings, &selection).await.unwrap();
        assert_eq!(second.round_id, "round_0002");
        assert_eq!(state.rounds_started(), 2);
        shutdown.store(true, Ordering::Relaxed);
    }

    #[tokio::test]
    async fn test_unknown_route_is_a_status_error() {
        let (_state, shutdown, url) = spawn_stub(0.0).await;
        let client = ApiClient::new(&ClientConfig::default()).unwrap();
        let session = Session::new(format!("{url}/v2"), Some("shop".to_string()));

        let result = client.fetch_balance(&session).await;
        match result {
            Err(ClientError::Status { status, context, .. }) => {
                assert_eq!(status, reqwest::StatusCode::NOT_FOUND);
                assert_eq!(context, "Unable to load balance");
            }
            other => panic!("expected status error, got {other:?}"),
        }
        shutdown.store(true, Ordering::Relaxed);
    }

    #[test]
    fn test_check_start_request() {
        let settings = GameSettings::default();
        let selection = CardSelection::try_from(&[1, 2][..]).unwrap();
        let mut request = StartGameRequest::new("shop", &settings, &selection);
        assert!(check_start_request(&request).is_ok());

        request.total_cards = 3;
        assert!(check_start_request(&request).is_err());

        request.total_cards = 1;
        request.selected_cards = vec![201];
        assert_eq!(check_start_request(&request), Err("Unknown card 201".to_string()));
    }
}
