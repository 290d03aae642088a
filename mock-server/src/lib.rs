//! In-process imitation of a marketplace for integration tests.
//!
//! Serves the same URL shapes as the real API for one product line, checks
//! the access key, counts every request it receives, and can be switched into
//! answering 504 Gateway Timeout.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use axum::{
    extract::{Path, Query, Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::{Html, IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::net::TcpListener;
use uuid::Uuid;

/// Smallest price the mock sells its only listing for.
pub const LISTING_PRICE: i64 = 1000;

/// Shared state of one mock marketplace.
#[derive(Debug)]
pub struct MockMarket {
    key: String,
    app_code: String,
    requests: AtomicUsize,
    gateway_timeout: AtomicBool,
    token: Mutex<String>,
}

impl MockMarket {
    /// A marketplace accepting `key`, serving the feed layout of `app_code`
    /// (570, 730, 440 or 753).
    pub fn new(key: &str, app_code: &str) -> Arc<Self> {
        Arc::new(Self {
            key: key.to_string(),
            app_code: app_code.to_string(),
            requests: AtomicUsize::new(0),
            gateway_timeout: AtomicBool::new(false),
            token: Mutex::new(String::new()),
        })
    }

    /// Number of HTTP requests received so far.
    pub fn requests(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }

    /// Answer every `/api/` request with 504 while `on` is set.
    pub fn set_gateway_timeout(&self, on: bool) {
        self.gateway_timeout.store(on, Ordering::SeqCst);
    }

    fn authorize(&self, query: &KeyQuery) -> Result<(), MockError> {
        if self.gateway_timeout.load(Ordering::SeqCst) {
            return Err(MockError::GatewayTimeout);
        }
        match query.key.as_deref() {
            Some(key) if key == self.key => Ok(()),
            _ => Err(MockError::BadKey),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct KeyQuery {
    key: Option<String>,
}

enum MockError {
    BadKey,
    GatewayTimeout,
    NotFound,
}

impl IntoResponse for MockError {
    fn into_response(self) -> Response {
        match self {
            // The marketplace reports key problems in the envelope, not the status.
            MockError::BadKey => Json(json!({"success": false, "error": "Bad KEY"})).into_response(),
            MockError::GatewayTimeout => {
                (StatusCode::GATEWAY_TIMEOUT, Html("<html>504 Gateway Time-out</html>")).into_response()
            }
            MockError::NotFound => StatusCode::NOT_FOUND.into_response(),
        }
    }
}

type Reply = Result<Json<Value>, MockError>;

type Market = State<Arc<MockMarket>>;

pub fn app(market: Arc<MockMarket>) -> Router {
    Router::new()
        .route("/api/Test/", get(test))
        .route("/api/PingPong/", get(ping_pong))
        .route("/api/GetMoney/", get(get_money))
        .route("/api/ItemInfo/{ids}/{lang}/", get(item_info))
        .route("/api/Trades/", get(trades))
        .route("/api/Buy/{*rest}", get(buy))
        .route("/api/SetPrice/{item}/{price}/", get(set_price))
        .route("/api/QuickItems/", get(quick_items))
        .route("/api/GetOrders/", get(get_orders))
        .route("/api/GetToken/", get(get_token))
        .route("/api/SetToken/{token}/", get(set_token))
        .route("/api/GetWSAuth/", get(get_ws_auth))
        .route("/itemdb/{file}", get(item_db))
        .layer(middleware::from_fn_with_state(market.clone(), count_requests))
        .with_state(market)
}

pub async fn run(listener: TcpListener, market: Arc<MockMarket>) -> Result<(), std::io::Error> {
    axum::serve(listener, app(market)).await
}

async fn count_requests(State(market): Market, request: Request, next: Next) -> Response {
    market.requests.fetch_add(1, Ordering::SeqCst);
    next.run(request).await
}

async fn test(State(market): Market, Query(query): Query<KeyQuery>) -> Reply {
    market.authorize(&query)?;
    Ok(Json(json!({
        "success": true,
        "status": {
            "user_token": true,
            "trade_check": true,
            "site_online": true,
            "site_notmpban": true
        }
    })))
}

async fn ping_pong(State(market): Market, Query(query): Query<KeyQuery>) -> Reply {
    market.authorize(&query)?;
    Ok(Json(json!({"success": true, "ping": "pong"})))
}

async fn get_money(State(market): Market, Query(query): Query<KeyQuery>) -> Reply {
    market.authorize(&query)?;
    Ok(Json(json!({"money": 25000})))
}

async fn item_info(
    State(market): Market,
    Path((ids, lang)): Path<(String, String)>,
    Query(query): Query<KeyQuery>,
) -> Reply {
    market.authorize(&query)?;
    let (class_id, instance_id) = ids.split_once('_').ok_or(MockError::NotFound)?;
    let name = if lang == "en" { "Treasure Key" } else { "Ключ от сокровищницы" };
    Ok(Json(json!({
        "classid": class_id,
        "instanceid": instance_id,
        "market_name": name,
        "hash": "d41d8cd98f00b204e9800998ecf8427e",
        "min_price": LISTING_PRICE.to_string(),
        "offers": [{"price": LISTING_PRICE.to_string(), "count": "1", "my_count": "0"}],
        "buy_offers": [],
        "description": [{"type": "html", "value": "Unlocks a treasure"}],
        "tags": []
    })))
}

async fn trades(State(market): Market, Query(query): Query<KeyQuery>) -> Reply {
    market.authorize(&query)?;
    Ok(Json(json!([{
        "ui_id": "101",
        "i_market_name": "Treasure Key",
        "ui_status": "1",
        "ui_price": 12.5,
        "position": 1,
        "min_price_text": false
    }])))
}

/// `{classid}_{instanceid}/{price}/{hash}/`; the hash segment may be empty.
async fn buy(State(market): Market, Path(rest): Path<String>, Query(query): Query<KeyQuery>) -> Reply {
    market.authorize(&query)?;
    let mut segments = rest.trim_start_matches('/').split('/');
    let _item = segments.next().ok_or(MockError::NotFound)?;
    let price: i64 = segments
        .next()
        .and_then(|p| p.parse().ok())
        .ok_or(MockError::NotFound)?;
    if price < LISTING_PRICE {
        return Ok(Json(json!({"result": "out of stock", "id": ""})));
    }
    Ok(Json(json!({"result": "ok", "id": Uuid::new_v4().to_string()})))
}

async fn set_price(
    State(market): Market,
    Path((item, price)): Path<(String, i64)>,
    Query(query): Query<KeyQuery>,
) -> Reply {
    market.authorize(&query)?;
    let item_id: i64 = item
        .trim_start_matches("new_")
        .split('_')
        .next()
        .and_then(|id| id.parse().ok())
        .unwrap_or(0);
    Ok(Json(json!({
        "success": true,
        "result": 1,
        "item_id": item_id,
        "price": price as f64 / 100.0,
        "price_text": format!("{:.2}", price as f64 / 100.0),
        "status": "1",
        "position": 0
    })))
}

async fn quick_items(State(market): Market, Query(query): Query<KeyQuery>) -> Reply {
    market.authorize(&query)?;
    let descriptions = json!([{"type": "html", "value": "Used by: Axe"}]).to_string();
    let tags = json!([{
        "internal_name": "Rarity_Rare",
        "name": "Rare",
        "category": "Rarity",
        "color": "4b69ff",
        "category_name": "Rarity"
    }])
    .to_string();
    Ok(Json(json!({
        "success": true,
        "items": [{
            "ui_id": "555",
            "l_paid": "1200",
            "i_classid": "57939770",
            "i_instanceid": "57939888",
            "i_market_name": "Treasure Key",
            "i_descriptions": descriptions,
            "i_tags": tags
        }]
    })))
}

async fn get_orders(State(market): Market, Query(query): Query<KeyQuery>) -> Reply {
    market.authorize(&query)?;
    Ok(Json(json!({"success": true, "Orders": false})))
}

async fn get_token(State(market): Market, Query(query): Query<KeyQuery>) -> Reply {
    market.authorize(&query)?;
    let token = market.token.lock().map(|t| t.clone()).unwrap_or_default();
    Ok(Json(json!({"success": true, "token": token})))
}

async fn set_token(
    State(market): Market,
    Path(token): Path<String>,
    Query(query): Query<KeyQuery>,
) -> Reply {
    market.authorize(&query)?;
    if let Ok(mut current) = market.token.lock() {
        *current = token;
    }
    Ok(Json(json!({"success": true})))
}

async fn get_ws_auth(State(market): Market, Query(query): Query<KeyQuery>) -> Reply {
    market.authorize(&query)?;
    Ok(Json(json!({"success": true, "wsAuth": Uuid::new_v4().simple().to_string()})))
}

/// `current_{code}.json` pointer, or the `db_{code}.csv` feed it names.
async fn item_db(State(market): Market, Path(file): Path<String>) -> Result<Response, MockError> {
    if file == format!("current_{}.json", market.app_code) {
        let pointer = json!({"time": 1_500_000_000, "db": format!("db_{}.csv", market.app_code)});
        return Ok(Json(pointer).into_response());
    }
    if file == format!("db_{}.csv", market.app_code) {
        return Ok(price_feed(&market.app_code).into_response());
    }
    Err(MockError::NotFound)
}

/// Header plus two rows in the column layout of `app_code`.
pub fn price_feed(app_code: &str) -> String {
    let specific: &[&str] = match app_code {
        "730" => &["c_slot", "c_stickers"],
        "440" => &["c_craftable", "c_look", "c_collection"],
        "753" => &["c_slot", "c_os", "c_features", "c_rating"],
        _ => &[],
    };
    let leading = [
        "c_classid", "c_instanceid", "c_price", "c_offers", "c_popularity", "c_rarity", "c_quality", "c_heroid",
    ];
    let trailing = ["c_market_name", "c_name_color", "c_price_updated", "c_pop"];

    let header: Vec<&str> = leading.iter().chain(specific).chain(trailing.iter()).copied().collect();
    let mut feed = header.join(";");
    feed.push('\n');
    for (n, name) in [(1, "Treasure Key"), (2, "Quoted \"Name\"")] {
        let mut row: Vec<String> = vec![
            format!("{n}00"),
            format!("{n}01"),
            format!("{n}500"),
            "3".to_string(),
            "12".to_string(),
            "Rare".to_string(),
            "Standard".to_string(),
            "0".to_string(),
        ];
        row.extend(specific.iter().map(|col| col.trim_start_matches("c_").to_string()));
        row.extend([name.to_string(), "D2D2D2".to_string(), "1500000000".to_string(), n.to_string()]);
        feed.push_str(&row.join(";"));
        feed.push_str(";\n");
    }
    feed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn feed_rows_match_header_width() {
        for (code, width) in [("570", 12), ("730", 14), ("440", 15), ("753", 16)] {
            let feed = price_feed(code);
            let mut lines = feed.lines();
            assert_eq!(lines.next().unwrap().split(';').count(), width, "{code} header");
            for line in lines {
                // Rows end with a delimiter, leaving one empty trailing column.
                assert_eq!(line.split(';').count(), width + 1, "{code} row");
            }
        }
    }

    #[test]
    fn authorize_checks_key_and_timeout_flag() {
        let market = MockMarket::new("KEY", "570");
        assert!(market.authorize(&KeyQuery { key: Some("KEY".to_string()) }).is_ok());
        assert!(matches!(
            market.authorize(&KeyQuery { key: Some("nope".to_string()) }),
            Err(MockError::BadKey)
        ));
        assert!(matches!(market.authorize(&KeyQuery { key: None }), Err(MockError::BadKey)));

        market.set_gateway_timeout(true);
        assert!(matches!(
            market.authorize(&KeyQuery { key: Some("KEY".to_string()) }),
            Err(MockError::GatewayTimeout)
        ));
    }
}
