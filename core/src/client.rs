//! Blocking façade over the marketplace API.
//!
//! # Design
//! `MarketClient` holds the access key, product line, resolved base URL and
//! response language, and never changes after construction. Each operation
//! builds one `Endpoint` URL, runs it through the `Executor` (which owns the
//! serialization gate and the envelope check) and decodes the returned body a
//! second time into the operation's own type.
//!
//! Construction always performs the `Test` probe, so a client that exists has
//! completed at least one successful round trip.

use std::fmt;

use serde::de::DeserializeOwned;
use tracing::debug;

use crate::config::{ClientConfig, Language};
use crate::endpoint::{Endpoint, RequestDirection, UrlContext};
use crate::error::ApiError;
use crate::executor::{Executor, SerialGate};
use crate::http::{Transport, UreqTransport};
use crate::product::ProductLine;
use crate::record::{parse_price_feed, PriceRecord};
use crate::types::{
    BuyResponse, DeleteOrdersResponse, InventoryStatus, ItemDbCurrent, ItemHistory, ItemInfo,
    ItemRequestResponse, MarketTrades, Money, Notifications, OperationHistory, Orders, PingPong,
    QuickItems, RemoveAllResponse, SetPriceResponse, SuccessResponse, TestResponse, TokenResponse,
    Trade, WsAuth,
};

/// Smallest price, in minor units, that the price-setting operations accept.
pub const MIN_PRICE: i64 = 100;

/// Client for one marketplace account on one product line.
#[derive(Clone)]
pub struct MarketClient<T = UreqTransport> {
    key: String,
    product: ProductLine,
    base_url: String,
    language: Language,
    executor: Executor<T>,
}

impl<T> fmt::Debug for MarketClient<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MarketClient")
            .field("product", &self.product)
            .field("base_url", &self.base_url)
            .field("language", &self.language)
            .finish_non_exhaustive()
    }
}

impl MarketClient<UreqTransport> {
    /// Connect with the default transport, serialized on the process-wide gate.
    pub fn connect(config: ClientConfig) -> Result<Self, ApiError> {
        Self::with_gate(config, UreqTransport::new(), SerialGate::global())
    }

    pub fn dota2(key: &str) -> Result<Self, ApiError> {
        Self::connect(ClientConfig::new(key, ProductLine::Dota2))
    }

    pub fn csgo(key: &str) -> Result<Self, ApiError> {
        Self::connect(ClientConfig::new(key, ProductLine::Csgo))
    }

    pub fn tf2(key: &str) -> Result<Self, ApiError> {
        Self::connect(ClientConfig::new(key, ProductLine::Tf2))
    }

    pub fn gifts(key: &str) -> Result<Self, ApiError> {
        Self::connect(ClientConfig::new(key, ProductLine::Gifts))
    }
}

impl<T: Transport> MarketClient<T> {
    /// Connect through `transport`, serializing requests on `gate`.
    ///
    /// Fails if the `Test` probe fails.
    pub fn with_gate(config: ClientConfig, transport: T, gate: SerialGate) -> Result<Self, ApiError> {
        let client = Self {
            base_url: config.resolved_base_url(),
            key: config.key,
            product: config.product,
            language: config.language,
            executor: Executor::new(transport, gate),
        };
        client.test()?;
        debug!(product = %client.product, base_url = %client.base_url, "marketplace client ready");
        Ok(client)
    }

    pub fn product(&self) -> ProductLine {
        self.product
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn transport(&self) -> &T {
        self.executor.transport()
    }

    /// Full URL of `endpoint` for this client.
    pub fn url(&self, endpoint: &Endpoint<'_>) -> String {
        endpoint.url(&UrlContext {
            base_url: &self.base_url,
            key: &self.key,
            language: self.language,
            app_code: self.product.app_code(),
        })
    }

    fn fetch(&self, endpoint: Endpoint<'_>) -> Result<Vec<u8>, ApiError> {
        debug!(endpoint = endpoint.name(), product = %self.product, "marketplace request");
        self.executor.get(&self.url(&endpoint))
    }

    fn call<R: DeserializeOwned>(&self, endpoint: Endpoint<'_>) -> Result<R, ApiError> {
        let body = self.fetch(endpoint)?;
        serde_json::from_slice(&body).map_err(|e| ApiError::Deserialization(e.to_string()))
    }

    /// Self-test: key validity and account status.
    pub fn test(&self) -> Result<TestResponse, ApiError> {
        self.call(Endpoint::Test)
    }

    /// Pointer to the current bulk price database.
    pub fn item_db_current(&self) -> Result<ItemDbCurrent, ApiError> {
        self.call(Endpoint::ItemDbCurrent)
    }

    /// Download and parse the price database named `name`.
    pub fn item_db(&self, name: &str) -> Result<Vec<PriceRecord>, ApiError> {
        let body = self.fetch(Endpoint::ItemDb { name })?;
        parse_price_feed(self.product, &body)
    }

    /// Description and sell offers of one item kind.
    pub fn item_info(&self, class_id: &str, instance_id: &str) -> Result<ItemInfo, ApiError> {
        self.call(Endpoint::ItemInfo { class_id, instance_id })
    }

    /// Price statistics and the last sales of one item kind.
    pub fn item_history(&self, class_id: &str, instance_id: &str) -> Result<ItemHistory, ApiError> {
        self.call(Endpoint::ItemHistory { class_id, instance_id })
    }

    pub fn market_trades(&self) -> Result<MarketTrades, ApiError> {
        self.call(Endpoint::MarketTrades)
    }

    /// Items on the "my items" page.
    pub fn trades(&self) -> Result<Vec<Trade>, ApiError> {
        self.call(Endpoint::Trades)
    }

    /// Buy one item kind at up to `price` minor units.
    ///
    /// `hash` pins the exact item description (see `ItemInfo::hash`); pass an
    /// empty string to skip the check. A response without an item id is a
    /// failure carrying the marketplace's result text.
    pub fn buy(&self, class_id: &str, instance_id: &str, price: i64, hash: &str) -> Result<BuyResponse, ApiError> {
        let response: BuyResponse = self.call(Endpoint::Buy {
            class_id,
            instance_id,
            price,
            hash,
        })?;
        if response.id.is_empty() {
            return Err(ApiError::Purchase(response.result));
        }
        Ok(response)
    }

    /// Put an inventory item up for sale.
    pub fn set_price_new(&self, class_id: &str, instance_id: &str, price: i64) -> Result<SetPriceResponse, ApiError> {
        check_price(price)?;
        self.call(Endpoint::SetPriceNew {
            class_id,
            instance_id,
            price,
        })
    }

    /// Change the price of an item already on sale.
    pub fn set_price(&self, item_id: &str, price: i64) -> Result<SetPriceResponse, ApiError> {
        check_price(price)?;
        self.call(Endpoint::SetPrice { item_id, price })
    }

    /// Withdraw every item from sale.
    pub fn remove_all(&self) -> Result<RemoveAllResponse, ApiError> {
        self.call(Endpoint::RemoveAll)
    }

    /// Keep the account online for selling.
    pub fn ping_pong(&self) -> Result<PingPong, ApiError> {
        self.call(Endpoint::PingPong)
    }

    /// Ask a market bot for a trade offer.
    pub fn item_request(&self, direction: RequestDirection, bot_id: &str) -> Result<ItemRequestResponse, ApiError> {
        self.call(Endpoint::ItemRequest { direction, bot_id })
    }

    /// Account operations between two unix timestamps.
    pub fn operation_history(&self, start: i64, end: i64) -> Result<OperationHistory, ApiError> {
        self.call(Endpoint::OperationHistory { start, end })
    }

    pub fn get_money(&self) -> Result<Money, ApiError> {
        self.call(Endpoint::GetMoney)
    }

    pub fn inventory_status(&self) -> Result<InventoryStatus, ApiError> {
        self.call(Endpoint::InventoryStatus)
    }

    pub fn update_inventory(&self) -> Result<SuccessResponse, ApiError> {
        self.call(Endpoint::UpdateInventory)
    }

    /// Trade token currently registered for the account.
    pub fn get_token(&self) -> Result<TokenResponse, ApiError> {
        self.call(Endpoint::GetToken)
    }

    pub fn set_token(&self, token: &str) -> Result<SuccessResponse, ApiError> {
        self.call(Endpoint::SetToken { token })
    }

    /// Items available for instant purchase.
    pub fn quick_items(&self) -> Result<QuickItems, ApiError> {
        self.call(Endpoint::QuickItems)
    }

    /// Instantly buy an item from `quick_items` at its listed price.
    pub fn quick_buy(&self, ui_id: &str) -> Result<SuccessResponse, ApiError> {
        self.call(Endpoint::QuickBuy { ui_id })
    }

    /// Standing buy orders.
    pub fn get_orders(&self) -> Result<Orders, ApiError> {
        self.call(Endpoint::GetOrders)
    }

    pub fn insert_order(&self, class_id: &str, instance_id: &str, price: i64, hash: &str) -> Result<SuccessResponse, ApiError> {
        self.call(Endpoint::InsertOrder {
            class_id,
            instance_id,
            price,
            hash,
        })
    }

    /// Change a buy order's price; a price of 0 deletes the order.
    pub fn update_order(&self, class_id: &str, instance_id: &str, price: i64) -> Result<SuccessResponse, ApiError> {
        self.call(Endpoint::UpdateOrder {
            class_id,
            instance_id,
            price,
        })
    }

    pub fn delete_orders(&self) -> Result<DeleteOrdersResponse, ApiError> {
        self.call(Endpoint::DeleteOrders)
    }

    /// Price alerts currently enabled.
    pub fn get_notifications(&self) -> Result<Notifications, ApiError> {
        self.call(Endpoint::GetNotifications)
    }

    /// Change a price alert's threshold; a price of 0 deletes the alert.
    pub fn update_notification(&self, class_id: &str, instance_id: &str, price: i64) -> Result<SuccessResponse, ApiError> {
        self.call(Endpoint::UpdateNotification {
            class_id,
            instance_id,
            price,
        })
    }

    /// Key for subscribing to private websocket notifications.
    pub fn get_ws_auth(&self) -> Result<WsAuth, ApiError> {
        self.call(Endpoint::GetWsAuth)
    }
}

fn check_price(price: i64) -> Result<(), ApiError> {
    if price < MIN_PRICE {
        return Err(ApiError::MinAmount);
    }
    Ok(())
}
