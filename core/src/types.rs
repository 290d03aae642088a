//! Response DTOs for the marketplace API.
//!
//! # Design
//! Field names mirror the upstream JSON. Every struct defaults missing
//! fields, since the marketplace omits keys freely between product lines;
//! a field of the wrong JSON type is still a deserialization error, except on
//! the fields marked `lenient`. Those drive control flow (the purchase id, the
//! construction probe) and fall back to their default when upstream drifts.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Description {
    #[serde(rename = "type")]
    pub kind: String,
    pub value: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tag {
    pub internal_name: String,
    pub name: String,
    pub category: String,
    pub color: String,
    pub category_name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Offer {
    pub price: String,
    pub count: String,
    pub my_count: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuyOffer {
    pub o_price: String,
    pub c: String,
    pub my_count: String,
}

/// Description and current offers of one item kind.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ItemInfo {
    #[serde(rename = "classid")]
    pub class_id: String,
    #[serde(rename = "instanceid")]
    pub instance_id: String,
    #[serde(rename = "our_market_instanceid")]
    pub our_market_instance_id: String,
    pub market_name: String,
    pub name: String,
    pub market_hash_name: String,
    pub rarity: String,
    pub quality: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub mtype: String,
    pub slot: String,
    pub description: Vec<Description>,
    pub tags: Vec<Tag>,
    /// MD5 of the item description; pass it to `buy` to pin the exact item.
    pub hash: String,
    pub min_price: String,
    pub offers: Vec<Offer>,
    pub buy_offers: Vec<BuyOffer>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryEntry {
    pub l_price: String,
    pub l_time: String,
}

/// Price statistics and the last sales of one item kind.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ItemHistory {
    pub success: bool,
    pub max: i64,
    pub min: i64,
    pub average: i64,
    pub number: i64,
    pub history: Vec<HistoryEntry>,
}

/// Trades the market bots have sent and which are still active.
///
/// The shape is not stable upstream, so it is kept as raw JSON.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MarketTrades(pub Value);

/// One entry of the "my items" page.
///
/// `ui_status`: 1 on sale, 2 sold and awaiting hand-over to the bot,
/// 3 bought and awaiting the seller, 4 ready to collect.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Trade {
    pub ui_id: String,
    pub i_name: String,
    pub i_market_name: String,
    pub i_name_color: String,
    pub i_rarity: String,
    pub i_descriptions: String,
    pub ui_status: String,
    pub he_name: String,
    pub ui_price: f64,
    #[serde(rename = "i_classid")]
    pub i_class_id: String,
    #[serde(rename = "i_instanceid")]
    pub i_instance_id: String,
    pub ui_real_instance: String,
    pub i_quality: String,
    pub i_market_hash_name: String,
    pub i_market_price: f64,
    pub position: i64,
    pub min_price: f64,
    pub ui_bid: String,
    pub ui_asset: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub ui_price_text: String,
    pub min_price_text: bool,
    pub i_market_price_text: String,
    pub offer_live_time: i64,
    pub placed: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuyResponse {
    #[serde(deserialize_with = "lenient")]
    pub result: String,
    /// Empty when nothing was bought; upstream sometimes sends `false`.
    #[serde(deserialize_with = "lenient")]
    pub id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SetPriceResponse {
    pub result: i64,
    pub item_id: i64,
    pub price: f64,
    pub price_text: String,
    pub status: String,
    pub position: i64,
    pub success: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoveAllResponse {
    pub num_deleted_items: i64,
    pub success: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PingPong {
    pub ping: String,
    pub success: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ItemRequestResponse {
    pub success: bool,
    pub trade: String,
    pub nick: String,
    #[serde(rename = "botid")]
    pub bot_id: i64,
    pub profile: String,
    pub secret: String,
    pub items: Value,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Operation {
    pub h_id: String,
    pub h_event: String,
    pub h_time: String,
    pub h_event_id: String,
    pub join: i64,
    pub app: String,
    pub id: String,
    #[serde(rename = "classid")]
    pub class_id: String,
    #[serde(rename = "instanceid")]
    pub instance_id: String,
    pub quality: String,
    pub name_color: String,
    pub market_name: String,
    pub market_hash_name: String,
    pub paid: String,
    /// Spelled this way upstream.
    #[serde(rename = "recieved")]
    pub received: String,
    pub stage: String,
    pub item: String,
    pub flags: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OperationHistory {
    pub success: bool,
    pub history: Vec<Operation>,
}

/// Account balance in minor units.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Money {
    pub money: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AccountStatus {
    #[serde(deserialize_with = "lenient")]
    pub user_token: bool,
    #[serde(deserialize_with = "lenient")]
    pub trade_check: bool,
    #[serde(deserialize_with = "lenient")]
    pub site_online: bool,
    #[serde(deserialize_with = "lenient")]
    pub site_notmpban: bool,
}

/// Result of the self-test probe.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TestResponse {
    #[serde(deserialize_with = "lenient")]
    pub success: bool,
    #[serde(deserialize_with = "lenient")]
    pub status: AccountStatus,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InventoryStatus {
    pub success: bool,
    pub i_status: String,
    pub i_time: String,
}

/// Response of operations that only report success.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SuccessResponse {
    pub success: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TokenResponse {
    pub success: bool,
    pub token: String,
}

/// An item offered for instant purchase.
///
/// Upstream sends `i_descriptions` and `i_tags` as JSON documents encoded in
/// strings; they are decoded into structured form here. Undecodable text
/// yields an empty list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuickItem {
    pub ui_id: String,
    pub l_paid: String,
    #[serde(rename = "i_classid")]
    pub i_class_id: String,
    #[serde(rename = "i_instanceid")]
    pub i_instance_id: String,
    pub i_market_hash_name: String,
    pub i_rarity: String,
    pub i_market_name: String,
    pub i_name: String,
    pub i_quality: String,
    pub i_name_color: String,
    pub he_name: String,
    #[serde(deserialize_with = "double_encoded")]
    pub i_descriptions: Vec<Description>,
    #[serde(deserialize_with = "double_encoded")]
    pub i_tags: Vec<Tag>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuickItems {
    pub success: bool,
    pub items: Vec<QuickItem>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Order {
    #[serde(rename = "i_classid")]
    pub i_class_id: String,
    #[serde(rename = "i_instanceid")]
    pub i_instance_id: String,
    pub i_market_hash_name: String,
    pub i_market_name: String,
    pub o_price: String,
    pub o_state: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Orders {
    pub success: bool,
    #[serde(rename = "Orders", alias = "orders", deserialize_with = "list_or_false")]
    pub orders: Vec<Order>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeleteOrdersResponse {
    pub success: bool,
    pub deleted_orders: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Notification {
    #[serde(rename = "i_classid")]
    pub i_class_id: String,
    #[serde(rename = "i_instanceid")]
    pub i_instance_id: String,
    pub i_market_hash_name: String,
    pub i_market_name: String,
    pub n_val: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Notifications {
    pub success: bool,
    #[serde(rename = "Notifications", alias = "notifications", deserialize_with = "list_or_false")]
    pub notifications: Vec<Notification>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WsAuth {
    #[serde(rename = "wsAuth")]
    pub ws_auth: String,
    pub success: bool,
}

/// Pointer to the current bulk price database.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ItemDbCurrent {
    pub time: i64,
    /// File name to pass to `item_db`.
    pub db: String,
}

/// Decode a list that upstream may send as a JSON string, or already as a list.
fn double_encoded<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: serde::de::DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    let decoded = match value {
        Value::String(text) => serde_json::from_str(&text).ok(),
        Value::Array(_) => serde_json::from_value(value).ok(),
        _ => None,
    };
    Ok(decoded.unwrap_or_default())
}

/// Decode `T`, or fall back to its default when the value has another shape.
fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: serde::de::DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).unwrap_or_default())
}

/// Upstream sends `false` instead of an empty list when nothing is set.
fn list_or_false<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum ListOrFlag<T> {
        List(Vec<T>),
        Flag(bool),
        Null(()),
    }

    Ok(match ListOrFlag::deserialize(deserializer)? {
        ListOrFlag::List(items) => items,
        ListOrFlag::Flag(_) | ListOrFlag::Null(()) => Vec::new(),
    })
}
