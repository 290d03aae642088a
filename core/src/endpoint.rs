//! URL templates for every marketplace operation.
//!
//! All parameters, the access key included, travel in the path or query
//! string. Building a URL never touches the network, so these are tested as
//! plain strings.

use std::fmt;

use crate::config::Language;

/// Direction of an item transfer with a market bot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestDirection {
    /// Hand an item you sold to the bot.
    In,
    /// Collect an item you bought from the bot.
    Out,
}

impl RequestDirection {
    pub fn as_str(self) -> &'static str {
        match self {
            RequestDirection::In => "in",
            RequestDirection::Out => "out",
        }
    }
}

/// One marketplace operation with its call-specific parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint<'a> {
    Test,
    ItemDbCurrent,
    ItemDb { name: &'a str },
    ItemInfo { class_id: &'a str, instance_id: &'a str },
    ItemHistory { class_id: &'a str, instance_id: &'a str },
    MarketTrades,
    Trades,
    Buy { class_id: &'a str, instance_id: &'a str, price: i64, hash: &'a str },
    SetPriceNew { class_id: &'a str, instance_id: &'a str, price: i64 },
    SetPrice { item_id: &'a str, price: i64 },
    RemoveAll,
    PingPong,
    ItemRequest { direction: RequestDirection, bot_id: &'a str },
    OperationHistory { start: i64, end: i64 },
    GetMoney,
    InventoryStatus,
    UpdateInventory,
    GetToken,
    SetToken { token: &'a str },
    QuickItems,
    QuickBuy { ui_id: &'a str },
    GetOrders,
    InsertOrder { class_id: &'a str, instance_id: &'a str, price: i64, hash: &'a str },
    UpdateOrder { class_id: &'a str, instance_id: &'a str, price: i64 },
    DeleteOrders,
    GetNotifications,
    UpdateNotification { class_id: &'a str, instance_id: &'a str, price: i64 },
    GetWsAuth,
}

/// What a client contributes to every URL.
#[derive(Debug, Clone, Copy)]
pub struct UrlContext<'a> {
    pub base_url: &'a str,
    pub key: &'a str,
    pub language: Language,
    pub app_code: &'a str,
}

impl Endpoint<'_> {
    /// Upstream operation name, used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            Endpoint::Test => "Test",
            Endpoint::ItemDbCurrent => "ItemDBCurrent",
            Endpoint::ItemDb { .. } => "ItemDB",
            Endpoint::ItemInfo { .. } => "ItemInfo",
            Endpoint::ItemHistory { .. } => "ItemHistory",
            Endpoint::MarketTrades => "MarketTrades",
            Endpoint::Trades => "Trades",
            Endpoint::Buy { .. } => "Buy",
            Endpoint::SetPriceNew { .. } | Endpoint::SetPrice { .. } => "SetPrice",
            Endpoint::RemoveAll => "RemoveAll",
            Endpoint::PingPong => "PingPong",
            Endpoint::ItemRequest { .. } => "ItemRequest",
            Endpoint::OperationHistory { .. } => "OperationHistory",
            Endpoint::GetMoney => "GetMoney",
            Endpoint::InventoryStatus => "InventoryStatus",
            Endpoint::UpdateInventory => "UpdateInventory",
            Endpoint::GetToken => "GetToken",
            Endpoint::SetToken { .. } => "SetToken",
            Endpoint::QuickItems => "QuickItems",
            Endpoint::QuickBuy { .. } => "QuickBuy",
            Endpoint::GetOrders => "GetOrders",
            Endpoint::InsertOrder { .. } => "InsertOrder",
            Endpoint::UpdateOrder { .. } => "UpdateOrder",
            Endpoint::DeleteOrders => "DeleteOrders",
            Endpoint::GetNotifications => "GetNotifications",
            Endpoint::UpdateNotification { .. } => "UpdateNotification",
            Endpoint::GetWsAuth => "GetWSAuth",
        }
    }

    /// Full request URL.
    pub fn url(&self, ctx: &UrlContext<'_>) -> String {
        let base = ctx.base_url;
        match self {
            // The item database is public and takes no key.
            Endpoint::ItemDbCurrent => format!("{base}/itemdb/current_{}.json", ctx.app_code),
            Endpoint::ItemDb { name } => format!("{base}/itemdb/{name}"),
            _ => format!("{base}/api/{}/?key={}", ApiPath(self, ctx.language), ctx.key),
        }
    }
}

/// The part of an `/api/` URL between `/api/` and `/?key=`.
struct ApiPath<'e, 'a>(&'e Endpoint<'a>, Language);

impl fmt::Display for ApiPath<'_, '_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ApiPath(endpoint, language) = self;
        let name = endpoint.name();
        match endpoint {
            Endpoint::ItemInfo { class_id, instance_id } => {
                write!(f, "{name}/{class_id}_{instance_id}/{language}")
            }
            Endpoint::ItemHistory { class_id, instance_id } => {
                write!(f, "{name}/{class_id}_{instance_id}")
            }
            Endpoint::Buy { class_id, instance_id, price, hash } => {
                write!(f, "{name}/{class_id}_{instance_id}/{price}/{hash}")
            }
            Endpoint::SetPriceNew { class_id, instance_id, price } => {
                write!(f, "{name}/new_{class_id}_{instance_id}/{price}")
            }
            Endpoint::SetPrice { item_id, price } => write!(f, "{name}/{item_id}/{price}"),
            Endpoint::ItemRequest { direction, bot_id } => {
                write!(f, "{name}/{}/{bot_id}", direction.as_str())
            }
            Endpoint::OperationHistory { start, end } => write!(f, "{name}/{start}/{end}"),
            Endpoint::SetToken { token } => write!(f, "{name}/{token}"),
            Endpoint::QuickBuy { ui_id } => write!(f, "{name}/{ui_id}"),
            Endpoint::InsertOrder { class_id, instance_id, price, hash } => {
                write!(f, "{name}/{class_id}/{instance_id}/{price}/{hash}")
            }
            Endpoint::UpdateOrder { class_id, instance_id, price }
            | Endpoint::UpdateNotification { class_id, instance_id, price } => {
                write!(f, "{name}/{class_id}/{instance_id}/{price}")
            }
            _ => f.write_str(name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx() -> UrlContext<'static> {
        UrlContext {
            base_url: "https://market.csgo.com",
            key: "KEY",
            language: Language::Ru,
            app_code: "730",
        }
    }

    #[test]
    fn keyless_item_database_urls() {
        assert_eq!(
            Endpoint::ItemDbCurrent.url(&ctx()),
            "https://market.csgo.com/itemdb/current_730.json"
        );
        assert_eq!(
            Endpoint::ItemDb { name: "db_730.csv" }.url(&ctx()),
            "https://market.csgo.com/itemdb/db_730.csv"
        );
    }

    #[test]
    fn simple_operations_carry_only_the_key() {
        assert_eq!(Endpoint::Test.url(&ctx()), "https://market.csgo.com/api/Test/?key=KEY");
        assert_eq!(
            Endpoint::GetWsAuth.url(&ctx()),
            "https://market.csgo.com/api/GetWSAuth/?key=KEY"
        );
        assert_eq!(
            Endpoint::DeleteOrders.url(&ctx()),
            "https://market.csgo.com/api/DeleteOrders/?key=KEY"
        );
    }

    #[test]
    fn item_info_includes_language() {
        let endpoint = Endpoint::ItemInfo { class_id: "57939770", instance_id: "57939888" };
        assert_eq!(
            endpoint.url(&ctx()),
            "https://market.csgo.com/api/ItemInfo/57939770_57939888/ru/?key=KEY"
        );
        let en = UrlContext { language: Language::En, ..ctx() };
        assert!(endpoint.url(&en).contains("/57939770_57939888/en/"));
    }

    #[test]
    fn purchase_and_price_urls() {
        let buy = Endpoint::Buy { class_id: "1", instance_id: "2", price: 150, hash: "abc" };
        assert_eq!(buy.url(&ctx()), "https://market.csgo.com/api/Buy/1_2/150/abc/?key=KEY");

        let set_new = Endpoint::SetPriceNew { class_id: "1", instance_id: "2", price: 300 };
        assert_eq!(set_new.url(&ctx()), "https://market.csgo.com/api/SetPrice/new_1_2/300/?key=KEY");

        let set = Endpoint::SetPrice { item_id: "99", price: 100 };
        assert_eq!(set.url(&ctx()), "https://market.csgo.com/api/SetPrice/99/100/?key=KEY");
    }

    #[test]
    fn empty_hash_leaves_empty_segment() {
        let buy = Endpoint::Buy { class_id: "1", instance_id: "2", price: 150, hash: "" };
        assert_eq!(buy.url(&ctx()), "https://market.csgo.com/api/Buy/1_2/150//?key=KEY");
    }

    #[test]
    fn order_and_notification_urls_use_slash_separated_ids() {
        let insert = Endpoint::InsertOrder { class_id: "1", instance_id: "2", price: 500, hash: "h" };
        assert_eq!(insert.url(&ctx()), "https://market.csgo.com/api/InsertOrder/1/2/500/h/?key=KEY");

        let update = Endpoint::UpdateOrder { class_id: "1", instance_id: "2", price: 0 };
        assert_eq!(update.url(&ctx()), "https://market.csgo.com/api/UpdateOrder/1/2/0/?key=KEY");

        let notify = Endpoint::UpdateNotification { class_id: "1", instance_id: "2", price: 90 };
        assert_eq!(
            notify.url(&ctx()),
            "https://market.csgo.com/api/UpdateNotification/1/2/90/?key=KEY"
        );
    }

    #[test]
    fn item_request_and_history() {
        let request = Endpoint::ItemRequest { direction: RequestDirection::Out, bot_id: "12" };
        assert_eq!(request.url(&ctx()), "https://market.csgo.com/api/ItemRequest/out/12/?key=KEY");

        let history = Endpoint::OperationHistory { start: 1500000000, end: 1500003600 };
        assert_eq!(
            history.url(&ctx()),
            "https://market.csgo.com/api/OperationHistory/1500000000/1500003600/?key=KEY"
        );
    }
}
