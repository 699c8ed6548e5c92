// ============================================================================
// Querier
// Read-only routes over orders and order walls, answered as JSON
// ============================================================================

use super::Keeper;
use crate::domain::{DenomPair, OrderId};
use crate::errors::{EngineError, EngineResult};
use crate::store::KvRead;
use serde::Serialize;

pub const QUERY_ORDER: &str = "order";
pub const QUERY_ORDER_WALL: &str = "orderwall";

/// Answer a query path.
///
/// - `order/{id}` → the order, or `OrderNotFound` / `InvalidOrderId`
/// - `orderwall/{sell}|{buy}` → resting orders of that pair, best first
pub fn query<S: KvRead + ?Sized>(keeper: &Keeper<'_, S>, path: &str) -> EngineResult<String> {
    let (route, rest) = path.split_once('/').unwrap_or((path, ""));

    match route {
        QUERY_ORDER => query_order(keeper, rest),
        QUERY_ORDER_WALL => query_order_wall(keeper, rest),
        _ => Err(EngineError::UnknownRequest(format!(
            "unknown orderbook query endpoint: {}",
            path
        ))),
    }
}

fn query_order<S: KvRead + ?Sized>(keeper: &Keeper<'_, S>, id: &str) -> EngineResult<String> {
    let id: OrderId = id.parse()?;
    let order = keeper
        .get_order(id)?
        .ok_or(EngineError::OrderNotFound { order_id: id.value() })?;
    to_json(&order)
}

fn query_order_wall<S: KvRead + ?Sized>(keeper: &Keeper<'_, S>, pair: &str) -> EngineResult<String> {
    let pair: DenomPair = pair.parse()?;
    to_json(&keeper.order_wall(&pair)?)
}

fn to_json<T: Serialize>(value: &T) -> EngineResult<String> {
    serde_json::to_string_pretty(value).map_err(|e| EngineError::Serialization(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Order;
    use crate::engine::keeper::test_support::order;
    use crate::store::{KeyLayout, MemStore};

    #[test]
    fn test_query_order() {
        let store = MemStore::new();
        let keys = KeyLayout::new("dex");
        let mut keeper = Keeper::new(&store, &keys);
        let o = order(1, "alice", ("BTC", 10), "20", "ETH");
        keeper.add_new_order(o.clone()).unwrap();

        let json = query(&keeper, "order/1").unwrap();
        let parsed: Order = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, o);
        assert!(json.contains('\n'));
    }

    #[test]
    fn test_query_order_errors() {
        let store = MemStore::new();
        let keys = KeyLayout::new("dex");
        let keeper = Keeper::new(&store, &keys);

        assert_eq!(
            query(&keeper, "order/9"),
            Err(EngineError::OrderNotFound { order_id: 9 })
        );
        assert!(matches!(
            query(&keeper, "order/nine"),
            Err(EngineError::InvalidOrderId(_))
        ));
        assert!(matches!(
            query(&keeper, "order/-3"),
            Err(EngineError::InvalidOrderId(_))
        ));
    }

    #[test]
    fn test_query_order_wall() {
        let store = MemStore::new();
        let keys = KeyLayout::new("dex");
        let mut keeper = Keeper::new(&store, &keys);
        let cheap = order(1, "a", ("BTC", 1), "1", "ETH");
        let pricey = order(2, "b", ("BTC", 1), "3", "ETH");
        keeper.add_new_order(pricey.clone()).unwrap();
        keeper.add_new_order(cheap.clone()).unwrap();

        let json = query(&keeper, "orderwall/BTC|ETH").unwrap();
        let wall: Vec<Order> = serde_json::from_str(&json).unwrap();
        assert_eq!(wall, vec![cheap, pricey]);

        let empty: Vec<Order> =
            serde_json::from_str(&query(&keeper, "orderwall/ETH|BTC").unwrap()).unwrap();
        assert!(empty.is_empty());
    }

    #[test]
    fn test_query_bad_routes() {
        let store = MemStore::new();
        let keys = KeyLayout::new("dex");
        let keeper = Keeper::new(&store, &keys);

        assert!(matches!(
            query(&keeper, "orderwall/BTC"),
            Err(EngineError::InvalidDenomPair(_))
        ));
        assert!(matches!(
            query(&keeper, "balances/alice"),
            Err(EngineError::UnknownRequest(_))
        ));
        assert!(matches!(query(&keeper, ""), Err(EngineError::UnknownRequest(_))));
    }
}
