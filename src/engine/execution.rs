// ============================================================================
// Order Execution
// Crosses an incoming order against the opposing order wall
// ============================================================================

use super::Keeper;
use crate::domain::{convert_amount, AccountId, Amount, Fill, Order, OrderId, Price};
use crate::errors::{EngineError, EngineResult};
use crate::numeric::NumericError;
use crate::store::KvRead;
use smallvec::SmallVec;

/// Result of running one incoming order through the opposing wall.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Execution {
    /// The incoming order with its final remaining amount
    pub remainder: Order,

    /// Nothing is left to rest
    pub consumed: bool,

    /// Crossings in the order they happened
    pub fills: SmallVec<[Fill; 4]>,
}

impl Execution {
    pub fn order_id(&self) -> OrderId {
        self.remainder.id
    }

    /// Every ledger credit produced by the fills, in fill order.
    pub fn payouts(&self) -> impl Iterator<Item = (AccountId, Amount)> + '_ {
        self.fills.iter().flat_map(Fill::payouts)
    }
}

impl<'a, S: KvRead + ?Sized> Keeper<'a, S> {
    /// Match `order` against the best orders of its reverse pair until it is
    /// used up, the wall is empty, or the best ask is above its price.
    ///
    /// `order` must already be stored: its primary record is updated or
    /// removed to reflect what is left.
    ///
    /// # Example
    /// ```text
    /// Wall BTC|ETH:  #1 sells 10 BTC @ 20 ETH/BTC
    ///
    /// Incoming #2 sells 100 ETH @ 0.05 BTC/ETH (ask = 1/20 = 0.05)
    /// bid at ask = 100 × 0.05 = 5 BTC < 10 BTC
    /// Result: #2 receives 5 BTC, #1 receives 100 ETH, #1 keeps 5 BTC
    /// ```
    pub fn execute_order_against_order_wall(&mut self, mut order: Order) -> EngineResult<Execution> {
        let opposing_pair = order.pair().reverse_pair();
        let mut fills = SmallVec::new();

        while order.sell_amount.is_positive() {
            let Some(best) = self.peek_order_wall_order(&opposing_pair)? else {
                break;
            };

            // What the incoming order pays per unit of the maker's sell leg
            let ask_price = best.price.reciprocal()?;
            if order.price.lt(&ask_price)? {
                break;
            }

            let bid_at_ask = convert_within_u64(&order.sell_amount, &ask_price)?
                .filter(|bid| bid.quantity < best.sell_amount.quantity);

            if let Some(execute_amount) = bid_at_ask {
                // Incoming order fully consumed, maker keeps the rest
                let maker_left = best.sell_amount.checked_sub(&execute_amount)?;
                self.decrease_order_bid_amount(best.id, maker_left)?;

                let paid_to_maker = order.sell_amount.clone();
                order.sell_amount = Amount::zero(order.sell_amount.unit.clone());
                self.remove_order(order.id)?;

                tracing::debug!(
                    maker = %best.id,
                    taker = %order.id,
                    paid_to_maker = %paid_to_maker,
                    paid_to_taker = %execute_amount,
                    "taker consumed"
                );

                fills.push(Fill {
                    maker_order_id: best.id,
                    maker_owner: best.owner,
                    taker_order_id: order.id,
                    taker_owner: order.owner.clone(),
                    paid_to_taker: execute_amount,
                    paid_to_maker,
                    maker_filled: false,
                });

                return Ok(Execution {
                    remainder: order,
                    consumed: true,
                    fills,
                });
            }

            // Maker fully filled
            let execute_amount =
                match convert_within_u64(&best.sell_amount, &ask_price.reciprocal()?)? {
                    Some(mut amount) => {
                        amount.quantity = amount.quantity.min(order.sell_amount.quantity);
                        amount
                    },
                    None => order.sell_amount.clone(),
                };

            order.sell_amount = order.sell_amount.checked_sub(&execute_amount)?;
            self.remove_order(best.id)?;

            tracing::debug!(
                maker = %best.id,
                taker = %order.id,
                paid_to_maker = %execute_amount,
                paid_to_taker = %best.sell_amount,
                "maker filled"
            );

            fills.push(Fill {
                maker_order_id: best.id,
                maker_owner: best.owner,
                taker_order_id: order.id,
                taker_owner: order.owner.clone(),
                paid_to_taker: best.sell_amount,
                paid_to_maker: execute_amount,
                maker_filled: true,
            });
        }

        self.decrease_order_bid_amount(order.id, order.sell_amount.clone())?;
        let consumed = order.sell_amount.is_zero();

        Ok(Execution {
            remainder: order,
            consumed,
            fills,
        })
    }
}

/// [`convert_amount`], with `None` for a product past `u64::MAX`.
///
/// Such a product exceeds every whole quantity, so callers treat it as
/// "more than enough".
fn convert_within_u64(amount: &Amount, price: &Price) -> EngineResult<Option<Amount>> {
    match convert_amount(amount, price) {
        Ok(converted) => Ok(Some(converted)),
        Err(EngineError::Numeric(NumericError::Overflow)) => Ok(None),
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DenomPair;
    use crate::engine::keeper::test_support::order;
    use crate::store::{KeyLayout, MemStore};

    fn rest(keeper: &mut Keeper<'_, MemStore>, o: Order) {
        let execution = keeper.add_new_order(o).unwrap();
        assert!(!execution.consumed);
        assert!(execution.fills.is_empty());
    }

    #[test]
    fn test_exact_fill_removes_both() {
        let store = MemStore::new();
        let keys = KeyLayout::new("dex");
        let mut keeper = Keeper::new(&store, &keys);
        rest(&mut keeper, order(1, "maker", ("BTC", 10), "20", "ETH"));

        let execution = keeper
            .add_new_order(order(2, "taker", ("ETH", 200), "0.05", "BTC"))
            .unwrap();

        assert!(execution.consumed);
        assert_eq!(execution.fills.len(), 1);
        let fill = &execution.fills[0];
        assert!(fill.maker_filled);
        assert_eq!(fill.paid_to_taker, Amount::new("BTC", 10));
        assert_eq!(fill.paid_to_maker, Amount::new("ETH", 200));

        assert_eq!(keeper.get_order(OrderId::new(1)).unwrap(), None);
        assert_eq!(keeper.get_order(OrderId::new(2)).unwrap(), None);
        assert!(keeper.order_wall(&DenomPair::new("BTC", "ETH")).unwrap().is_empty());
        assert!(keeper.order_wall(&DenomPair::new("ETH", "BTC")).unwrap().is_empty());
    }

    #[test]
    fn test_partial_fill_reduces_maker() {
        let store = MemStore::new();
        let keys = KeyLayout::new("dex");
        let mut keeper = Keeper::new(&store, &keys);
        rest(&mut keeper, order(1, "maker", ("BTC", 10), "20", "ETH"));

        let execution = keeper
            .add_new_order(order(2, "taker", ("ETH", 100), "0.05", "BTC"))
            .unwrap();

        assert!(execution.consumed);
        assert!(execution.remainder.sell_amount.is_zero());
        let fill = &execution.fills[0];
        assert!(!fill.maker_filled);
        assert_eq!(fill.paid_to_taker, Amount::new("BTC", 5));
        assert_eq!(fill.paid_to_maker, Amount::new("ETH", 100));

        let maker = keeper.get_order(OrderId::new(1)).unwrap().unwrap();
        assert_eq!(maker.sell_amount, Amount::new("BTC", 5));
        let wall = keeper.order_wall(&DenomPair::new("BTC", "ETH")).unwrap();
        assert_eq!(wall, vec![maker]);
        assert_eq!(keeper.get_order(OrderId::new(2)).unwrap(), None);
    }

    #[test]
    fn test_no_cross_rests_unchanged() {
        let store = MemStore::new();
        let keys = KeyLayout::new("dex");
        let mut keeper = Keeper::new(&store, &keys);
        rest(&mut keeper, order(1, "maker", ("BTC", 10), "20", "ETH"));

        let incoming = order(2, "taker", ("ETH", 100), "0.04", "BTC");
        let execution = keeper.add_new_order(incoming.clone()).unwrap();

        assert!(!execution.consumed);
        assert!(execution.fills.is_empty());
        assert_eq!(execution.remainder, incoming);
        assert_eq!(
            keeper.order_wall(&DenomPair::new("ETH", "BTC")).unwrap(),
            vec![incoming]
        );
        assert_eq!(
            keeper.get_order(OrderId::new(1)).unwrap().unwrap().sell_amount,
            Amount::new("BTC", 10)
        );
    }

    #[test]
    fn test_bid_past_u64_fills_maker() {
        let store = MemStore::new();
        let keys = KeyLayout::new("dex");
        let mut keeper = Keeper::new(&store, &keys);
        // Ask is 10^10 BTC/ETH, so the taker's bid is worth 2 * 10^19 BTC
        rest(
            &mut keeper,
            order(1, "maker", ("BTC", 30_000_000_000), "0.0000000001", "ETH"),
        );

        let execution = keeper
            .add_new_order(order(2, "taker", ("ETH", 2_000_000_000), "10000000000", "BTC"))
            .unwrap();

        assert!(!execution.consumed);
        assert_eq!(execution.fills.len(), 1);
        let fill = &execution.fills[0];
        assert!(fill.maker_filled);
        assert_eq!(fill.paid_to_taker, Amount::new("BTC", 30_000_000_000));
        assert_eq!(fill.paid_to_maker, Amount::new("ETH", 3));
        assert_eq!(
            execution.remainder.sell_amount,
            Amount::new("ETH", 1_999_999_997)
        );

        assert_eq!(keeper.get_order(OrderId::new(1)).unwrap(), None);
        assert!(keeper.order_wall(&DenomPair::new("BTC", "ETH")).unwrap().is_empty());
        assert_eq!(
            keeper.order_wall(&DenomPair::new("ETH", "BTC")).unwrap(),
            vec![execution.remainder.clone()]
        );
    }

    #[test]
    fn test_best_price_fills_first() {
        let store = MemStore::new();
        let keys = KeyLayout::new("dex");
        let mut keeper = Keeper::new(&store, &keys);
        rest(&mut keeper, order(1, "pricey", ("BTC", 10), "2", "ETH"));
        rest(&mut keeper, order(2, "cheap", ("BTC", 10), "1", "ETH"));

        let execution = keeper
            .add_new_order(order(3, "taker", ("ETH", 16), "1", "BTC"))
            .unwrap();

        assert!(execution.consumed);
        let makers: Vec<i64> = execution.fills.iter().map(|f| f.maker_order_id.value()).collect();
        assert_eq!(makers, vec![2, 1]);

        assert_eq!(execution.fills[0].paid_to_taker, Amount::new("BTC", 10));
        assert_eq!(execution.fills[0].paid_to_maker, Amount::new("ETH", 10));
        assert_eq!(execution.fills[1].paid_to_taker, Amount::new("BTC", 3));
        assert_eq!(execution.fills[1].paid_to_maker, Amount::new("ETH", 6));

        assert_eq!(keeper.get_order(OrderId::new(2)).unwrap(), None);
        assert_eq!(
            keeper.get_order(OrderId::new(1)).unwrap().unwrap().sell_amount,
            Amount::new("BTC", 7)
        );
    }

    #[test]
    fn test_equal_price_lower_id_first() {
        let store = MemStore::new();
        let keys = KeyLayout::new("dex");
        let mut keeper = Keeper::new(&store, &keys);
        rest(&mut keeper, order(1, "first", ("BTC", 5), "1", "ETH"));
        rest(&mut keeper, order(2, "second", ("BTC", 5), "1", "ETH"));

        let execution = keeper
            .add_new_order(order(3, "taker", ("ETH", 5), "1", "BTC"))
            .unwrap();

        assert!(execution.consumed);
        assert_eq!(execution.fills.len(), 1);
        assert_eq!(execution.fills[0].maker_order_id, OrderId::new(1));
        assert_eq!(keeper.get_order(OrderId::new(1)).unwrap(), None);
        assert!(keeper.get_order(OrderId::new(2)).unwrap().is_some());
    }

    #[test]
    fn test_remainder_rests_after_sweeping_wall() {
        let store = MemStore::new();
        let keys = KeyLayout::new("dex");
        let mut keeper = Keeper::new(&store, &keys);
        rest(&mut keeper, order(1, "maker", ("BTC", 4), "1", "ETH"));

        let execution = keeper
            .add_new_order(order(2, "taker", ("ETH", 10), "1", "BTC"))
            .unwrap();

        assert!(!execution.consumed);
        assert_eq!(execution.remainder.sell_amount, Amount::new("ETH", 6));
        assert_eq!(
            keeper.get_order(OrderId::new(2)).unwrap().unwrap().sell_amount,
            Amount::new("ETH", 6)
        );
        let wall = keeper.order_wall(&DenomPair::new("ETH", "BTC")).unwrap();
        assert_eq!(wall.len(), 1);
        assert_eq!(wall[0].id, OrderId::new(2));
    }

    #[test]
    fn test_payouts_follow_fills() {
        let store = MemStore::new();
        let keys = KeyLayout::new("dex");
        let mut keeper = Keeper::new(&store, &keys);
        rest(&mut keeper, order(1, "maker", ("BTC", 10), "20", "ETH"));

        let execution = keeper
            .add_new_order(order(2, "taker", ("ETH", 100), "0.05", "BTC"))
            .unwrap();
        let payouts: Vec<_> = execution.payouts().collect();
        assert_eq!(
            payouts,
            vec![
                (AccountId::new("maker"), Amount::new("ETH", 100)),
                (AccountId::new("taker"), Amount::new("BTC", 5)),
            ]
        );
        assert_eq!(execution.order_id(), OrderId::new(2));
    }
}
