// ============================================================================
// Fill Domain Model
// ============================================================================

use super::{AccountId, Amount, OrderId};
use serde::{Deserialize, Serialize};

/// One crossing between an incoming (taker) order and a resting (maker)
/// order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fill {
    /// Order resting in the wall
    pub maker_order_id: OrderId,
    pub maker_owner: AccountId,

    /// Incoming order being executed
    pub taker_order_id: OrderId,
    pub taker_owner: AccountId,

    /// Taken from the maker's reserve, credited to the taker
    pub paid_to_taker: Amount,

    /// Taken from the taker's reserve, credited to the maker
    pub paid_to_maker: Amount,

    /// Whether the maker left the wall because of this fill
    pub maker_filled: bool,
}

impl Fill {
    /// Both ledger credits this fill produces, maker first.
    pub fn payouts(&self) -> [(AccountId, Amount); 2] {
        [
            (self.maker_owner.clone(), self.paid_to_maker.clone()),
            (self.taker_owner.clone(), self.paid_to_taker.clone()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fill_payouts() {
        let fill = Fill {
            maker_order_id: OrderId::new(1),
            maker_owner: AccountId::new("maker"),
            taker_order_id: OrderId::new(2),
            taker_owner: AccountId::new("taker"),
            paid_to_taker: Amount::new("BTC", 1),
            paid_to_maker: Amount::new("USD", 100),
            maker_filled: true,
        };

        let [maker, taker] = fill.payouts();
        assert_eq!(maker, (AccountId::new("maker"), Amount::new("USD", 100)));
        assert_eq!(taker, (AccountId::new("taker"), Amount::new("BTC", 1)));
    }
}
