// ============================================================================
// Basic Usage Example
// ============================================================================

use chrono::{TimeZone, Utc};
use orderwall_engine::prelude::*;
use rust_decimal::Decimal;
use std::sync::Arc;

fn main() -> EngineResult<()> {
    #[cfg(feature = "logging")]
    orderwall_engine::utils::init_logging(tracing::Level::DEBUG)?;

    println!("=== Order Wall Engine Example ===\n");

    let ledger = InMemoryLedger::new()
        .with_balance("seller_0", Amount::new("BTC", 5))
        .with_balance("seller_1", Amount::new("BTC", 5))
        .with_balance("seller_2", Amount::new("BTC", 5))
        .with_balance("buyer", Amount::new("USD", 1_000_000));
    let events = Arc::new(RecordingEventHandler::new());

    let mut engine = MatchingEngineBuilder::new("orderbook")
        .allowed_units(["BTC", "USD"])
        .with_ledger(ledger)
        .with_event_handler(Arc::clone(&events) as Arc<dyn EventHandler>)
        .build()?;

    println!("Created matching engine in namespace {:?}\n", engine.config().namespace);

    // Asks: BTC priced in USD per BTC
    println!("Adding sell orders...");
    let expiry = Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).unwrap();
    for (i, ratio) in [50_000, 50_100, 50_200].into_iter().enumerate() {
        let owner = format!("seller_{}", i);
        let expiration = (i == 2).then_some(expiry);
        engine.submit(MsgMakeOrder::new(
            owner.as_str(),
            Amount::new("BTC", 5),
            Price::from_decimal(Decimal::from(ratio), "USD", "BTC")?,
            expiration,
        ))?;
    }

    println!("\n=== BTC|USD Order Wall ===");
    for order in engine.get_order_wall(&DenomPair::new("BTC", "USD"))? {
        println!(
            "  #{} {} @ {} USD/BTC",
            order.id,
            order.sell_amount,
            order.price.to_decimal()?.normalize()
        );
    }

    // Bid: USD priced in BTC per USD; 1/50000 crosses every ask
    println!("\n=== Submitting Crossing Order ===");
    let execution = engine.submit(MsgMakeOrder::new(
        "buyer",
        Amount::new("USD", 400_000),
        Price::from_decimal(Decimal::new(2, 5), "BTC", "USD")?,
        None,
    ))?;

    println!("\nFills:");
    for fill in &execution.fills {
        println!(
            "  maker #{} paid {} to taker, received {}",
            fill.maker_order_id, fill.paid_to_taker, fill.paid_to_maker
        );
    }
    println!("Consumed: {}", execution.consumed);

    println!("\nEvents generated:");
    for event in events.take() {
        match event {
            OrderEvent::OrderFilled { order_id } => println!("  Order {} filled", order_id),
            OrderEvent::OrderAddedToWall { order_id, pair, quantity, .. } => {
                println!("  Order {} rests in {} with {}", order_id, pair, quantity)
            },
            _ => {},
        }
    }

    // Expire what is left of the last ask
    println!("\n=== Expiry Sweep ===");
    for order in engine.sweep_expired(expiry)? {
        println!("  Order {} expired, refunded {}", order.id, order.sell_amount);
    }

    println!("\n=== Final State ===");
    println!("{}", engine.query("orderwall/BTC|USD")?);
    let ledger = engine.ledger();
    println!(
        "buyer holds {} BTC and {} USD",
        ledger.balance(&AccountId::new("buyer"), "BTC"),
        ledger.balance(&AccountId::new("buyer"), "USD")
    );

    Ok(())
}
