use chrono::Utc;
use rust_decimal::Decimal;
use std::sync::Arc;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use shop_fulfillment::domain::catalog::{Dimensions, RegisterPricingGroup, RegisterProduct};
use shop_fulfillment::domain::customer::{RegisterAddress, RegisterCreditCard, RegisterCustomer};
use shop_fulfillment::domain::exchange::{ReceiveExchangeItems, RequestExchange};
use shop_fulfillment::domain::order::{Checkout, PaymentInstruction};
use shop_fulfillment::domain::stock::RecordStockEntry;
use shop_fulfillment::metrics::Metrics;
use shop_fulfillment::store::InMemoryStore;
use shop_fulfillment::{ShopConfig, ShopServices};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Default to INFO, debug for this crate; override with RUST_LOG
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_thread_ids(true))
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,shop_fulfillment=debug")),
        )
        .init();

    tracing::info!("🚀 Starting shop fulfillment demo");

    // === 1. Configuration, store, metrics ===
    let config = ShopConfig::from_env()?;
    tracing::info!(
        freight_rate_per_kg = %config.freight_rate_per_kg,
        coupon_days = config.exchange_coupon_validity_days,
        "⚙️ Configuration loaded"
    );

    let store = Arc::new(InMemoryStore::new());
    let metrics = Arc::new(Metrics::new()?);
    let shop = ShopServices::new(store.clone(), &config, Some(metrics.clone()));

    // === 2. Reference data ===
    let group = shop
        .catalog
        .register_pricing_group(RegisterPricingGroup {
            name: "Board games".into(),
            margin_percentage: Decimal::new(20, 0),
        })
        .await?;
    let product = shop
        .catalog
        .register_product(RegisterProduct {
            name: "Terra Mystica".into(),
            dimensions: Dimensions {
                height: Decimal::new(8, 0),
                width: Decimal::new(30, 0),
                depth: Decimal::new(30, 0),
            },
            weight: Decimal::new(20, 1),
            pricing_group_id: group.id,
        })
        .await?;
    let supplier = shop.stock.register_supplier("Meeple Distribution").await?;

    let customer = shop
        .customers
        .register_customer(RegisterCustomer {
            name: "Ana Lima".into(),
            email: "ana@example.com".into(),
        })
        .await?;
    let address = shop
        .customers
        .register_address(RegisterAddress {
            customer_id: Some(customer.id),
            street: "Rua das Flores, 42".into(),
            city: "Recife".into(),
            state: "PE".into(),
            postal_code: "50000-000".into(),
        })
        .await?;
    let card = shop
        .customers
        .register_credit_card(RegisterCreditCard {
            customer_id: customer.id,
            holder_name: "ANA LIMA".into(),
            card_number: "4111111111111111".into(),
            brand: "VISA".into(),
        })
        .await?;

    // === 3. Stock intake prices the product ===
    for cost in [Decimal::new(4000, 2), Decimal::new(4167, 2)] {
        shop.stock
            .record_entry(RecordStockEntry {
                product_id: product.id,
                supplier_id: supplier.id,
                quantity: 5,
                cost_value: cost,
                entry_date: Utc::now().date_naive(),
                is_reentry: false,
            })
            .await?;
    }

    // === 4. Cart → checkout → fulfillment ===
    shop.carts.add_item(customer.id, product.id, 3).await?;
    let order = shop
        .checkout
        .checkout(Checkout {
            customer_id: customer.id,
            delivery_address_id: address.id,
            payments: vec![PaymentInstruction::card(card.id, Decimal::new(100_000, 2))],
        })
        .await?;
    tracing::info!(
        subtotal = %order.subtotal,
        freight = %order.freight_cost,
        total = %order.total,
        "🧾 Order totals"
    );

    shop.orders.approve(order.id).await?;
    shop.orders.dispatch(order.id).await?;
    shop.orders.deliver(order.id).await?;

    // === 5. Exchange one unit and put it back on the shelf ===
    let item = &order.items[0];
    let exchange = shop
        .exchanges
        .request(RequestExchange {
            order_id: order.id,
            order_item_id: item.id,
            quantity: 1,
            reason: "Box arrived crushed".into(),
        })
        .await?;
    shop.exchanges.authorize(exchange.id).await?;
    let receipt = shop
        .exchanges
        .receive_items(ReceiveExchangeItems {
            exchange_id: exchange.id,
            return_to_stock: true,
            supplier_id: Some(supplier.id),
            cost_value: Some(item.unit_price),
        })
        .await?;
    tracing::info!(
        code = %receipt.coupon.code,
        value = %receipt.coupon.value,
        expires_at = %receipt.coupon.expires_at,
        "🎟️ Exchange coupon issued"
    );

    let order = shop.orders.order(order.id).await?;
    let product = shop.catalog.product(product.id).await?;
    tracing::info!(
        order_status = %order.status,
        stock_quantity = product.stock_quantity,
        sale_price = %product.sale_price,
        "🏁 Final state"
    );

    // === 6. Hand committed events to the audit collaborator ===
    for envelope in store.drain_outbox() {
        tracing::info!(
            sequence = envelope.sequence_number,
            aggregate = %envelope.aggregate_type,
            event_type = %envelope.event_type,
            "📨 Outbox event"
        );
    }

    println!("{}", metrics.render()?);
    tracing::info!("👋 Demo finished");
    Ok(())
}
