//! Property-based tests for stock and money conservation

use chrono::Utc;
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::sync::Arc;
use uuid::Uuid;

use shop_fulfillment::domain::catalog::{Dimensions, RegisterPricingGroup, RegisterProduct};
use shop_fulfillment::domain::customer::{RegisterAddress, RegisterCreditCard, RegisterCustomer};
use shop_fulfillment::domain::money::marked_up;
use shop_fulfillment::domain::order::{
    CardRequest, Checkout, CouponCredit, Order, PaymentAggregator, PaymentInstruction,
};
use shop_fulfillment::domain::stock::RecordStockEntry;
use shop_fulfillment::store::InMemoryStore;
use shop_fulfillment::{ShopConfig, ShopServices};

fn money(max_cents: i64) -> impl Strategy<Value = Decimal> {
    (1i64..=max_cents).prop_map(|cents| Decimal::new(cents, 2))
}

struct Fixture {
    shop: ShopServices<InMemoryStore>,
    supplier_id: Uuid,
    customer_id: Uuid,
    address_id: Uuid,
    card_id: Uuid,
}

impl Fixture {
    async fn new() -> Self {
        let store = Arc::new(InMemoryStore::new());
        let shop = ShopServices::new(store, &ShopConfig::default(), None);

        let supplier_id = shop.stock.register_supplier("Acme").await.unwrap().id;
        let customer_id = shop
            .customers
            .register_customer(RegisterCustomer {
                name: "Prop".into(),
                email: "prop@example.com".into(),
            })
            .await
            .unwrap()
            .id;
        let address_id = shop
            .customers
            .register_address(RegisterAddress {
                customer_id: Some(customer_id),
                street: "1 Test Rd".into(),
                city: "Testville".into(),
                state: "TS".into(),
                postal_code: "00000".into(),
            })
            .await
            .unwrap()
            .id;
        let card_id = shop
            .customers
            .register_credit_card(RegisterCreditCard {
                customer_id,
                holder_name: "PROP".into(),
                card_number: "4111111111111111".into(),
                brand: "VISA".into(),
            })
            .await
            .unwrap()
            .id;

        Self {
            shop,
            supplier_id,
            customer_id,
            address_id,
            card_id,
        }
    }

    async fn product(&self, margin: Decimal, weight: Decimal) -> Uuid {
        let group = self
            .shop
            .catalog
            .register_pricing_group(RegisterPricingGroup {
                name: "Props".into(),
                margin_percentage: margin,
            })
            .await
            .unwrap();
        self.shop
            .catalog
            .register_product(RegisterProduct {
                name: "Prop item".into(),
                dimensions: Dimensions::default(),
                weight,
                pricing_group_id: group.id,
            })
            .await
            .unwrap()
            .id
    }

    async fn record(&self, product_id: Uuid, quantity: i32, cost: Decimal) {
        self.shop
            .stock
            .record_entry(RecordStockEntry {
                product_id,
                supplier_id: self.supplier_id,
                quantity,
                cost_value: cost,
                entry_date: Utc::now().date_naive(),
                is_reentry: false,
            })
            .await
            .unwrap();
    }

    /// Checkout whatever is in the cart, paid by one generous card
    async fn checkout(&self) -> Order {
        self.shop
            .checkout
            .checkout(Checkout {
                customer_id: self.customer_id,
                delivery_address_id: self.address_id,
                payments: vec![PaymentInstruction::card(self.card_id, dec!(10000000.00))],
            })
            .await
            .unwrap()
    }
}

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Runtime::new().unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    /// Stock equals the ledger sum; price follows the highest cost seen
    #[test]
    fn prop_stock_follows_ledger(
        entries in prop::collection::vec((1i32..=50, money(100_000)), 1..8),
        margin in 0i64..=100,
    ) {
        let margin = Decimal::from(margin);
        let product = runtime().block_on(async {
            let fixture = Fixture::new().await;
            let product_id = fixture.product(margin, dec!(1.0)).await;
            for (quantity, cost) in &entries {
                fixture.record(product_id, *quantity, *cost).await;
            }
            fixture.shop.catalog.product(product_id).await.unwrap()
        });

        let expected_quantity: i32 = entries.iter().map(|(q, _)| q).sum();
        let max_cost = entries.iter().map(|(_, c)| *c).max().unwrap();

        prop_assert_eq!(product.stock_quantity, expected_quantity);
        prop_assert_eq!(product.cost_price, max_cost);
        prop_assert_eq!(product.sale_price, marked_up(max_cost, margin));
    }

    /// Approvals take exactly the approved quantities and never go negative
    #[test]
    fn prop_approvals_never_oversell(
        initial in 1i32..=30,
        orders in prop::collection::vec(1i32..=10, 1..6),
    ) {
        let (stock, approved) = runtime().block_on(async {
            let fixture = Fixture::new().await;
            let product_id = fixture.product(dec!(10), dec!(1.0)).await;
            fixture.record(product_id, initial, dec!(10.00)).await;

            // Place every order that fits the stock seen at checkout
            let mut placed = Vec::new();
            for quantity in &orders {
                if *quantity > initial {
                    continue;
                }
                fixture
                    .shop
                    .carts
                    .add_item(fixture.customer_id, product_id, *quantity)
                    .await
                    .unwrap();
                placed.push((fixture.checkout().await.id, *quantity));
            }

            let mut approved = 0;
            for (order_id, quantity) in placed {
                if fixture.shop.orders.approve(order_id).await.is_ok() {
                    approved += quantity;
                }
            }

            let product = fixture.shop.catalog.product(product_id).await.unwrap();
            (product.stock_quantity, approved)
        });

        prop_assert!(stock >= 0);
        prop_assert_eq!(stock, initial - approved);
    }

    /// total = subtotal + freight, subtotal = Σ line totals, payments cover total
    #[test]
    fn prop_order_money_is_conserved(
        lines in prop::collection::vec(
            (money(50_000), 1i64..=200, 1i32..=5, 0i64..=60),
            1..4,
        ),
    ) {
        let order = runtime().block_on(async {
            let fixture = Fixture::new().await;
            for (cost, weight_tenths, quantity, margin) in &lines {
                let product_id = fixture
                    .product(Decimal::from(*margin), Decimal::new(*weight_tenths, 1))
                    .await;
                fixture.record(product_id, 10, *cost).await;
                fixture
                    .shop
                    .carts
                    .add_item(fixture.customer_id, product_id, *quantity)
                    .await
                    .unwrap();
            }
            fixture.checkout().await
        });

        let line_sum: Decimal = order.items.iter().map(|item| item.total_price).sum();
        prop_assert_eq!(order.items.len(), lines.len());
        prop_assert_eq!(order.subtotal, line_sum);
        prop_assert_eq!(order.total, order.subtotal + order.freight_cost);
        for item in &order.items {
            prop_assert_eq!(item.total_price, item.unit_price * Decimal::from(item.quantity));
        }
        prop_assert!(order.amount_paid() >= order.total);
        prop_assert!(order.is_balanced());
    }

    /// Whatever allocation accepts covers the total
    #[test]
    fn prop_accepted_allocation_covers_total(
        coupons in prop::collection::vec(money(20_000), 0..3),
        cards in prop::collection::vec(money(50_000), 0..3),
        total in money(60_000),
    ) {
        let aggregator = PaymentAggregator::new(dec!(10.00));
        let credits: Vec<CouponCredit> = coupons
            .iter()
            .map(|value| CouponCredit { coupon_id: Uuid::new_v4(), value: *value })
            .collect();
        let requests: Vec<CardRequest> = cards
            .iter()
            .map(|requested| CardRequest { credit_card_id: Uuid::new_v4(), requested: *requested })
            .collect();

        let offered: Decimal = coupons.iter().chain(cards.iter()).copied().sum();
        match aggregator.allocate(&credits, &requests, total) {
            Ok(payments) => {
                let paid: Decimal = payments.iter().map(|p| p.amount).sum();
                prop_assert!(paid >= total);
                for payment in payments.iter().filter(|p| p.credit_card_id.is_some()) {
                    prop_assert!(payment.amount > Decimal::ZERO);
                    if credits.is_empty() {
                        prop_assert!(payment.amount >= dec!(10.00));
                    }
                }
            }
            Err(_) => {
                let short = offered < total;
                let below_minimum = credits.is_empty();
                prop_assert!(short || below_minimum);
            }
        }
    }
}
