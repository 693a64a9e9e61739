use std::sync::Arc;

use crate::config::ShopConfig;
use crate::domain::cart::CartService;
use crate::domain::catalog::CatalogService;
use crate::domain::coupon::CouponService;
use crate::domain::customer::CustomerDirectory;
use crate::domain::exchange::ExchangeWorkflowService;
use crate::domain::order::{OrderCheckoutService, OrderLifecycleService, PaymentAggregator};
use crate::domain::stock::StockPricingEngine;
use crate::metrics::Metrics;
use crate::store::{TransactionalStore, UnitOfWork};

// ============================================================================
// Service Composition
// ============================================================================
//
// Every service is built once, here, over one shared unit of work. Callers
// hold a ShopServices and reach the service they need by field.
//
// ============================================================================

pub struct ShopServices<S: TransactionalStore> {
    pub catalog: CatalogService<S>,
    pub stock: StockPricingEngine<S>,
    pub customers: CustomerDirectory<S>,
    pub carts: CartService<S>,
    pub coupons: CouponService<S>,
    pub checkout: OrderCheckoutService<S>,
    pub orders: OrderLifecycleService<S>,
    pub exchanges: ExchangeWorkflowService<S>,
    uow: Arc<UnitOfWork<S>>,
}

impl<S: TransactionalStore> ShopServices<S> {
    pub fn new(store: Arc<S>, config: &ShopConfig, metrics: Option<Arc<Metrics>>) -> Self {
        let mut uow = UnitOfWork::new(store, config.retry.clone());
        if let Some(metrics) = metrics {
            uow = uow.with_metrics(metrics);
        }
        let uow = Arc::new(uow);

        Self {
            catalog: CatalogService::new(uow.clone()),
            stock: StockPricingEngine::new(uow.clone()),
            customers: CustomerDirectory::new(uow.clone()),
            carts: CartService::new(uow.clone()),
            coupons: CouponService::new(uow.clone()),
            checkout: OrderCheckoutService::new(
                uow.clone(),
                PaymentAggregator::new(config.min_card_payment),
                config.freight_rate_per_kg,
            ),
            orders: OrderLifecycleService::new(uow.clone(), config.exchange_coupon_validity_days),
            exchanges: ExchangeWorkflowService::new(
                uow.clone(),
                config.exchange_coupon_validity_days,
            ),
            uow,
        }
    }

    pub fn store(&self) -> &Arc<S> {
        self.uow.store()
    }

    pub fn metrics(&self) -> Option<&Metrics> {
        self.uow.metrics()
    }
}
