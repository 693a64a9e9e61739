use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use crate::errors::ShopResult;
use crate::outbox::{ProductStatusChanged, ShopEvent};
use crate::store::{StoreTx, TransactionalStore, UnitOfWork};

use super::commands::{ChangeProductStatus, RegisterPricingGroup, RegisterProduct};
use super::errors::CatalogError;
use super::product::Product;
use super::value_objects::{PricingGroup, StatusDirection};

// ============================================================================
// Catalog Service
// ============================================================================
//
// Reference data for pricing (groups, products) and the product
// activation log. Stock and prices are owned by the stock engine.
//
// ============================================================================

pub struct CatalogService<S: TransactionalStore> {
    uow: Arc<UnitOfWork<S>>,
}

impl<S: TransactionalStore> CatalogService<S> {
    pub fn new(uow: Arc<UnitOfWork<S>>) -> Self {
        Self { uow }
    }

    pub async fn register_pricing_group(
        &self,
        command: RegisterPricingGroup,
    ) -> ShopResult<PricingGroup> {
        let name = command.name.trim();
        if name.is_empty() {
            return Err(CatalogError::EmptyPricingGroupName.into());
        }
        if command.margin_percentage.is_sign_negative() {
            return Err(CatalogError::NegativeMargin(command.margin_percentage).into());
        }

        let group = PricingGroup {
            id: Uuid::new_v4(),
            name: name.to_string(),
            margin_percentage: command.margin_percentage,
        };

        self.uow
            .execute("catalog.register_pricing_group", |tx| {
                tx.save(&group)?;
                Ok(())
            })
            .await?;

        info!(
            pricing_group_id = %group.id,
            margin = %group.margin_percentage,
            "📇 Pricing group registered"
        );
        Ok(group)
    }

    pub async fn register_product(&self, command: RegisterProduct) -> ShopResult<Product> {
        let product = Product::new(
            command.name,
            command.dimensions,
            command.weight,
            command.pricing_group_id,
        )?;

        self.uow
            .execute("catalog.register_product", |tx| {
                tx.require::<PricingGroup>(product.pricing_group_id)?;
                tx.save(&product)?;
                Ok(())
            })
            .await?;

        info!(product_id = %product.id, name = %product.name, "📦 Product registered");
        Ok(product)
    }

    pub async fn activate(&self, command: ChangeProductStatus) -> ShopResult<Product> {
        self.change_status(command, StatusDirection::Activate).await
    }

    pub async fn deactivate(&self, command: ChangeProductStatus) -> ShopResult<Product> {
        self.change_status(command, StatusDirection::Deactivate).await
    }

    pub async fn product(&self, product_id: Uuid) -> ShopResult<Product> {
        self.uow
            .execute("catalog.product", |tx| tx.require::<Product>(product_id))
            .await
    }

    async fn change_status(
        &self,
        command: ChangeProductStatus,
        direction: StatusDirection,
    ) -> ShopResult<Product> {
        let product = self
            .uow
            .execute("catalog.change_status", |tx| {
                let mut product = tx.require::<Product>(command.product_id)?;

                let change = match direction {
                    StatusDirection::Activate => {
                        product.activate(&command.reason, command.category)?
                    }
                    StatusDirection::Deactivate => {
                        product.deactivate(&command.reason, command.category)?
                    }
                }
                .clone();
                let event = ShopEvent::ProductStatusChanged(ProductStatusChanged {
                    product_id: product.id,
                    direction,
                    category: change.category,
                    reason: change.reason,
                });

                tx.save(&product)?;
                tx.record_event(event);
                Ok(product)
            })
            .await?;

        info!(
            product_id = %product.id,
            direction = ?direction,
            category = ?command.category,
            "🔀 Product status changed"
        );
        Ok(product)
    }
}
