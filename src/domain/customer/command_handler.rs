use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use crate::errors::ShopResult;
use crate::store::{StoreTx, TransactionalStore, UnitOfWork};

use super::aggregate::Customer;
use super::commands::{RegisterAddress, RegisterCreditCard, RegisterCustomer};
use super::errors::CustomerError;
use super::value_objects::{Address, CreditCard};

// ============================================================================
// Customer Directory
// ============================================================================
//
// Registration and lookup of customers, addresses and cards. Checkout only
// needs these to exist; anything beyond that is plain CRUD.
//
// ============================================================================

pub struct CustomerDirectory<S: TransactionalStore> {
    uow: Arc<UnitOfWork<S>>,
}

impl<S: TransactionalStore> CustomerDirectory<S> {
    pub fn new(uow: Arc<UnitOfWork<S>>) -> Self {
        Self { uow }
    }

    pub async fn register_customer(&self, command: RegisterCustomer) -> ShopResult<Customer> {
        let customer = Customer::new(&command.name, &command.email)?;

        self.uow
            .execute("customer.register", |tx| {
                let taken = tx.scan::<Customer>(&|c| c.email == customer.email)?;
                if !taken.is_empty() {
                    return Err(CustomerError::DuplicateEmail(customer.email.0.clone()).into());
                }
                tx.save(&customer)?;
                Ok(())
            })
            .await?;

        info!(customer_id = %customer.id, "👤 Customer registered");
        Ok(customer)
    }

    pub async fn register_address(&self, command: RegisterAddress) -> ShopResult<Address> {
        let address = Address {
            id: Uuid::new_v4(),
            customer_id: command.customer_id,
            street: command.street,
            city: command.city,
            state: command.state,
            postal_code: command.postal_code,
        };

        self.uow
            .execute("customer.register_address", |tx| {
                if let Some(owner) = address.customer_id {
                    tx.require::<Customer>(owner)?;
                }
                tx.save(&address)?;
                Ok(())
            })
            .await?;

        Ok(address)
    }

    pub async fn register_credit_card(
        &self,
        command: RegisterCreditCard,
    ) -> ShopResult<CreditCard> {
        let digits: String = command
            .card_number
            .chars()
            .filter(char::is_ascii_digit)
            .collect();
        if digits.len() < 4 {
            return Err(CustomerError::InvalidCardNumber.into());
        }

        let card = CreditCard {
            id: Uuid::new_v4(),
            customer_id: command.customer_id,
            holder_name: command.holder_name,
            last_four: digits[digits.len() - 4..].to_string(),
            brand: command.brand,
        };

        self.uow
            .execute("customer.register_card", |tx| {
                tx.require::<Customer>(card.customer_id)?;
                tx.save(&card)?;
                Ok(())
            })
            .await?;

        Ok(card)
    }

    pub async fn customer(&self, customer_id: Uuid) -> ShopResult<Customer> {
        self.uow
            .execute("customer.get", |tx| tx.require::<Customer>(customer_id))
            .await
    }
}
