//! Order repository and tracking number generation.

use chrono::{NaiveDate, Utc};
use rand::Rng;
use rand::distr::Alphanumeric;

use craft_bazaar_core::{OrderId, OrderStatus, TrackingNumber, UserId};

use super::document::{StoreDocument, take};
use super::{Database, RepositoryError};
use crate::models::{NewOrder, Order};

/// Length of the random part of a tracking number.
const SUFFIX_LENGTH: usize = 6;

/// Generate a tracking number for `date` that no order in `doc` uses.
pub(crate) fn unique_tracking_number(doc: &StoreDocument, date: NaiveDate) -> TrackingNumber {
    loop {
        let suffix: String = rand::rng()
            .sample_iter(Alphanumeric)
            .take(SUFFIX_LENGTH)
            .map(|b| char::from(b).to_ascii_uppercase())
            .collect();
        match TrackingNumber::compose(date, &suffix) {
            Ok(code) if !doc.tracking_number_taken(&code) => return code,
            _ => {}
        }
    }
}

/// Repository for orders. Orders are never deleted.
pub struct OrderRepository<'a> {
    db: &'a Database,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(db: &'a Database) -> Self {
        Self { db }
    }

    pub async fn list(&self) -> Vec<Order> {
        self.db.read(|doc| doc.orders.clone()).await
    }

    /// Orders placed by one account, oldest first.
    pub async fn list_for_user(&self, user_id: UserId) -> Vec<Order> {
        self.db
            .read(|doc| {
                doc.orders
                    .iter()
                    .filter(|o| o.user_id == Some(user_id))
                    .cloned()
                    .collect()
            })
            .await
    }

    pub async fn get(&self, id: OrderId) -> Option<Order> {
        self.db
            .read(|doc| doc.orders.iter().find(|o| o.id == id).cloned())
            .await
    }

    /// Look up an order by tracking number, ignoring case.
    pub async fn get_by_tracking_number(&self, code: &TrackingNumber) -> Option<Order> {
        self.db
            .read(|doc| {
                doc.orders
                    .iter()
                    .find(|o| o.tracking_number.as_str().eq_ignore_ascii_case(code.as_str()))
                    .cloned()
            })
            .await
    }

    /// Place an order. The status starts as pending and a fresh tracking
    /// number is assigned.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Invalid` for an order without items and a
    /// storage error if the store cannot be saved.
    #[tracing::instrument(skip(self, new), fields(items = new.items.len()))]
    pub async fn create(&self, new: NewOrder, user_id: Option<UserId>) -> Result<Order, RepositoryError> {
        if new.items.is_empty() {
            return Err(RepositoryError::Invalid(
                "An order needs at least one item".to_owned(),
            ));
        }
        let order = self
            .db
            .write(|doc| {
                let now = Utc::now();
                let order = Order {
                    id: OrderId::new(take(&mut doc.counters.order_id)?),
                    user_id,
                    customer_name: new.customer_name,
                    customer_email: new.customer_email,
                    customer_phone: new.customer_phone.filter(|p| !p.trim().is_empty()),
                    shipping_address: new.shipping_address,
                    total: new.total,
                    status: OrderStatus::Pending.into(),
                    tracking_number: unique_tracking_number(doc, now.date_naive()),
                    items: new.items,
                    created_at: now,
                };
                doc.orders.push(order.clone());
                Ok(order)
            })
            .await?;
        tracing::info!(order = %order.id, tracking = %order.tracking_number, "Order placed");
        Ok(order)
    }

    /// Overwrite an order's status. Any status may follow any other.
    ///
    /// Returns `None` if the order does not exist.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the store cannot be saved.
    #[tracing::instrument(skip(self))]
    pub async fn update_status(
        &self,
        id: OrderId,
        status: OrderStatus,
    ) -> Result<Option<Order>, RepositoryError> {
        self.db
            .write_opt(|doc| {
                Ok(doc.orders.iter_mut().find(|o| o.id == id).map(|order| {
                    order.status = status.into();
                    order.clone()
                }))
            })
            .await
    }
}
