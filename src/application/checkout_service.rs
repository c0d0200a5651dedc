use bigdecimal::BigDecimal;
use uuid::Uuid;

use crate::domain::catalog::{BusinessPaymentMethod, Coordinates};
use crate::domain::errors::DomainError;
use crate::domain::ports::MarketplaceStore;
use crate::domain::schedule::{TimeMargin, WeeklySchedule};

/// What a client needs to build a valid checkout request for a business.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckoutInfo {
    pub business_id: Uuid,
    pub schedule: WeeklySchedule,
    pub payment_methods: Vec<BusinessPaymentMethod>,
    /// Meters from the supplied coordinates, when any were supplied.
    pub distance_meters: Option<f64>,
    pub is_in_range: bool,
    pub time_margin: TimeMargin,
    pub home_delivery: bool,
    pub to_pick_up: bool,
    pub delivery_price: BigDecimal,
}

pub struct CheckoutService<S> {
    store: S,
}

impl<S: MarketplaceStore> CheckoutService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn get_checkout_info(
        &self,
        business_id: Uuid,
        from: Option<Coordinates>,
    ) -> Result<CheckoutInfo, DomainError> {
        self.store.transaction(|tx| {
            let business = tx
                .find_business(business_id)?
                .ok_or(DomainError::BusinessNotFound)?;
            let schedule = tx.find_schedule(business_id)?.unwrap_or_default();
            let payment_methods = tx.list_payment_methods(business_id)?;

            let distance_meters = from.map(|point| point.distance_meters(&business.coordinates));
            let is_in_range =
                distance_meters.is_some_and(|d| d <= business.delivery_radius_meters);

            Ok(CheckoutInfo {
                business_id,
                schedule,
                payment_methods,
                distance_meters,
                is_in_range,
                time_margin: business.time_margin,
                home_delivery: business.home_delivery,
                to_pick_up: business.to_pick_up,
                delivery_price: business.delivery_price,
            })
        })
    }
}
