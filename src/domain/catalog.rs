use bigdecimal::BigDecimal;
use uuid::Uuid;

use super::schedule::TimeMargin;

const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Great-circle (haversine) distance in meters.
    pub fn distance_meters(&self, other: &Coordinates) -> f64 {
        let (lat1, lat2) = (self.latitude.to_radians(), other.latitude.to_radians());
        let d_lat = lat2 - lat1;
        let d_lon = (other.longitude - self.longitude).to_radians();

        let a = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);
        2.0 * EARTH_RADIUS_METERS * a.sqrt().asin()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    pub id: Uuid,
    pub business_id: Uuid,
    pub name: String,
    pub price: BigDecimal,
    /// Remaining stock; see [`crate::domain::inventory::SOLD_OUT`].
    pub availability: i32,
    pub enabled: bool,
    pub available: bool,
    pub thumbnail: Option<String>,
}

impl Item {
    /// Whether the business currently offers the item at all.
    pub fn is_listed(&self) -> bool {
        self.enabled && self.available
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Business {
    pub id: Uuid,
    pub name: String,
    pub address: String,
    pub coordinates: Coordinates,
    pub home_delivery: bool,
    pub to_pick_up: bool,
    pub delivery_price: BigDecimal,
    pub delivery_radius_meters: f64,
    pub time_margin: TimeMargin,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BusinessPaymentMethod {
    pub id: Uuid,
    pub business_id: Uuid,
    pub name: String,
    pub details: Option<String>,
    pub enabled: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UserAddress {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub address: String,
    pub coordinates: Coordinates,
    pub instructions: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distance_to_self_is_zero() {
        let havana = Coordinates::new(23.1136, -82.3666);
        assert!(havana.distance_meters(&havana).abs() < 1e-6);
    }

    #[test]
    fn one_degree_of_latitude_is_about_111_km() {
        let a = Coordinates::new(0.0, 0.0);
        let b = Coordinates::new(1.0, 0.0);
        let d = a.distance_meters(&b);
        assert!((d - 111_195.0).abs() < 100.0, "got {d}");
    }

    #[test]
    fn distance_is_symmetric() {
        let a = Coordinates::new(23.1136, -82.3666);
        let b = Coordinates::new(23.0540, -82.3450);
        assert!((a.distance_meters(&b) - b.distance_meters(&a)).abs() < 1e-6);
    }
}
