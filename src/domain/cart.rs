use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::catalog::Item;
use super::identity::Caller;

#[derive(Debug, Clone, PartialEq)]
pub struct CartItem {
    pub id: Uuid,
    pub user_id: Uuid,
    pub item_id: Uuid,
    pub business_id: Uuid,
    pub name: String,
    /// Unit price captured when the line was added.
    pub price: BigDecimal,
    pub thumbnail: Option<String>,
    pub quantity: i32,
    pub authorization_token_id: Uuid,
    pub created_at: DateTime<Utc>,
}

impl CartItem {
    pub fn line_total(&self) -> BigDecimal {
        &self.price * BigDecimal::from(self.quantity)
    }
}

#[derive(Debug, Clone)]
pub struct NewCartItem {
    pub user_id: Uuid,
    pub item_id: Uuid,
    pub business_id: Uuid,
    pub name: String,
    pub price: BigDecimal,
    pub thumbnail: Option<String>,
    pub quantity: i32,
    pub authorization_token_id: Uuid,
}

impl NewCartItem {
    /// Captures the item's name, price and thumbnail as they are right now.
    pub fn capture(caller: &Caller, item: &Item, quantity: i32) -> Self {
        Self {
            user_id: caller.user_id,
            item_id: item.id,
            business_id: item.business_id,
            name: item.name.clone(),
            price: item.price.clone(),
            thumbnail: item.thumbnail.clone(),
            quantity,
            authorization_token_id: caller.authorization_token_id,
        }
    }
}

/// How a client points at a cart line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CartItemRef {
    CartItem(Uuid),
    Item(Uuid),
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    #[test]
    fn line_total_multiplies_unit_price() {
        let line = CartItem {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            item_id: Uuid::new_v4(),
            business_id: Uuid::new_v4(),
            name: "Croqueta".to_string(),
            price: BigDecimal::from_str("2.75").expect("valid decimal"),
            thumbnail: None,
            quantity: 2,
            authorization_token_id: Uuid::new_v4(),
            created_at: Utc::now(),
        };
        assert_eq!(line.line_total().to_string(), "5.50");
    }
}
