use uuid::Uuid;

use crate::application::inventory_ledger;
use crate::domain::cart::{CartItem, CartItemRef, NewCartItem};
use crate::domain::catalog::Item;
use crate::domain::errors::DomainError;
use crate::domain::identity::Caller;
use crate::domain::ports::{MarketplaceStore, StoreTx};

/// Cart mutations. Each one reserves or restores stock in the same
/// transaction as the cart change itself.
pub struct CartService<S> {
    store: S,
}

impl<S: MarketplaceStore> CartService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn list_cart(&self, caller: &Caller) -> Result<Vec<CartItem>, DomainError> {
        self.store
            .transaction(|tx| tx.list_cart_items(caller.user_id))
    }

    pub fn add_cart_item(
        &self,
        caller: &Caller,
        item_id: Uuid,
        quantity: i32,
    ) -> Result<CartItem, DomainError> {
        let line = self
            .store
            .transaction(|tx| add_line(tx, caller, item_id, quantity))?;
        log::info!(
            "user {} added item {} x{} to cart",
            caller.user_id,
            item_id,
            quantity
        );
        Ok(line)
    }

    /// Sets a line's quantity, replacing its previous reservation.
    pub fn update_cart_item(
        &self,
        caller: &Caller,
        cart_item_id: Uuid,
        quantity: i32,
    ) -> Result<CartItem, DomainError> {
        self.store.transaction(|tx| {
            let line = tx
                .find_cart_item(caller.user_id, CartItemRef::CartItem(cart_item_id))?
                .ok_or(DomainError::CartItemNotFound)?;
            inventory_ledger::change_reservation(tx, line.item_id, line.quantity, quantity)?;
            tx.set_cart_item_quantity(line.id, quantity)
        })
    }

    pub fn delete_cart_item(
        &self,
        caller: &Caller,
        reference: CartItemRef,
    ) -> Result<(), DomainError> {
        self.store.transaction(|tx| {
            let line = tx
                .find_cart_item(caller.user_id, reference)?
                .ok_or(DomainError::CartItemNotFound)?;
            inventory_ledger::restore(tx, line.item_id, line.quantity)?;
            tx.delete_cart_item(line.id)
        })
    }

    /// Removes every line, restoring each reservation. Returns the number of lines removed.
    pub fn empty_cart(&self, caller: &Caller) -> Result<usize, DomainError> {
        let removed = self.store.transaction(|tx| empty(tx, caller))?;
        log::info!("user {} emptied cart ({} lines)", caller.user_id, removed);
        Ok(removed)
    }

    /// Empties the cart and adds one item, all or nothing.
    pub fn empty_and_add_cart_item(
        &self,
        caller: &Caller,
        item_id: Uuid,
        quantity: i32,
    ) -> Result<CartItem, DomainError> {
        self.store.transaction(|tx| {
            empty(tx, caller)?;
            add_line(tx, caller, item_id, quantity)
        })
    }
}

fn add_line(
    tx: &mut dyn StoreTx,
    caller: &Caller,
    item_id: Uuid,
    quantity: i32,
) -> Result<CartItem, DomainError> {
    let cart = tx.list_cart_items(caller.user_id)?;
    if cart.iter().any(|line| line.item_id == item_id) {
        return Err(DomainError::ItemInTheCart);
    }

    let item = tx
        .lock_item(item_id)?
        .filter(Item::is_listed)
        .ok_or(DomainError::ItemNotFound)?;
    if cart.first().is_some_and(|line| line.business_id != item.business_id) {
        return Err(DomainError::CrossBusinessCart);
    }

    let item = inventory_ledger::reserve(tx, item.id, quantity)?;
    tx.insert_cart_item(NewCartItem::capture(caller, &item, quantity))
}

fn empty(tx: &mut dyn StoreTx, caller: &Caller) -> Result<usize, DomainError> {
    for line in tx.list_cart_items(caller.user_id)? {
        inventory_ledger::restore(tx, line.item_id, line.quantity)?;
    }
    tx.clear_cart(caller.user_id)
}
