//! Reservation bookkeeping against the item rows.
//!
//! Every call locks the item row through [`ItemStore::lock_item`] before
//! writing, so two transactions reserving the same item serialize instead of
//! both spending the same stock.

use uuid::Uuid;

use crate::domain::catalog::Item;
use crate::domain::errors::DomainError;
use crate::domain::inventory;
use crate::domain::ports::ItemStore;

fn locked<T: ItemStore + ?Sized>(tx: &mut T, item_id: Uuid) -> Result<Item, DomainError> {
    tx.lock_item(item_id)?.ok_or(DomainError::ItemNotFound)
}

fn write<T: ItemStore + ?Sized>(
    tx: &mut T,
    mut item: Item,
    availability: i32,
) -> Result<Item, DomainError> {
    tx.set_item_availability(item.id, availability)?;
    item.availability = availability;
    Ok(item)
}

/// Claims `quantity` units, returning the item with its new availability.
pub fn reserve<T: ItemStore + ?Sized>(
    tx: &mut T,
    item_id: Uuid,
    quantity: i32,
) -> Result<Item, DomainError> {
    let item = locked(tx, item_id)?;
    let next = inventory::reserve(item.availability, quantity)?;
    log::debug!(
        "reserve item={} quantity={} availability {} -> {}",
        item_id,
        quantity,
        item.availability,
        next
    );
    write(tx, item, next)
}

/// Replaces a reservation of `old_quantity` units with one of `new_quantity`.
pub fn change_reservation<T: ItemStore + ?Sized>(
    tx: &mut T,
    item_id: Uuid,
    old_quantity: i32,
    new_quantity: i32,
) -> Result<Item, DomainError> {
    let item = locked(tx, item_id)?;
    let next = inventory::change_reservation(item.availability, old_quantity, new_quantity)?;
    log::debug!(
        "change reservation item={} {} -> {} availability {} -> {}",
        item_id,
        old_quantity,
        new_quantity,
        item.availability,
        next
    );
    write(tx, item, next)
}

/// Gives `quantity` units back to the item.
pub fn restore<T: ItemStore + ?Sized>(
    tx: &mut T,
    item_id: Uuid,
    quantity: i32,
) -> Result<Item, DomainError> {
    let item = locked(tx, item_id)?;
    let next = inventory::restore(item.availability, quantity)?;
    log::debug!(
        "restore item={} quantity={} availability {} -> {}",
        item_id,
        quantity,
        item.availability,
        next
    );
    write(tx, item, next)
}
