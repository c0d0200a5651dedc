//! Availability arithmetic for a single item.
//!
//! Stock is stored as a signed count. A reservation that exhausts the stock
//! exactly stores [`SOLD_OUT`] instead of `0`, and a restoration onto
//! [`SOLD_OUT`] starts counting from `0` again. The same `-1` value is also
//! accepted at item creation, so the stored number alone cannot tell
//! "just sold out" apart from a catalog entry created with `-1`.

use super::errors::DomainError;

/// Stored availability after a reservation consumed the last unit.
pub const SOLD_OUT: i32 = -1;

fn ensure_positive(quantity: i32) -> Result<(), DomainError> {
    if quantity <= 0 {
        return Err(DomainError::InvalidInput(format!(
            "quantity must be positive, got {quantity}"
        )));
    }
    Ok(())
}

/// Availability after claiming `quantity` units.
pub fn reserve(availability: i32, quantity: i32) -> Result<i32, DomainError> {
    ensure_positive(quantity)?;
    match availability.checked_sub(quantity) {
        Some(0) => Ok(SOLD_OUT),
        Some(remaining) if remaining > 0 => Ok(remaining),
        _ => Err(DomainError::NoAvailability),
    }
}

/// Availability after giving `quantity` units back.
pub fn restore(availability: i32, quantity: i32) -> Result<i32, DomainError> {
    ensure_positive(quantity)?;
    let base = if availability == SOLD_OUT { 0 } else { availability };
    base.checked_add(quantity)
        .ok_or_else(|| DomainError::Internal("availability overflow".to_string()))
}

/// Availability after a cart line moves from `old_quantity` to `new_quantity`.
///
/// Expressed as restore-then-reserve so the sold-out rule applies to the
/// final value exactly as for a fresh reservation.
pub fn change_reservation(
    availability: i32,
    old_quantity: i32,
    new_quantity: i32,
) -> Result<i32, DomainError> {
    reserve(restore(availability, old_quantity)?, new_quantity)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reserve_decrements_availability() {
        assert_eq!(reserve(10, 3), Ok(7));
    }

    #[test]
    fn reserve_exhausting_stock_stores_sold_out() {
        assert_eq!(reserve(3, 3), Ok(SOLD_OUT));
    }

    #[test]
    fn reserve_after_sold_out_fails() {
        let after_first = reserve(3, 3).expect("first reservation fits");
        assert_eq!(reserve(after_first, 1), Err(DomainError::NoAvailability));
    }

    #[test]
    fn reserve_more_than_available_fails() {
        assert_eq!(reserve(2, 5), Err(DomainError::NoAvailability));
    }

    #[test]
    fn reserve_rejects_non_positive_quantity() {
        assert!(matches!(reserve(5, 0), Err(DomainError::InvalidInput(_))));
        assert!(matches!(reserve(5, -2), Err(DomainError::InvalidInput(_))));
    }

    #[test]
    fn restore_normalises_sold_out_before_adding() {
        assert_eq!(restore(SOLD_OUT, 2), Ok(2));
        assert_eq!(restore(4, 2), Ok(6));
    }

    #[test]
    fn restore_overflow_is_internal() {
        assert!(matches!(restore(i32::MAX, 1), Err(DomainError::Internal(_))));
    }

    #[test]
    fn change_reservation_replaces_previous_quantity() {
        // 10 in stock, line held 2 (stored 8), now wants 5.
        assert_eq!(change_reservation(8, 2, 5), Ok(5));
        // Growing a line to take everything that is left.
        assert_eq!(change_reservation(8, 2, 10), Ok(SOLD_OUT));
        // Shrinking a line that had sold the item out.
        assert_eq!(change_reservation(SOLD_OUT, 4, 1), Ok(3));
    }

    #[test]
    fn change_reservation_beyond_stock_fails() {
        assert_eq!(change_reservation(1, 2, 4), Err(DomainError::NoAvailability));
    }

    #[test]
    fn reservations_and_restorations_are_conserved() {
        let initial = 20;
        let reserved = [3, 5, 2, 4];
        let restored = [5, 2];

        let mut availability = initial;
        for q in reserved {
            availability = reserve(availability, q).expect("fits in stock");
        }
        for q in restored {
            availability = restore(availability, q).expect("no overflow");
        }

        let expected = initial - reserved.iter().sum::<i32>() + restored.iter().sum::<i32>();
        assert_eq!(availability, expected);
    }

    #[test]
    fn conservation_accounts_for_sold_out_sentinel() {
        let mut availability = reserve(5, 5).expect("exact fit");
        assert_eq!(availability, SOLD_OUT);
        availability = restore(availability, 5).expect("no overflow");
        assert_eq!(availability, 5);
    }
}
