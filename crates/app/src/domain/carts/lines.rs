//! Pure line-item algebra shared by every cart operation.
//!
//! Invariant: a product identifier appears in at most one line; duplicate
//! adds and merges collapse by summing quantities, capped at the per-line
//! maximum.

use crate::domain::{
    carts::{errors::CartsServiceError, models::CartLine},
    products::models::ProductUuid,
};

/// Reject quantities outside `1..=cap`.
pub(crate) fn validate_quantity(quantity: u32, cap: u32) -> Result<(), CartsServiceError> {
    if quantity == 0 || quantity > cap {
        return Err(CartsServiceError::InvalidQuantity(quantity));
    }

    Ok(())
}

/// Add `quantity` of `product` at `unit_price`, collapsing into an existing
/// line when the product is already present. The existing line keeps its
/// original price snapshot.
pub(crate) fn apply_add(
    lines: &mut Vec<CartLine>,
    product: ProductUuid,
    quantity: u32,
    unit_price: u64,
    cap: u32,
) {
    if let Some(line) = lines.iter_mut().find(|line| line.product_uuid == product) {
        line.quantity = line.quantity.saturating_add(quantity).min(cap);
    } else {
        lines.push(CartLine {
            product_uuid: product,
            quantity: quantity.min(cap),
            unit_price,
        });
    }
}

/// Set the quantity of an existing line. Zero removes the line.
pub(crate) fn apply_update(
    lines: &mut Vec<CartLine>,
    product: ProductUuid,
    quantity: u32,
    cap: u32,
) -> Result<(), CartsServiceError> {
    if quantity > cap {
        return Err(CartsServiceError::InvalidQuantity(quantity));
    }

    if quantity == 0 {
        apply_remove(lines, product);

        return Ok(());
    }

    let Some(line) = lines.iter_mut().find(|line| line.product_uuid == product) else {
        return Err(CartsServiceError::ProductNotFound);
    };

    line.quantity = quantity;

    Ok(())
}

/// Remove the line for `product`. Removing an absent product is a no-op.
pub(crate) fn apply_remove(lines: &mut Vec<CartLine>, product: ProductUuid) {
    lines.retain(|line| line.product_uuid != product);
}

/// Merge guest lines into user lines: per-product quantities are summed and
/// capped, guest-only products are appended in their guest order, and a
/// product present in both carts keeps the user line's price snapshot.
pub(crate) fn merge_lines(user: &mut Vec<CartLine>, guest: Vec<CartLine>, cap: u32) {
    for guest_line in guest {
        if let Some(line) = user
            .iter_mut()
            .find(|line| line.product_uuid == guest_line.product_uuid)
        {
            line.quantity = line.quantity.saturating_add(guest_line.quantity).min(cap);
        } else {
            user.push(guest_line);
        }
    }
}

/// Cart total: Σ quantity × unit price over all lines.
pub(crate) fn total(lines: &[CartLine]) -> u64 {
    lines.iter().fold(0_u64, |acc, line| {
        acc.saturating_add(u64::from(line.quantity).saturating_mul(line.unit_price))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const CAP: u32 = 99;

    fn product() -> ProductUuid {
        ProductUuid::now_v7()
    }

    fn line(product: ProductUuid, quantity: u32, unit_price: u64) -> CartLine {
        CartLine {
            product_uuid: product,
            quantity,
            unit_price,
        }
    }

    #[test]
    fn validate_quantity_rejects_zero() {
        let result = validate_quantity(0, CAP);

        assert!(
            matches!(result, Err(CartsServiceError::InvalidQuantity(0))),
            "expected InvalidQuantity, got {result:?}"
        );
    }

    #[test]
    fn validate_quantity_rejects_above_cap() {
        let result = validate_quantity(CAP + 1, CAP);

        assert!(
            matches!(result, Err(CartsServiceError::InvalidQuantity(100))),
            "expected InvalidQuantity, got {result:?}"
        );
    }

    #[test]
    fn validate_quantity_accepts_bounds() {
        assert!(validate_quantity(1, CAP).is_ok(), "1 is a valid quantity");
        assert!(
            validate_quantity(CAP, CAP).is_ok(),
            "the cap itself is a valid quantity"
        );
    }

    #[test]
    fn add_collapses_duplicate_product_into_one_line() {
        let p = product();
        let mut lines = vec![line(p, 2, 10_00)];

        apply_add(&mut lines, p, 3, 12_00, CAP);

        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].quantity, 5);
        // Existing snapshot wins over the later price.
        assert_eq!(lines[0].unit_price, 10_00);
    }

    #[test]
    fn add_caps_summed_quantity() {
        let p = product();
        let mut lines = vec![line(p, 98, 10_00)];

        apply_add(&mut lines, p, 5, 10_00, CAP);

        assert_eq!(lines[0].quantity, CAP);
    }

    #[test]
    fn add_appends_new_product() {
        let p1 = product();
        let p2 = product();
        let mut lines = vec![line(p1, 1, 5_00)];

        apply_add(&mut lines, p2, 2, 7_50, CAP);

        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1], line(p2, 2, 7_50));
    }

    #[test]
    fn update_to_zero_removes_line() {
        let p = product();
        let mut lines = vec![line(p, 4, 10_00)];

        apply_update(&mut lines, p, 0, CAP).expect("zero quantity removes");

        assert!(lines.is_empty(), "line should be removed");
    }

    #[test]
    fn update_missing_product_is_not_found() {
        let mut lines = vec![line(product(), 4, 10_00)];

        let result = apply_update(&mut lines, product(), 2, CAP);

        assert!(
            matches!(result, Err(CartsServiceError::ProductNotFound)),
            "expected ProductNotFound, got {result:?}"
        );
        assert_eq!(lines.len(), 1, "cart left unmodified");
    }

    #[test]
    fn update_above_cap_is_rejected() {
        let p = product();
        let mut lines = vec![line(p, 4, 10_00)];

        let result = apply_update(&mut lines, p, CAP + 1, CAP);

        assert!(
            matches!(result, Err(CartsServiceError::InvalidQuantity(_))),
            "expected InvalidQuantity, got {result:?}"
        );
        assert_eq!(lines[0].quantity, 4, "cart left unmodified");
    }

    #[test]
    fn remove_absent_product_is_noop() {
        let p = product();
        let mut lines = vec![line(p, 1, 10_00)];

        apply_remove(&mut lines, product());

        assert_eq!(lines, vec![line(p, 1, 10_00)]);
    }

    #[test]
    fn merge_sums_shared_products_and_appends_the_rest() {
        // Guest {A: 2} + user {A: 1, B: 3} -> {A: 3, B: 3}.
        let a = product();
        let b = product();
        let mut user = vec![line(a, 1, 10_00), line(b, 3, 4_00)];
        let guest = vec![line(a, 2, 11_00)];

        merge_lines(&mut user, guest, CAP);

        assert_eq!(user.len(), 2);
        assert_eq!(user[0].quantity, 3);
        assert_eq!(user[0].unit_price, 10_00, "user snapshot wins");
        assert_eq!(user[1].quantity, 3);
    }

    #[test]
    fn merge_quantities_are_capped() {
        let a = product();
        let mut user = vec![line(a, 60, 10_00)];
        let guest = vec![line(a, 60, 10_00)];

        merge_lines(&mut user, guest, CAP);

        assert_eq!(user[0].quantity, CAP);
    }

    #[test]
    fn merge_empty_guest_is_identity() {
        let mut user = vec![line(product(), 2, 10_00)];
        let before = user.clone();

        merge_lines(&mut user, Vec::new(), CAP);

        assert_eq!(user, before);
    }

    #[test]
    fn merge_into_empty_user_preserves_guest_order() {
        let p1 = product();
        let p2 = product();
        let mut user = Vec::new();
        let guest = vec![line(p1, 1, 1_00), line(p2, 2, 2_00)];

        merge_lines(&mut user, guest.clone(), CAP);

        assert_eq!(user, guest);
    }

    #[test]
    fn merge_twice_with_consumed_guest_matches_single_merge() {
        // Re-running a merge after the guest cart was deleted (i.e. with an
        // empty guest) must not change the result.
        let a = product();
        let b = product();
        let mut once = vec![line(a, 1, 10_00)];
        let guest = vec![line(a, 2, 11_00), line(b, 1, 3_00)];

        merge_lines(&mut once, guest, CAP);
        let mut twice = once.clone();
        merge_lines(&mut twice, Vec::new(), CAP);

        assert_eq!(twice, once);
    }

    #[test]
    fn total_sums_quantity_times_price() {
        let lines = vec![line(product(), 3, 4_00), line(product(), 1, 10_00)];

        assert_eq!(total(&lines), 22_00);
    }

    #[test]
    fn total_of_no_lines_is_zero() {
        assert_eq!(total(&[]), 0);
    }
}
