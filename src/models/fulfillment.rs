use rust_decimal::Decimal;

/// Order-level monetary totals, always recomputed from line items.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OrderTotals {
    pub subtotal: Decimal,
    pub total: Decimal,
}

/// `total_price = quantity × unit_price`. Derived, never settable.
pub fn compute_line_total(quantity: i32, unit_price: Decimal) -> Decimal {
    Decimal::from(quantity) * unit_price
}

/// `subtotal = Σ line totals`, `total = subtotal + tax + shipping − discount`.
pub fn compute_order_totals(
    line_totals: impl IntoIterator<Item = Decimal>,
    tax: Decimal,
    shipping: Decimal,
    discount: Decimal,
) -> OrderTotals {
    let subtotal: Decimal = line_totals.into_iter().sum();
    OrderTotals {
        subtotal,
        total: subtotal + tax + shipping - discount,
    }
}

/// Whole-number fulfillment percentage, rounded half-up:
/// `Σ delivered / Σ declared` across all line items.
pub fn fulfillment_percentage(delivered: i64, declared: i64) -> u8 {
    if declared <= 0 {
        return 0;
    }
    let delivered = delivered.clamp(0, declared);
    // floor(delivered * 100 / declared + 0.5) in integer arithmetic
    let percent = (delivered * 200 + declared) / (declared * 2);
    percent as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn totals_are_deterministic() {
        let lines = vec![dec!(150.00), dec!(49.50)];
        let first = compute_order_totals(lines.clone(), dec!(15.96), dec!(12.00), dec!(5.00));
        let second = compute_order_totals(lines, dec!(15.96), dec!(12.00), dec!(5.00));
        assert_eq!(first, second);
        assert_eq!(first.subtotal, dec!(199.50));
        assert_eq!(first.total, dec!(222.46));
    }

    #[test]
    fn line_total_is_quantity_times_unit_price() {
        assert_eq!(compute_line_total(3, dec!(15.25)), dec!(45.75));
        assert_eq!(compute_line_total(0, dec!(99.99)), dec!(0));
    }

    #[test]
    fn percentage_rounds_half_up() {
        assert_eq!(fulfillment_percentage(60, 100), 60);
        assert_eq!(fulfillment_percentage(1, 3), 33); // 33.33..
        assert_eq!(fulfillment_percentage(2, 3), 67); // 66.66..
        assert_eq!(fulfillment_percentage(1, 200), 1); // 0.5 rounds up
        assert_eq!(fulfillment_percentage(1, 201), 0); // 0.497 rounds down
    }

    #[test]
    fn percentage_edges() {
        assert_eq!(fulfillment_percentage(0, 100), 0);
        assert_eq!(fulfillment_percentage(100, 100), 100);
        assert_eq!(fulfillment_percentage(0, 0), 0);
    }
}
