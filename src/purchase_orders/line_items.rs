use rust_decimal::Decimal;

use crate::purchase_orders::LineItem;

/// Computes purchase-order values from line items
pub struct LineItemCalculator;

impl LineItemCalculator {
    /// Value of one line (quantity * unit_price)
    pub fn subtotal(item: &LineItem) -> Decimal {
        Decimal::from(item.quantity) * item.unit_price
    }

    /// Total value of an order (sum of all line subtotals)
    pub fn total_value(items: &[LineItem]) -> Decimal {
        items.iter().map(Self::subtotal).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn item(quantity: i32, unit_price: Decimal) -> LineItem {
        LineItem {
            name: "Widget".to_string(),
            quantity,
            unit_price,
        }
    }

    #[test]
    fn test_subtotal_basic() {
        assert_eq!(LineItemCalculator::subtotal(&item(2, dec!(4.50))), dec!(9.00));
    }

    #[test]
    fn test_subtotal_decimal_precision() {
        assert_eq!(LineItemCalculator::subtotal(&item(3, dec!(4.33))), dec!(12.99));
    }

    #[test]
    fn test_total_multiple_items() {
        let items = vec![item(1, dec!(10.00)), item(2, dec!(2.75)), item(5, dec!(0.65))];
        assert_eq!(LineItemCalculator::total_value(&items), dec!(18.75));
    }

    #[test]
    fn test_total_empty() {
        assert_eq!(LineItemCalculator::total_value(&[]), Decimal::ZERO);
    }

    #[test]
    fn test_free_items_add_nothing() {
        let items = vec![item(40, dec!(0)), item(1, dec!(3.20))];
        assert_eq!(LineItemCalculator::total_value(&items), dec!(3.20));
    }
}
