use chrono::{DateTime, Utc};
use sqlx::FromRow;

use crate::purchase_orders::PurchaseOrderStatus;

const MILLIS_PER_DAY: f64 = 86_400_000.0;

/// The fields of a purchase order the metrics are computed from
#[derive(Debug, Clone, FromRow)]
pub struct OrderSnapshot {
    #[sqlx(try_from = "String")]
    pub status: PurchaseOrderStatus,
    pub delivery_date: Option<DateTime<Utc>>,
    pub quality_rating: Option<f64>,
    pub issue_date: DateTime<Utc>,
    pub acknowledgment_date: Option<DateTime<Utc>>,
}

impl OrderSnapshot {
    fn is_completed(&self) -> bool {
        self.status == PurchaseOrderStatus::Completed
    }
}

/// The four derived metrics of one vendor
///
/// `None` means "no applicable data", which is distinct from a 0% rate.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct VendorMetrics {
    pub on_time_delivery_rate: Option<f64>,
    pub quality_rating_avg: Option<f64>,
    pub average_response_time: Option<f64>,
    pub fulfillment_rate: Option<f64>,
}

/// Pure reductions over a vendor's purchase orders
pub struct MetricsEngine;

impl MetricsEngine {
    /// Compute all four metrics at instant `now`
    pub fn compute(orders: &[OrderSnapshot], now: DateTime<Utc>) -> VendorMetrics {
        VendorMetrics {
            on_time_delivery_rate: Self::on_time_delivery_rate(orders, now),
            quality_rating_avg: Self::quality_rating_avg(orders),
            average_response_time: Self::average_response_time(orders),
            fulfillment_rate: Self::fulfillment_rate(orders),
        }
    }

    /// Percentage of completed orders whose delivery date is at or before `now`
    ///
    /// A completed order without a delivery date counts as not on time.
    pub fn on_time_delivery_rate(orders: &[OrderSnapshot], now: DateTime<Utc>) -> Option<f64> {
        let completed: Vec<&OrderSnapshot> = orders.iter().filter(|o| o.is_completed()).collect();
        if completed.is_empty() {
            return None;
        }

        let on_time = completed
            .iter()
            .filter(|o| o.delivery_date.is_some_and(|delivered| delivered <= now))
            .count();

        Some(round2(percentage(on_time, completed.len())))
    }

    /// Mean quality rating over completed orders that carry a rating
    pub fn quality_rating_avg(orders: &[OrderSnapshot]) -> Option<f64> {
        let ratings: Vec<f64> = orders
            .iter()
            .filter(|o| o.is_completed())
            .filter_map(|o| o.quality_rating)
            .collect();

        mean(&ratings).map(round2)
    }

    /// Percentage of all orders that were completed
    ///
    /// Orders carry no issue tracking, so a completed order is one fulfilled
    /// without open issues.
    pub fn fulfillment_rate(orders: &[OrderSnapshot]) -> Option<f64> {
        if orders.is_empty() {
            return None;
        }

        let fulfilled = orders.iter().filter(|o| o.is_completed()).count();
        Some(round2(percentage(fulfilled, orders.len())))
    }

    /// Mean of `acknowledgment_date - issue_date` in fractional days over
    /// acknowledged orders
    pub fn average_response_time(orders: &[OrderSnapshot]) -> Option<f64> {
        let response_days: Vec<f64> = orders
            .iter()
            .filter_map(|o| {
                o.acknowledgment_date
                    .map(|acked| (acked - o.issue_date).num_milliseconds() as f64 / MILLIS_PER_DAY)
            })
            .collect();

        mean(&response_days).map(round2)
    }
}

fn percentage(part: usize, whole: usize) -> f64 {
    part as f64 / whole as f64 * 100.0
}

fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

/// Round to 2 decimal places
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 20, 12, 0, 0).unwrap()
    }

    fn order(status: PurchaseOrderStatus) -> OrderSnapshot {
        OrderSnapshot {
            status,
            delivery_date: None,
            quality_rating: None,
            issue_date: now() - Duration::days(10),
            acknowledgment_date: None,
        }
    }

    fn completed_delivered(days_ago: i64) -> OrderSnapshot {
        OrderSnapshot {
            delivery_date: Some(now() - Duration::days(days_ago)),
            ..order(PurchaseOrderStatus::Completed)
        }
    }

    #[test]
    fn test_no_completed_orders_yields_none() {
        let orders = vec![
            order(PurchaseOrderStatus::Pending),
            order(PurchaseOrderStatus::Canceled),
        ];

        assert_eq!(MetricsEngine::on_time_delivery_rate(&orders, now()), None);
        assert_eq!(MetricsEngine::quality_rating_avg(&orders), None);
        assert_eq!(MetricsEngine::fulfillment_rate(&orders), Some(0.0));
    }

    #[test]
    fn test_no_orders_at_all() {
        let metrics = MetricsEngine::compute(&[], now());
        assert_eq!(metrics, VendorMetrics::default());
    }

    #[test]
    fn test_all_completed_delivered_is_fully_on_time() {
        let mut orders: Vec<OrderSnapshot> = (1..=5).map(completed_delivered).collect();
        orders.extend((0..3).map(|_| order(PurchaseOrderStatus::Pending)));

        assert_eq!(MetricsEngine::on_time_delivery_rate(&orders, now()), Some(100.0));
        assert_eq!(MetricsEngine::fulfillment_rate(&orders), Some(62.5));
    }

    #[test]
    fn test_future_or_missing_delivery_is_not_on_time() {
        let orders = vec![
            completed_delivered(1),
            completed_delivered(-2),
            order(PurchaseOrderStatus::Completed),
        ];

        assert_eq!(MetricsEngine::on_time_delivery_rate(&orders, now()), Some(33.33));
    }

    #[test]
    fn test_delivery_exactly_now_is_on_time() {
        let orders = vec![completed_delivered(0)];
        assert_eq!(MetricsEngine::on_time_delivery_rate(&orders, now()), Some(100.0));
    }

    #[test]
    fn test_quality_average_ignores_unrated_and_open_orders() {
        let rated = |rating: f64, status| OrderSnapshot {
            quality_rating: Some(rating),
            ..order(status)
        };
        let orders = vec![
            rated(4.0, PurchaseOrderStatus::Completed),
            rated(3.0, PurchaseOrderStatus::Completed),
            rated(5.0, PurchaseOrderStatus::Completed),
            order(PurchaseOrderStatus::Completed),
            rated(1.0, PurchaseOrderStatus::Pending),
        ];

        assert_eq!(MetricsEngine::quality_rating_avg(&orders), Some(4.0));
    }

    #[test]
    fn test_quality_average_is_rounded() {
        let rated = |rating: f64| OrderSnapshot {
            quality_rating: Some(rating),
            ..order(PurchaseOrderStatus::Completed)
        };
        let orders = vec![rated(4.0), rated(4.0), rated(5.0)];

        assert_eq!(MetricsEngine::quality_rating_avg(&orders), Some(4.33));
    }

    #[test]
    fn test_average_response_time_in_days() {
        let issued = now() - Duration::days(10);
        let acked = |days: i64| OrderSnapshot {
            issue_date: issued,
            acknowledgment_date: Some(issued + Duration::days(days)),
            ..order(PurchaseOrderStatus::Pending)
        };
        let orders = vec![acked(2), acked(4), order(PurchaseOrderStatus::Pending)];

        assert_eq!(MetricsEngine::average_response_time(&orders), Some(3.0));
    }

    #[test]
    fn test_average_response_time_fractional_days() {
        let issued = now() - Duration::days(3);
        let orders = vec![OrderSnapshot {
            issue_date: issued,
            acknowledgment_date: Some(issued + Duration::hours(36)),
            ..order(PurchaseOrderStatus::Pending)
        }];

        assert_eq!(MetricsEngine::average_response_time(&orders), Some(1.5));
    }

    #[test]
    fn test_average_response_time_without_acknowledgments() {
        let orders = vec![order(PurchaseOrderStatus::Pending)];
        assert_eq!(MetricsEngine::average_response_time(&orders), None);
    }

    #[test]
    fn test_round2() {
        assert_eq!(round2(66.666_666), 66.67);
        assert_eq!(round2(3.0), 3.0);
        assert_eq!(round2(0.004), 0.0);
    }
}

#[cfg(test)]
mod property_tests {
    use super::*;
    use chrono::Duration;
    use proptest::prelude::*;

    fn status_strategy() -> impl Strategy<Value = PurchaseOrderStatus> {
        prop_oneof![
            Just(PurchaseOrderStatus::Pending),
            Just(PurchaseOrderStatus::Completed),
            Just(PurchaseOrderStatus::Canceled),
        ]
    }

    fn snapshot_strategy() -> impl Strategy<Value = OrderSnapshot> {
        (
            status_strategy(),
            proptest::option::of(-30i64..30),
            proptest::option::of(0.0f64..=5.0),
        )
            .prop_map(|(status, delivery_offset, quality_rating)| {
                let now = Utc::now();
                OrderSnapshot {
                    status,
                    delivery_date: delivery_offset.map(|d| now + Duration::days(d)),
                    quality_rating,
                    issue_date: now - Duration::days(40),
                    acknowledgment_date: None,
                }
            })
    }

    proptest! {
        /// Rates are percentages and present exactly when their population is non-empty
        #[test]
        fn prop_rates_are_bounded(orders in prop::collection::vec(snapshot_strategy(), 0..40)) {
            let metrics = MetricsEngine::compute(&orders, Utc::now());
            let completed = orders
                .iter()
                .filter(|o| o.status == PurchaseOrderStatus::Completed)
                .count();

            prop_assert_eq!(metrics.on_time_delivery_rate.is_some(), completed > 0);
            prop_assert_eq!(metrics.fulfillment_rate.is_some(), !orders.is_empty());

            for rate in [metrics.on_time_delivery_rate, metrics.fulfillment_rate].into_iter().flatten() {
                prop_assert!((0.0..=100.0).contains(&rate));
            }
            if let Some(avg) = metrics.quality_rating_avg {
                prop_assert!((0.0..=5.0).contains(&avg));
            }
        }
    }
}
