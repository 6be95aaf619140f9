use chrono::{DateTime, Duration, Utc};

/// Days between acknowledgment and the expected delivery
pub const DELIVERY_LEAD_DAYS: i64 = 5;

/// Dates set on an order when the vendor acknowledges it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Acknowledgment {
    pub acknowledged_at: DateTime<Utc>,
    pub delivery_date: DateTime<Utc>,
}

impl Acknowledgment {
    /// Acknowledge at `now`; delivery is expected `DELIVERY_LEAD_DAYS` later
    pub fn at(now: DateTime<Utc>) -> Self {
        Self {
            acknowledged_at: now,
            delivery_date: now + Duration::days(DELIVERY_LEAD_DAYS),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_delivery_is_five_days_after_acknowledgment() {
        let now = Utc.with_ymd_and_hms(2024, 2, 27, 17, 30, 15).unwrap();
        let ack = Acknowledgment::at(now);

        assert_eq!(ack.acknowledged_at, now);
        assert_eq!(ack.delivery_date - ack.acknowledged_at, Duration::days(5));
        assert_eq!(
            ack.delivery_date,
            Utc.with_ymd_and_hms(2024, 3, 3, 17, 30, 15).unwrap()
        );
    }
}
