use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema, sqlx::Type, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
#[sqlx(type_name = "ENUM", rename_all = "lowercase")]
pub enum DiscountType {
    Percentage,
    Fixed,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PromoCode {
    pub id: i32,
    pub code: String,
    pub description: Option<String>,
    pub discount_type: DiscountType,
    pub discount_value: Decimal,
    pub max_usage: Option<i32>,
    pub usage_count: i32,
    pub min_booking_amount: Decimal,
    pub valid_from: NaiveDateTime,
    pub valid_until: NaiveDateTime,
    pub is_active: bool,
}

impl PromoCode {
    /// Discount this code grants on `subtotal`, capped at the subtotal so a
    /// fixed coupon can never drive the total negative.
    pub fn discount_for(&self, subtotal: Decimal) -> Decimal {
        let discount = match self.discount_type {
            DiscountType::Percentage => {
                subtotal * self.discount_value / Decimal::from(100)
            }
            DiscountType::Fixed => self.discount_value,
        };
        discount.min(subtotal).round_dp(2)
    }

    pub fn usage_exhausted(&self) -> bool {
        match self.max_usage {
            Some(max) => self.usage_count >= max,
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn promo(discount_type: DiscountType, value: Decimal) -> PromoCode {
        let day = NaiveDate::from_ymd_opt(2025, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        PromoCode {
            id: 1,
            code: "TEST".to_string(),
            description: None,
            discount_type,
            discount_value: value,
            max_usage: Some(10),
            usage_count: 0,
            min_booking_amount: Decimal::ZERO,
            valid_from: day,
            valid_until: day,
            is_active: true,
        }
    }

    #[test]
    fn percentage_discount_is_fraction_of_subtotal() {
        let p = promo(DiscountType::Percentage, Decimal::from(10));
        assert_eq!(p.discount_for(Decimal::from(200)), Decimal::from(20));
    }

    #[test]
    fn fixed_discount_is_capped_at_subtotal() {
        let p = promo(DiscountType::Fixed, Decimal::from(50));
        assert_eq!(p.discount_for(Decimal::from(30)), Decimal::from(30));
        assert_eq!(p.discount_for(Decimal::from(80)), Decimal::from(50));
    }

    #[test]
    fn usage_cap_respected() {
        let mut p = promo(DiscountType::Fixed, Decimal::ONE);
        assert!(!p.usage_exhausted());
        p.usage_count = 10;
        assert!(p.usage_exhausted());
        p.max_usage = None;
        assert!(!p.usage_exhausted());
    }
}
