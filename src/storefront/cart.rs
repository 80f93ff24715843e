//! Cart totals shown in the storefront's cart panel.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

use crate::model::CartItem;

/// Sales tax applied to the subtotal (8%).
pub const TAX_RATE: Decimal = Decimal::from_parts(8, 0, 0, false, 2);
/// Flat shipping charge below the free-shipping threshold.
pub const SHIPPING_FEE: Decimal = Decimal::from_parts(599, 0, 0, false, 2);
/// Subtotals strictly above this ship free.
pub const FREE_SHIPPING_THRESHOLD: Decimal = Decimal::from_parts(50, 0, 0, false, 0);

/// Totals for a cart. Amounts are exact; tax is rounded to the cent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct CartSummary {
    /// Total units across all lines.
    pub item_count: i64,
    pub subtotal: Decimal,
    pub tax: Decimal,
    pub shipping: Decimal,
    pub total: Decimal,
    /// How much more to spend for free shipping; zero once it applies.
    pub free_shipping_remaining: Decimal,
}

fn to_cents(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

impl CartSummary {
    pub fn from_items(items: &[CartItem]) -> Self {
        if items.is_empty() {
            return Self::default();
        }

        let item_count = items.iter().map(|item| item.quantity).sum();
        let subtotal: Decimal = items.iter().map(CartItem::line_total).sum();
        let tax = to_cents(subtotal * TAX_RATE);
        let free_shipping = subtotal > FREE_SHIPPING_THRESHOLD;
        let shipping = if free_shipping { Decimal::ZERO } else { SHIPPING_FEE };
        let free_shipping_remaining = if free_shipping {
            Decimal::ZERO
        } else {
            FREE_SHIPPING_THRESHOLD - subtotal
        };

        Self {
            item_count,
            subtotal,
            tax,
            shipping,
            total: subtotal + tax + shipping,
            free_shipping_remaining,
        }
    }

    pub fn ships_free(&self) -> bool {
        self.shipping.is_zero()
    }
}

/// Format an amount as US dollars, e.g. `$1,234.50`.
pub fn format_price(amount: Decimal) -> String {
    let rounded = format!("{:.2}", to_cents(amount.abs()));
    let (dollars, cents) = rounded.split_once('.').unwrap_or((rounded.as_str(), "00"));

    let mut grouped = String::with_capacity(dollars.len() + dollars.len() / 3);
    for (i, digit) in dollars.chars().enumerate() {
        if i > 0 && (dollars.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if amount.is_sign_negative() && !to_cents(amount).is_zero() {
        "-"
    } else {
        ""
    };
    format!("{sign}${grouped}.{cents}")
}
