use chrono::{DateTime, FixedOffset, Offset, Utc};
use rust_decimal::{Decimal, RoundingStrategy};

const SHORT_PATTERN: &str = "%d %b, %I:%M %p";
const LONG_PATTERN: &str = "%d %b %Y, %I:%M %p";
const CURRENCY_SYMBOL: &str = "S/";

pub const MISSING: &str = "-";

/// Renders instants in the deployment's wall-clock offset.
#[derive(Debug, Clone, Copy)]
pub struct DisplayFormat {
    offset: FixedOffset,
}

impl DisplayFormat {
    pub fn new(offset: FixedOffset) -> Self {
        Self { offset }
    }

    /// `offset_minutes` east of UTC; out-of-range values fall back to UTC.
    pub fn from_offset_minutes(offset_minutes: i32) -> Self {
        let offset = offset_minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
            .unwrap_or_else(utc_offset);
        Self { offset }
    }

    /// `dd MMM, hh:mm a`, used on list rows.
    pub fn short(&self, instant: Option<DateTime<Utc>>) -> String {
        self.render(instant, SHORT_PATTERN)
    }

    /// `dd MMM yyyy, hh:mm a`, used on the detail timeline.
    pub fn long(&self, instant: Option<DateTime<Utc>>) -> String {
        self.render(instant, LONG_PATTERN)
    }

    fn render(&self, instant: Option<DateTime<Utc>>, pattern: &str) -> String {
        match instant {
            Some(instant) => instant
                .with_timezone(&self.offset)
                .format(pattern)
                .to_string(),
            None => MISSING.to_string(),
        }
    }
}

impl Default for DisplayFormat {
    fn default() -> Self {
        Self::new(utc_offset())
    }
}

fn utc_offset() -> FixedOffset {
    Utc.fix()
}

pub fn format_amount(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    format!("{CURRENCY_SYMBOL} {rounded:.2}")
}

/// Groups an integer with commas: `12000` becomes `12,000`.
pub fn group_thousands(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);

    for (index, digit) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    if value < 0 {
        grouped.insert(0, '-');
    }
    grouped
}
