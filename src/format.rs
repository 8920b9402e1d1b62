//! Currency formatting for amounts shown in tables, timelines and feeds.
//!
//! Output follows the `en-US` currency style: symbol prefix for the common
//! codes (`$1,234.50`), the code otherwise (`CHF 1,234.50`), thousands
//! separators, two decimals, and a leading minus for negative amounts.

/// Formats amounts in one currency.
///
/// Construction resolves the symbol once; [`CurrencyFormatter::format`] is
/// then allocation-light and can be called per row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrencyFormatter {
    /// Upper-case ISO 4217 code.
    currency: String,
    /// Prefix printed before the digits.
    prefix: String,
}

#[cfg(test)]
thread_local! {
    /// Number of formatters built on the current thread.
    static CONSTRUCTED: core::cell::Cell<usize> = const { core::cell::Cell::new(0) };
}

/// Number of formatters built on the current test thread.
#[cfg(test)]
pub(crate) fn constructed_on_this_thread() -> usize {
    CONSTRUCTED.with(core::cell::Cell::get)
}

impl CurrencyFormatter {
    /// Creates a formatter for an ISO 4217 code. Blank codes mean `USD`.
    #[inline]
    #[must_use]
    pub fn new(currency: &str) -> Self {
        #[cfg(test)]
        CONSTRUCTED.with(|count| count.set(count.get().saturating_add(1)));

        let code = match currency.trim() {
            "" => "USD".to_owned(),
            other => other.to_ascii_uppercase(),
        };
        let prefix = match code.as_str() {
            "USD" => "$".to_owned(),
            "EUR" => "\u{20ac}".to_owned(),
            "GBP" => "\u{a3}".to_owned(),
            "JPY" => "\u{a5}".to_owned(),
            other => format!("{other}\u{a0}"),
        };
        Self {
            currency: code,
            prefix,
        }
    }

    /// Creates a US dollar formatter.
    #[inline]
    #[must_use]
    pub fn usd() -> Self {
        Self::new("USD")
    }

    /// Returns the currency code this formatter renders.
    #[inline]
    #[must_use]
    pub fn currency(&self) -> &str {
        &self.currency
    }

    /// Formats an amount, e.g. `-$1,234.50`.
    #[inline]
    #[must_use]
    pub fn format(&self, amount: f64) -> String {
        let fixed = format!("{:.2}", amount.abs());
        let (whole, cents) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
        let negative = amount < 0.0 && fixed.chars().any(|digit| digit != '0' && digit != '.');

        let mut out = String::with_capacity(fixed.len().saturating_add(8));
        if negative {
            out.push('-');
        }
        out.push_str(&self.prefix);
        out.push_str(&group_thousands(whole));
        out.push('.');
        out.push_str(cents);
        out
    }
}

impl Default for CurrencyFormatter {
    #[inline]
    fn default() -> Self {
        Self::usd()
    }
}

/// Inserts `,` between groups of three digits.
fn group_thousands(digits: &str) -> String {
    let len = digits.chars().count();
    let mut out = String::with_capacity(len.saturating_add(len.div_ceil(3)));
    for (index, digit) in digits.chars().enumerate() {
        if index > 0 && (len - index) % 3 == 0 {
            out.push(',');
        }
        out.push(digit);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_dollars_with_grouping() {
        let formatter = CurrencyFormatter::usd();
        assert_eq!(formatter.format(0.0), "$0.00");
        assert_eq!(formatter.format(5.5), "$5.50");
        assert_eq!(formatter.format(1234.5), "$1,234.50");
        assert_eq!(formatter.format(1_234_567.891), "$1,234,567.89");
    }

    #[test]
    fn formats_negative_amounts() {
        let formatter = CurrencyFormatter::usd();
        assert_eq!(formatter.format(-42.1), "-$42.10");
        assert_eq!(formatter.format(-0.001), "$0.00");
    }

    #[test]
    fn known_symbols_and_code_prefix() {
        assert_eq!(CurrencyFormatter::new("eur").format(10.0), "\u{20ac}10.00");
        assert_eq!(CurrencyFormatter::new("GBP").format(1000.0), "\u{a3}1,000.00");
        assert_eq!(CurrencyFormatter::new("CHF").format(3.0), "CHF\u{a0}3.00");
        assert_eq!(CurrencyFormatter::new(" ").currency(), "USD");
    }

    #[test]
    fn counts_constructions() {
        let before = constructed_on_this_thread();
        let formatter = CurrencyFormatter::default();
        for amount in [1.0, 2.0, 3.0] {
            let _text = formatter.format(amount);
        }
        assert_eq!(constructed_on_this_thread() - before, 1);
    }
}
