//! Token amounts and the symbols that identify them.

use core::str::FromStr;
use serde::{Deserialize, Serialize};

use crate::error::{LedgerError, LedgerResult};

/// Longest symbol code accepted.
pub const MAX_SYMBOL_LEN: usize = 7;

/// Highest decimal precision accepted.
pub const MAX_PRECISION: u8 = 18;

/// Identifier of one fungible asset type: a short code plus decimal precision.
///
/// Two symbols are equal only if both the code and the precision match.
/// Deserialized symbols are not checked; call [`SymbolCode::validate`] at the
/// operation boundary.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SymbolCode {
    code: String,
    precision: u8,
}

impl SymbolCode {
    pub fn new(code: impl Into<String>, precision: u8) -> LedgerResult<Self> {
        let symbol = Self {
            code: code.into(),
            precision,
        };
        symbol.validate()?;
        Ok(symbol)
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn precision(&self) -> u8 {
        self.precision
    }

    pub fn validate(&self) -> LedgerResult<()> {
        if self.code.is_empty() || self.code.len() > MAX_SYMBOL_LEN {
            return Err(LedgerError::invalid_symbol(format!(
                "code must be 1..={MAX_SYMBOL_LEN} characters, got {:?}",
                self.code
            )));
        }
        if !self
            .code
            .bytes()
            .all(|b| b.is_ascii_uppercase() || b.is_ascii_digit())
        {
            return Err(LedgerError::invalid_symbol(format!(
                "code must be uppercase alphanumeric, got {:?}",
                self.code
            )));
        }
        if self.precision > MAX_PRECISION {
            return Err(LedgerError::invalid_symbol(format!(
                "precision must be 0..={MAX_PRECISION}, got {}",
                self.precision
            )));
        }
        Ok(())
    }

    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }

    /// An asset of `amount` smallest units of this symbol.
    pub fn asset(&self, amount: i64) -> Asset {
        Asset::new(amount, self.clone())
    }

    /// The zero asset of this symbol.
    pub fn zero(&self) -> Asset {
        self.asset(0)
    }
}

/// Rendered as `"<precision>,<CODE>"`, e.g. `4,TOK`.
impl core::fmt::Display for SymbolCode {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{},{}", self.precision, self.code)
    }
}

impl FromStr for SymbolCode {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (precision, code) = s
            .trim()
            .split_once(',')
            .ok_or_else(|| LedgerError::invalid_symbol(format!("expected '<precision>,<CODE>', got {s:?}")))?;
        let precision: u8 = precision
            .trim()
            .parse()
            .map_err(|_| LedgerError::invalid_symbol(format!("bad precision in {s:?}")))?;
        Self::new(code.trim(), precision)
    }
}

/// An amount in smallest units paired with its symbol.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Asset {
    pub amount: i64,
    pub symbol: SymbolCode,
}

impl Asset {
    pub fn new(amount: i64, symbol: SymbolCode) -> Self {
        Self { amount, symbol }
    }

    pub fn is_positive(&self) -> bool {
        self.amount > 0
    }

    pub fn checked_add(&self, other: &Asset) -> LedgerResult<Asset> {
        self.ensure_same_symbol(other)?;
        let amount = self
            .amount
            .checked_add(other.amount)
            .ok_or(LedgerError::ArithmeticOverflow)?;
        Ok(Asset::new(amount, self.symbol.clone()))
    }

    pub fn checked_sub(&self, other: &Asset) -> LedgerResult<Asset> {
        self.ensure_same_symbol(other)?;
        let amount = self
            .amount
            .checked_sub(other.amount)
            .ok_or(LedgerError::ArithmeticOverflow)?;
        Ok(Asset::new(amount, self.symbol.clone()))
    }

    fn ensure_same_symbol(&self, other: &Asset) -> LedgerResult<()> {
        if self.symbol != other.symbol {
            return Err(LedgerError::SymbolMismatch);
        }
        Ok(())
    }
}

/// Rendered with `precision` fractional digits, e.g. `1.0000 TOK` or `100 WJ`.
impl core::fmt::Display for Asset {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let sign = if self.amount < 0 { "-" } else { "" };
        let magnitude = self.amount.unsigned_abs();
        let precision = self.symbol.precision as u32;
        if precision == 0 {
            return write!(f, "{sign}{magnitude} {}", self.symbol.code);
        }
        // Unvalidated (deserialized) symbols may carry an unrepresentable precision.
        let Some(scale) = 10u64.checked_pow(precision) else {
            return write!(f, "{} {}", self.amount, self.symbol);
        };
        write!(
            f,
            "{sign}{}.{:0width$} {}",
            magnitude / scale,
            magnitude % scale,
            self.symbol.code,
            width = precision as usize
        )
    }
}

/// Parses `"<amount> <CODE>"`; the number of fractional digits fixes the precision.
impl FromStr for Asset {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (number, code) = s
            .trim()
            .split_once(' ')
            .ok_or_else(|| LedgerError::invalid_asset(format!("expected '<amount> <CODE>', got {s:?}")))?;

        let (negative, digits) = match number.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, number),
        };
        let (whole, fraction) = digits.split_once('.').unwrap_or((digits, ""));
        if whole.is_empty()
            || !whole.bytes().all(|b| b.is_ascii_digit())
            || !fraction.bytes().all(|b| b.is_ascii_digit())
            || (digits.contains('.') && fraction.is_empty())
        {
            return Err(LedgerError::invalid_asset(format!("bad amount {number:?}")));
        }
        if fraction.len() > MAX_PRECISION as usize {
            return Err(LedgerError::invalid_asset(format!("too many decimals in {number:?}")));
        }

        let symbol = SymbolCode::new(code.trim(), fraction.len() as u8)?;
        let overflow = || LedgerError::invalid_asset(format!("amount out of range: {number:?}"));
        let mut units: i128 = whole.parse().map_err(|_| overflow())?;
        units = units
            .checked_mul(10i128.pow(fraction.len() as u32))
            .ok_or_else(overflow)?;
        if !fraction.is_empty() {
            let fractional: i128 = fraction.parse().map_err(|_| overflow())?;
            units = units.checked_add(fractional).ok_or_else(overflow)?;
        }
        if negative {
            units = -units;
        }
        let amount = i64::try_from(units).map_err(|_| overflow())?;

        Ok(Asset::new(amount, symbol))
    }
}

/// Maximum supply of a token: either a hard cap or unbounded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "cap")]
pub enum SupplyCap {
    Unbounded,
    Capped(Asset),
}

impl SupplyCap {
    /// Interpret a max-supply asset in which a negative amount means "no cap".
    pub fn from_max_supply(max_supply: Asset) -> Self {
        if max_supply.amount < 0 {
            SupplyCap::Unbounded
        } else {
            SupplyCap::Capped(max_supply)
        }
    }

    /// Whether `supply` stays within this cap.
    pub fn admits(&self, supply: &Asset) -> bool {
        match self {
            SupplyCap::Unbounded => true,
            SupplyCap::Capped(cap) => supply.amount <= cap.amount,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tok(precision: u8) -> SymbolCode {
        SymbolCode::new("TOK", precision).unwrap()
    }

    #[test]
    fn symbol_validation_rejects_malformed_codes() {
        assert!(SymbolCode::new("", 0).is_err());
        assert!(SymbolCode::new("TOOLONGX", 0).is_err());
        assert!(SymbolCode::new("tok", 0).is_err());
        assert!(SymbolCode::new("TO-K", 0).is_err());
        assert!(SymbolCode::new("TOK", 19).is_err());
        assert!(SymbolCode::new("A1B2C3D", 18).is_ok());
    }

    #[test]
    fn deserialized_symbols_are_checked_on_demand() {
        let raw: SymbolCode =
            serde_json::from_str(r#"{"code":"bad","precision":2}"#).unwrap();
        assert!(matches!(raw.validate(), Err(LedgerError::InvalidSymbol(_))));
    }

    #[test]
    fn symbol_text_form() {
        let sym: SymbolCode = "4,TOK".parse().unwrap();
        assert_eq!(sym, tok(4));
        assert_eq!(sym.to_string(), "4,TOK");
        assert!("TOK".parse::<SymbolCode>().is_err());
    }

    #[test]
    fn precision_is_part_of_identity() {
        let a = tok(0).asset(1);
        let b = tok(2).asset(1);
        assert_eq!(a.checked_add(&b).unwrap_err(), LedgerError::SymbolMismatch);
    }

    #[test]
    fn arithmetic_overflow_is_detected() {
        let max = tok(0).asset(i64::MAX);
        let one = tok(0).asset(1);
        assert_eq!(max.checked_add(&one).unwrap_err(), LedgerError::ArithmeticOverflow);

        let min = tok(0).asset(i64::MIN);
        assert_eq!(min.checked_sub(&one).unwrap_err(), LedgerError::ArithmeticOverflow);
        assert_eq!(max.checked_sub(&one).unwrap().amount, i64::MAX - 1);
    }

    #[test]
    fn asset_display_uses_precision() {
        assert_eq!(tok(4).asset(10_000).to_string(), "1.0000 TOK");
        assert_eq!(tok(2).asset(-5).to_string(), "-0.05 TOK");
        assert_eq!(tok(0).asset(100).to_string(), "100 TOK");
        assert_eq!(tok(0).asset(i64::MIN).to_string(), "-9223372036854775808 TOK");
    }

    #[test]
    fn asset_parse() {
        assert_eq!("1.0000 TOK".parse::<Asset>().unwrap(), tok(4).asset(10_000));
        assert_eq!("100 TOK".parse::<Asset>().unwrap(), tok(0).asset(100));
        assert_eq!("-0.05 TOK".parse::<Asset>().unwrap(), tok(2).asset(-5));
        assert!("1. TOK".parse::<Asset>().is_err());
        assert!("1.0 tok".parse::<Asset>().is_err());
        assert!("99999999999999999999 TOK".parse::<Asset>().is_err());
        assert!("100TOK".parse::<Asset>().is_err());
        // Whole part scales into i128; adding the fraction does not.
        assert!(matches!(
            "170141183460469231731.999999999999999999 TOK".parse::<Asset>(),
            Err(LedgerError::InvalidAsset(_))
        ));
    }

    #[test]
    fn display_tolerates_unvalidated_precision() {
        let wide: SymbolCode = serde_json::from_str(r#"{"code":"TOK","precision":40}"#).unwrap();
        assert_eq!(wide.asset(1).to_string(), "1 40,TOK");
    }

    #[test]
    fn negative_max_supply_means_unbounded() {
        assert_eq!(SupplyCap::from_max_supply(tok(0).asset(-1)), SupplyCap::Unbounded);
        let cap = SupplyCap::from_max_supply(tok(0).asset(10));
        assert!(cap.admits(&tok(0).asset(10)));
        assert!(!cap.admits(&tok(0).asset(11)));
        assert!(SupplyCap::Unbounded.admits(&tok(0).asset(i64::MAX)));
    }
}
