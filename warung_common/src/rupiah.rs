use std::{
    fmt::Display,
    iter::Sum,
    ops::{Add, Mul, Sub, SubAssign},
};

use serde::{Deserialize, Serialize};
use sqlx::Type;
use thiserror::Error;

use crate::op;

//--------------------------------------      Rupiah       -----------------------------------------------------------
/// An amount of Indonesian Rupiah, stored in the minor currency unit as a signed 64-bit integer.
#[derive(Debug, Clone, Copy, Default, Type, Ord, PartialOrd, Serialize, Deserialize)]
#[sqlx(transparent)]
pub struct Rupiah(i64);

op!(binary Rupiah, Add, add);
op!(binary Rupiah, Sub, sub);
op!(inplace Rupiah, SubAssign, sub_assign);

impl Mul<i64> for Rupiah {
    type Output = Self;

    fn mul(self, rhs: i64) -> Self::Output {
        Self::from(self.value() * rhs)
    }
}

impl Sum for Rupiah {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), Add::add)
    }
}

#[derive(Debug, Clone, Error)]
#[error("Value cannot be represented in Rupiah: {0}")]
pub struct RupiahConversionError(String);

impl From<i64> for Rupiah {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl PartialEq for Rupiah {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl Eq for Rupiah {}

impl TryFrom<u64> for Rupiah {
    type Error = RupiahConversionError;

    fn try_from(value: u64) -> Result<Self, Self::Error> {
        if value > i64::MAX as u64 {
            Err(RupiahConversionError(format!("Value {} is too large to convert to Rupiah", value)))
        } else {
            #[allow(clippy::cast_possible_wrap)]
            Ok(Self(value as i64))
        }
    }
}

impl Display for Rupiah {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let (sign, abs) = if self.0 < 0 { ("-", self.0.unsigned_abs()) } else { ("", self.0.unsigned_abs()) };
        write!(f, "{sign}Rp{}", group_thousands(abs))
    }
}

impl Rupiah {
    pub fn value(&self) -> i64 {
        self.0
    }

    pub fn is_positive(&self) -> bool {
        self.0 > 0
    }
}

/// Formats an integer with `.` as the thousands separator, as is customary for Rupiah amounts.
fn group_thousands(mut value: u64) -> String {
    let mut groups = Vec::new();
    loop {
        let group = value % 1000;
        value /= 1000;
        if value == 0 {
            groups.push(format!("{group}"));
            break;
        }
        groups.push(format!("{group:03}"));
    }
    groups.reverse();
    groups.join(".")
}

#[cfg(test)]
mod test {
    use super::Rupiah;

    #[test]
    fn display_groups_thousands() {
        assert_eq!(Rupiah::from(0).to_string(), "Rp0");
        assert_eq!(Rupiah::from(950).to_string(), "Rp950");
        assert_eq!(Rupiah::from(10_000).to_string(), "Rp10.000");
        assert_eq!(Rupiah::from(1_250_500).to_string(), "Rp1.250.500");
        assert_eq!(Rupiah::from(-7_000).to_string(), "-Rp7.000");
    }

    #[test]
    fn arithmetic() {
        let total = Rupiah::from(10_000) * 2 + Rupiah::from(500);
        assert_eq!(total, Rupiah::from(20_500));
        assert_eq!(total - Rupiah::from(500), Rupiah::from(20_000));
        let sum: Rupiah = vec![Rupiah::from(1), Rupiah::from(2), Rupiah::from(3)].into_iter().sum();
        assert_eq!(sum.value(), 6);
    }
}
