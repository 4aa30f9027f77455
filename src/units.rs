//! Unit types for the quantities reported by the upstream model.
//!
//! Values are stored in the model's native units (MWh, EUR, MW, km). Summary tables convert them
//! to presentation units with the scale factors defined here.

/// Factor converting MWh to TWh
pub const MWH_TO_TWH: f64 = 1e-6;

/// Factor converting EUR to billion EUR
pub const EUR_TO_BILLION_EUR: f64 = 1e-9;

/// Factor converting MW to GW
pub const MW_TO_GW: f64 = 1e-3;

/// Factor converting EUR to million EUR
pub const EUR_TO_MILLION_EUR: f64 = 1e-6;

macro_rules! unit_struct {
    ($name:ident, $unit:literal) => {
        #[doc = concat!("A quantity measured in ", $unit, ".")]
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            PartialOrd,
            Default,
            derive_more::Add,
            derive_more::Sub,
            serde::Deserialize,
            serde::Serialize,
        )]
        pub struct $name(pub f64);

        impl $name {
            /// Creates a new instance of the unit type from a f64 value.
            pub fn new(val: f64) -> Self {
                Self(val)
            }

            /// Returns the value of the unit type as a f64.
            pub fn value(self) -> f64 {
                self.0
            }
        }

        impl std::ops::Mul<Dimensionless> for $name {
            type Output = $name;
            fn mul(self, rhs: Dimensionless) -> $name {
                $name(self.0 * rhs.0)
            }
        }

        impl std::iter::Sum for $name {
            fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
                $name(iter.map(|x| x.0).sum())
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{} {}", self.0, $unit)
            }
        }
    };
}

macro_rules! impl_mul {
    ($Lhs:ty, $Rhs:ty, $Out:ty) => {
        impl std::ops::Mul<$Rhs> for $Lhs {
            type Output = $Out;
            fn mul(self, rhs: $Rhs) -> $Out {
                <$Out>::new(self.0 * rhs.0)
            }
        }
    };
}

/// A dimensionless quantity, such as a snapshot weighting
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, serde::Deserialize, serde::Serialize)]
pub struct Dimensionless(pub f64);

unit_struct!(Energy, "MWh");
unit_struct!(Money, "EUR");
unit_struct!(Capacity, "MW");
unit_struct!(Length, "km");
unit_struct!(MoneyPerCapacity, "EUR/MW");
unit_struct!(MoneyPerCapacityLength, "EUR/MW km");

impl_mul!(MoneyPerCapacity, Length, MoneyPerCapacityLength);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sum() {
        let total: Money = [Money(1.0), Money(2.5)].into_iter().sum();
        assert_eq!(total, Money(3.5));
    }

    #[test]
    fn test_mul() {
        assert_eq!(
            MoneyPerCapacity(2.0) * Length(3.0),
            MoneyPerCapacityLength(6.0)
        );
        assert_eq!(Energy(2.0) * Dimensionless(0.5), Energy(1.0));
    }

    #[test]
    fn test_display() {
        assert_eq!(Capacity(10.0).to_string(), "10 MW");
    }
}
