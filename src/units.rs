use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Sub, SubAssign};

pub(crate) const MINUTE_SECONDS: i64 = 60;
pub(crate) const HOUR_SECONDS: i64 = 3_600;
pub(crate) const DAY_SECONDS: i64 = 86_400;
pub(crate) const MONTH_SECONDS: i64 = 30 * DAY_SECONDS;
pub(crate) const YEAR_SECONDS: i64 = 365 * DAY_SECONDS;
pub(crate) const JULIAN_YEAR_SECONDS: f64 = 31_557_600.0;

pub(crate) const AU_KM: i64 = 149_597_871;
pub(crate) const EARTH_RADIUS_KM: f64 = 6_371.0;
pub(crate) const SOL_RADIUS_KM: i64 = 695_700;

/// Gravitational constant, m³·kg⁻¹·s⁻².
pub(crate) const G: f64 = 6.6743e-11;

pub(crate) const EARTH_MASS: Mass = Mass::kg(5.97237e24);
pub(crate) const SOL_MASS: Mass = Mass::kg(1.98847e30);

/// Mass in kilograms.
#[derive(Clone, Copy, Debug, Default, PartialEq, PartialOrd, Serialize, Deserialize)]
pub(crate) struct Mass(f64);

impl Mass {
    pub(crate) const fn kg(kg: f64) -> Self {
        Self(kg)
    }

    pub(crate) fn as_kg(self) -> f64 {
        self.0
    }
}

impl std::fmt::Display for Mass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.3e} kg", self.0)
    }
}

macro_rules! mass_ops {
    ($tr:ident, $f:ident, $atr:ident, $af:ident, $op:tt) => {
        impl $tr for Mass {
            type Output = Mass;
            fn $f(self, rhs: Mass) -> Mass {
                Mass(self.0 $op rhs.0)
            }
        }
        impl $tr<f64> for Mass {
            type Output = Mass;
            fn $f(self, rhs: f64) -> Mass {
                Mass(self.0 $op rhs)
            }
        }
        impl $atr for Mass {
            fn $af(&mut self, rhs: Mass) {
                self.0 = self.0 $op rhs.0;
            }
        }
        impl $atr<f64> for Mass {
            fn $af(&mut self, rhs: f64) {
                self.0 = self.0 $op rhs;
            }
        }
    };
}

mass_ops!(Add, add, AddAssign, add_assign, +);
mass_ops!(Sub, sub, SubAssign, sub_assign, -);
mass_ops!(Mul, mul, MulAssign, mul_assign, *);
mass_ops!(Div, div, DivAssign, div_assign, /);

/// Splits a duration in seconds into (years, months, days, hours, minutes, seconds)
/// using 365-day years and 30-day months.
pub(crate) fn split_duration(mut secs: i64) -> [i64; 6] {
    let mut out = [0i64; 6];
    let units = [
        YEAR_SECONDS,
        MONTH_SECONDS,
        DAY_SECONDS,
        HOUR_SECONDS,
        MINUTE_SECONDS,
        1,
    ];
    for (slot, unit) in out.iter_mut().zip(units) {
        *slot = secs / unit;
        secs %= unit;
    }
    out
}
