//! Physical quantity value types.
//!
//! `Time` (s), `Wavelength` (nm) and `Signal` (OD) are immutable wrappers around a
//! single `f64` in their canonical unit.
//!
//! Ordering and equality are tolerance based: two values compare equal when
//! `|a - b| < ε·max(|a|, |b|)` with `ε = f64::EPSILON`. Every comparison operator
//! (and therefore every sort, dedup and range lookup) goes through
//! [`compare_values`], so nearest-value searches agree with `==`.
//!
//! Near ties make the ordering a total *preorder*; that is accepted.

use std::cmp::Ordering;
use std::ops::{Add, Div, Mul, Neg, Sub};

use crate::domain::scientific::UnitDescriptor;
use crate::error::AppError;

/// Photon energy (eV) times wavelength (nm).
const WL_TO_ENERGY: f64 = 1239.841984;

/// Tolerance-based comparison shared by all quantities.
pub fn compare_values(a: f64, b: f64) -> Ordering {
    if a == b || (a - b).abs() < f64::EPSILON * a.abs().max(b.abs()) {
        return Ordering::Equal;
    }
    a.total_cmp(&b)
}

/// Contract shared by every physical quantity.
pub trait PhysicalQuantity: Copy + Ord + std::fmt::Debug + UnitDescriptor {
    /// Canonical constructor from the wrapped unit.
    fn from_f64(value: f64) -> Result<Self, AppError>;

    /// The wrapped value in the canonical unit.
    fn value(self) -> f64;

    /// Round to `significance` significant digits with the default rounding
    /// (half away from zero).
    fn round(self, significance: i32) -> Result<Self, AppError> {
        self.round_with(significance, f64::round)
    }

    /// Round to `significance` significant digits with a custom rounding function.
    fn round_with<F: Fn(f64) -> f64>(self, significance: i32, round: F) -> Result<Self, AppError> {
        let v = self.value();
        if v == 0.0 {
            return Self::from_f64(0.0);
        }
        let scale = 10f64.powf(v.abs().log10().floor() - significance as f64 + 1.0);
        Self::from_f64(round(v / scale) * scale)
    }
}

/// Ratio-scale quantities: a true zero exists, so scaling, absolute values and
/// logarithms are meaningful.
pub trait RatioScale:
    PhysicalQuantity + Mul<f64, Output = Self> + Div<f64, Output = Self> + Neg<Output = Self>
{
    const ZERO: Self;

    fn abs(self) -> Self;

    /// Natural logarithm.
    fn ln(self) -> Self;

    /// Base-10 logarithm.
    fn log10(self) -> Self;
}

macro_rules! tolerance_ordering {
    ($ty:ty) => {
        impl PartialEq for $ty {
            fn eq(&self, other: &Self) -> bool {
                self.cmp(other) == Ordering::Equal
            }
        }

        impl Eq for $ty {}

        impl PartialOrd for $ty {
            fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
                Some(self.cmp(other))
            }
        }

        impl Ord for $ty {
            fn cmp(&self, other: &Self) -> Ordering {
                compare_values(self.0, other.0)
            }
        }
    };
}

macro_rules! ratio_scale_ops {
    ($ty:ident) => {
        impl Add for $ty {
            type Output = $ty;
            fn add(self, rhs: $ty) -> $ty {
                $ty(self.0 + rhs.0)
            }
        }

        impl Sub for $ty {
            type Output = $ty;
            fn sub(self, rhs: $ty) -> $ty {
                $ty(self.0 - rhs.0)
            }
        }

        impl Neg for $ty {
            type Output = $ty;
            fn neg(self) -> $ty {
                $ty(-self.0)
            }
        }

        impl Mul<f64> for $ty {
            type Output = $ty;
            fn mul(self, rhs: f64) -> $ty {
                $ty(self.0 * rhs)
            }
        }

        impl Mul<$ty> for f64 {
            type Output = $ty;
            fn mul(self, rhs: $ty) -> $ty {
                $ty(self * rhs.0)
            }
        }

        impl Div<f64> for $ty {
            type Output = $ty;
            fn div(self, rhs: f64) -> $ty {
                $ty(self.0 / rhs)
            }
        }

        /// Ratio of two values of the same kind, kept in the same type.
        impl Div for $ty {
            type Output = $ty;
            fn div(self, rhs: $ty) -> $ty {
                $ty(self.0 / rhs.0)
            }
        }

        impl RatioScale for $ty {
            const ZERO: $ty = $ty(0.0);

            fn abs(self) -> $ty {
                $ty(self.0.abs())
            }

            fn ln(self) -> $ty {
                $ty(self.0.ln())
            }

            fn log10(self) -> $ty {
                $ty(self.0.log10())
            }
        }
    };
}

// ---------------------------------------------------------------------------
// Time
// ---------------------------------------------------------------------------

/// A delay time, in seconds. Negative values are pre-pump.
#[derive(Debug, Clone, Copy, Default)]
pub struct Time(f64);

impl Time {
    pub const ZERO: Time = Time(0.0);

    pub const fn new(seconds: f64) -> Self {
        Self(seconds)
    }

    pub fn seconds(self) -> f64 {
        self.0
    }

    pub fn as_millis(self) -> f64 {
        self.0 * 1e3
    }

    pub fn as_micros(self) -> f64 {
        self.0 * 1e6
    }

    pub fn as_nanos(self) -> f64 {
        self.0 * 1e9
    }

    pub fn as_picos(self) -> f64 {
        self.0 * 1e12
    }

    pub fn as_femtos(self) -> f64 {
        self.0 * 1e15
    }
}

impl UnitDescriptor for Time {
    const UNIT: &'static str = "s";
    const ACCEPTS_SI_PREFIX: bool = true;
    const DEFAULT_VALUE: f64 = 0.0;
}

impl PhysicalQuantity for Time {
    fn from_f64(value: f64) -> Result<Self, AppError> {
        Ok(Self(value))
    }

    fn value(self) -> f64 {
        self.0
    }
}

tolerance_ordering!(Time);
ratio_scale_ops!(Time);

// ---------------------------------------------------------------------------
// Signal
// ---------------------------------------------------------------------------

/// A transient absorption signal, in OD.
#[derive(Debug, Clone, Copy, Default)]
pub struct Signal(f64);

impl Signal {
    pub const ZERO: Signal = Signal(0.0);

    pub const fn new(od: f64) -> Self {
        Self(od)
    }

    pub fn od(self) -> f64 {
        self.0
    }

    pub fn milli_od(self) -> f64 {
        self.0 * 1e3
    }

    pub fn micro_od(self) -> f64 {
        self.0 * 1e6
    }

    pub fn absolute(self) -> Self {
        Self(self.0.abs())
    }
}

impl UnitDescriptor for Signal {
    const UNIT: &'static str = "OD";
    const ACCEPTS_SI_PREFIX: bool = true;
    const DEFAULT_VALUE: f64 = 0.0;
}

impl PhysicalQuantity for Signal {
    fn from_f64(value: f64) -> Result<Self, AppError> {
        Ok(Self(value))
    }

    fn value(self) -> f64 {
        self.0
    }
}

tolerance_ordering!(Signal);
ratio_scale_ops!(Signal);

// ---------------------------------------------------------------------------
// Wavelength
// ---------------------------------------------------------------------------

/// A probe wavelength, in nm. Always strictly positive.
#[derive(Debug, Clone, Copy)]
pub struct Wavelength(f64);

impl Wavelength {
    pub fn new(nm: f64) -> Result<Self, AppError> {
        if !nm.is_finite() || nm <= 0.0 {
            return Err(AppError::invalid_value(format!(
                "Wavelength must be a positive finite value, got {nm} nm."
            )));
        }
        Ok(Self(nm))
    }

    pub fn nanometers(self) -> f64 {
        self.0
    }

    /// Photon energy in eV.
    pub fn energy_ev(self) -> f64 {
        WL_TO_ENERGY / self.0
    }

    pub fn from_energy_ev(energy: f64) -> Result<Self, AppError> {
        Self::new(WL_TO_ENERGY / energy)
    }

    pub fn checked_add(self, rhs: Wavelength) -> Result<Self, AppError> {
        Self::new(self.0 + rhs.0)
    }

    /// Difference of two wavelengths. Fails unless `self > rhs`.
    pub fn checked_sub(self, rhs: Wavelength) -> Result<Self, AppError> {
        Self::new(self.0 - rhs.0)
    }
}

impl UnitDescriptor for Wavelength {
    const UNIT: &'static str = "nm";
    const ACCEPTS_SI_PREFIX: bool = false;
    const DEFAULT_VALUE: f64 = 532.0;
}

impl PhysicalQuantity for Wavelength {
    fn from_f64(value: f64) -> Result<Self, AppError> {
        Self::new(value)
    }

    fn value(self) -> f64 {
        self.0
    }
}

impl std::fmt::Display for Wavelength {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} nm", self.0)
    }
}

tolerance_ordering!(Wavelength);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn equality_is_tolerance_based() {
        let a = Time::new(1.0);
        let b = Time::new(1.0 + f64::EPSILON / 2.0);
        assert_eq!(a, b);
        assert!(a <= b && a >= b);
        assert_ne!(Time::new(1.0), Time::new(1.000001));
        assert!(Time::new(-1.0) < Time::ZERO);
    }

    #[test]
    fn wavelength_rejects_non_positive_values() {
        assert_eq!(Wavelength::new(0.0).unwrap_err().kind(), ErrorKind::InvalidValue);
        assert_eq!(Wavelength::new(-5.0).unwrap_err().kind(), ErrorKind::InvalidValue);
        assert!(Wavelength::new(f64::NAN).is_err());
        let wl = Wavelength::new(500.0).unwrap();
        assert!(wl.checked_sub(Wavelength::new(600.0).unwrap()).is_err());
    }

    #[test]
    fn ratio_scale_arithmetic() {
        let t = Time::new(2e-6);
        assert_eq!(t * 2.0, Time::new(4e-6));
        assert_eq!(3.0 * t, Time::new(6e-6));
        assert_eq!(t / 2.0, Time::new(1e-6));
        assert_eq!((t / Time::new(1e-6)).seconds(), 2.0);
        assert_eq!(-t, Time::new(-2e-6));
        assert_eq!(Signal::new(-0.5).abs(), Signal::new(0.5));
        assert!((Signal::new(100.0).log10().od() - 2.0).abs() < 1e-12);
        assert!((Signal::new(std::f64::consts::E).ln().od() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn round_to_significant_digits() {
        let t = Time::new(1.23456e-6).round(3).unwrap();
        assert!((t.seconds() - 1.23e-6).abs() < 1e-18);

        let floored = Signal::new(0.0199).round_with(1, f64::floor).unwrap();
        assert!((floored.od() - 0.01).abs() < 1e-15);

        assert_eq!(Signal::new(2.5).round(1).unwrap(), Signal::new(3.0));
        assert_eq!(Time::ZERO.round(3).unwrap(), Time::ZERO);
    }

    #[test]
    fn unit_views() {
        let t = Time::new(1.5e-6);
        assert!((t.as_micros() - 1.5).abs() < 1e-9);
        assert!((t.as_nanos() - 1500.0).abs() < 1e-6);
        assert!((Signal::new(0.002).milli_od() - 2.0).abs() < 1e-12);

        let wl = Wavelength::new(620.0).unwrap();
        assert!((wl.energy_ev() - 1.99974513548).abs() < 1e-9);
        let back = Wavelength::from_energy_ev(wl.energy_ev()).unwrap();
        assert!((back.nanometers() - 620.0).abs() < 1e-9);
    }

    #[test]
    fn sorting_uses_quantity_order() {
        let mut v = vec![Time::new(3.0), Time::new(-1.0), Time::new(2.0)];
        v.sort();
        assert_eq!(v, vec![Time::new(-1.0), Time::new(2.0), Time::new(3.0)]);
    }
}
