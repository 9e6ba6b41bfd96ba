use std::{
    cmp::Ordering,
    fmt,
    iter::Sum,
    marker::PhantomData,
    ops::Add,
};

pub trait DistanceUnit: Copy + Eq {
    const NAME: &'static str;
    const NANOMETERS_IN_UNIT: i64;
}

/// Distance stored as an integer number of nanometers, so sums of edge
/// distances are exact whatever the order of addition.
#[derive(Debug, Clone, Copy, Eq, Hash)]
pub struct Distance<T: DistanceUnit> {
    nm: i64,
    unit: PhantomData<T>,
}

macro_rules! create_distance_unit {
    ($struct_name:ident, $string_name:expr , $nm_conv:expr) => {
        #[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
        pub struct $struct_name;

        impl DistanceUnit for $struct_name {
            const NAME: &'static str = $string_name;
            const NANOMETERS_IN_UNIT: i64 = $nm_conv;
        }

        impl Distance<$struct_name> {
            pub fn new(value: i64) -> Distance<$struct_name> {
                Distance {
                    nm: value * $struct_name::NANOMETERS_IN_UNIT,
                    unit: PhantomData,
                }
            }

            #[inline(always)]
            pub fn value(&self) -> f64 {
                (self.nm as f64) / ($struct_name::NANOMETERS_IN_UNIT as f64)
            }
        }
    };
}

create_distance_unit!(Meters, "meter", 1_000_000_000);
create_distance_unit!(Kilometers, "kilometer", 1_000_000_000_000);

impl<T: DistanceUnit> Default for Distance<T> {
    fn default() -> Self {
        Distance {
            nm: 0,
            unit: PhantomData,
        }
    }
}

impl<T> From<Distance<T>> for f64
where
    T: DistanceUnit,
{
    fn from(value: Distance<T>) -> Self {
        (value.nm as f64) / T::NANOMETERS_IN_UNIT as f64
    }
}

impl<T> fmt::Display for Distance<T>
where
    T: DistanceUnit,
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let value: f64 = (self.nm as f64) / (T::NANOMETERS_IN_UNIT as f64);

        write!(
            f,
            "{} {}{}",
            value,
            T::NAME,
            match value {
                1_f64 => "",
                _ => "s",
            }
        )
    }
}

impl<T> Ord for Distance<T>
where
    T: DistanceUnit,
{
    fn cmp(&self, other: &Distance<T>) -> Ordering {
        self.nm.cmp(&other.nm)
    }
}

impl<T1, T2> PartialEq<Distance<T2>> for Distance<T1>
where
    T1: DistanceUnit,
    T2: DistanceUnit,
{
    fn eq(&self, other: &Distance<T2>) -> bool {
        self.nm == other.nm
    }
}

impl<T1, T2> PartialOrd<Distance<T2>> for Distance<T1>
where
    T1: DistanceUnit,
    T2: DistanceUnit,
{
    fn partial_cmp(&self, other: &Distance<T2>) -> Option<Ordering> {
        Some(self.nm.cmp(&other.nm))
    }
}

impl<T> From<f64> for Distance<T>
where
    T: DistanceUnit,
{
    fn from(value: f64) -> Self {
        Distance {
            nm: (value * (T::NANOMETERS_IN_UNIT as f64)).round() as i64,
            unit: PhantomData,
        }
    }
}

impl<T> From<i64> for Distance<T>
where
    T: DistanceUnit,
{
    fn from(value: i64) -> Self {
        Distance {
            nm: value * T::NANOMETERS_IN_UNIT,
            unit: PhantomData,
        }
    }
}

impl From<Distance<Kilometers>> for Distance<Meters> {
    fn from(value: Distance<Kilometers>) -> Self {
        Distance {
            nm: value.nm,
            unit: PhantomData,
        }
    }
}

impl<T1, T2> Add<Distance<T2>> for Distance<T1>
where
    T1: DistanceUnit,
    T2: DistanceUnit,
{
    type Output = Distance<T1>;

    fn add(self, other: Distance<T2>) -> Distance<T1> {
        Distance {
            nm: self.nm + other.nm,
            unit: PhantomData,
        }
    }
}

impl<T: DistanceUnit> Sum for Distance<T> {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Distance::default(), |total, distance| total + distance)
    }
}

macro_rules! meters {
    ($num:expr) => {
        $crate::distance::Distance::<$crate::distance::Meters>::from($num)
    };
}

#[allow(unused_macros)]
macro_rules! kilometers {
    ($num:expr) => {
        $crate::distance::Distance::<$crate::distance::Kilometers>::from($num)
    };
}

#[allow(unused_imports)]
pub(crate) use kilometers;
pub(crate) use meters;
