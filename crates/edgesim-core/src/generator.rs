//! Metric value generator.
//!
//! The data type of a metric depends only on its index: `index % 13` walks
//! [`MetricDataType::ALL`] in order. The value is random. Fixtures downstream
//! rely on this index→type mapping, so the rotation order must not change.
//!
//! # Value ranges
//!
//! | r  | type     | [`ValueRanges::Legacy`]   | [`ValueRanges::Nominal`] |
//! |----|----------|---------------------------|--------------------------|
//! | 0  | Int8     | any `i8`                  | any `i8`                 |
//! | 1  | Int16    | `[0, 32767]`              | any `i16`                |
//! | 2  | Int32    | any `i32`                 | any `i32`                |
//! | 3  | Int64    | any `i64`                 | any `i64`                |
//! | 4  | UInt8    | `[0, 32767]`              | any `u8`                 |
//! | 5  | UInt16   | any `i32`                 | any `u16`                |
//! | 6  | UInt32   | any `i64`                 | any `u32`                |
//! | 7  | UInt64   | any `u64`                 | any `u64`                |
//! | 8  | Float    | `[0, 1)`                  | `[0, 1)`                 |
//! | 9  | Double   | `[0, 1)`                  | `[0, 1)`                 |
//! | 10 | String   | 8 upper alphanumerics     | same                     |
//! | 11 | DateTime | any `i64` ms tick         | same                     |
//! | 12 | Text     | 8 upper alphanumerics     | same                     |
//!
//! `Legacy` reproduces ranges that older consumers were fed, including
//! negative `UInt16`/`UInt32` values and non-negative-only `Int16`.

use log::debug;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::metric::{Metric, MetricBuilder, MetricDataType, MetricValue};
use crate::rng::alphanumeric_upper;

/// Length of the rotation.
pub const ROTATION_LEN: u32 = 13;

/// Length of generated `String` and `Text` values.
pub const STRING_LEN: usize = 8;

/// Which integer ranges to draw from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueRanges {
    /// Every kind is drawn over its nominal bit width.
    #[default]
    Nominal,
    /// Compatibility ranges (see module docs).
    Legacy,
}

impl std::fmt::Display for ValueRanges {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Nominal => write!(f, "nominal"),
            Self::Legacy => write!(f, "legacy"),
        }
    }
}

/// Data type assigned to `index`.
pub fn data_type_for_index(index: u32) -> MetricDataType {
    MetricDataType::ALL[(index % ROTATION_LEN) as usize]
}

/// Metric name for `prefix` and `index`, e.g. `NT-4`.
pub fn metric_name(prefix: &str, index: u32) -> String {
    format!("{prefix}-{index}")
}

/// Generate the metric at `index`.
pub fn random_metric<R: Rng + ?Sized>(
    rng: &mut R,
    prefix: &str,
    index: u32,
    ranges: ValueRanges,
) -> Result<Metric> {
    let data_type = data_type_for_index(index);
    let value = random_value(rng, data_type, ranges);
    debug!("generated {prefix}-{index} as {data_type}");
    MetricBuilder::new(metric_name(prefix, index), data_type, value).build()
}

/// Draw a random value of `data_type`.
pub fn random_value<R: Rng + ?Sized>(
    rng: &mut R,
    data_type: MetricDataType,
    ranges: ValueRanges,
) -> MetricValue {
    let legacy = ranges == ValueRanges::Legacy;
    match data_type {
        MetricDataType::Int8 => {
            let mut byte = [0u8; 1];
            rng.fill_bytes(&mut byte);
            MetricValue::Int8(byte[0] as i8)
        }
        MetricDataType::Int16 if legacy => MetricValue::Int16(rng.random_range(0..=i16::MAX)),
        MetricDataType::Int16 => MetricValue::Int16(rng.random()),
        MetricDataType::Int32 => MetricValue::Int32(rng.random()),
        MetricDataType::Int64 => MetricValue::Int64(rng.random()),
        MetricDataType::UInt8 if legacy => MetricValue::UInt8(rng.random_range(0..=i16::MAX)),
        MetricDataType::UInt8 => MetricValue::UInt8(i16::from(rng.random::<u8>())),
        MetricDataType::UInt16 if legacy => MetricValue::UInt16(rng.random()),
        MetricDataType::UInt16 => MetricValue::UInt16(i32::from(rng.random::<u16>())),
        MetricDataType::UInt32 if legacy => MetricValue::UInt32(rng.random()),
        MetricDataType::UInt32 => MetricValue::UInt32(i64::from(rng.random::<u32>())),
        MetricDataType::UInt64 => MetricValue::UInt64(rng.random()),
        MetricDataType::Float => MetricValue::Float(rng.random()),
        MetricDataType::Double => MetricValue::Double(rng.random()),
        MetricDataType::String => MetricValue::String(alphanumeric_upper(rng, STRING_LEN)),
        MetricDataType::DateTime => MetricValue::DateTime(rng.random()),
        MetricDataType::Text => MetricValue::Text(alphanumeric_upper(rng, STRING_LEN)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::seeded;

    // -----------------------------------------------------------------------
    // Rotation
    // -----------------------------------------------------------------------

    #[test]
    fn test_rotation_table() {
        let expected = [
            MetricDataType::Int8,
            MetricDataType::Int16,
            MetricDataType::Int32,
            MetricDataType::Int64,
            MetricDataType::UInt8,
            MetricDataType::UInt16,
            MetricDataType::UInt32,
            MetricDataType::UInt64,
            MetricDataType::Float,
            MetricDataType::Double,
            MetricDataType::String,
            MetricDataType::DateTime,
            MetricDataType::Text,
        ];
        for (i, ty) in expected.iter().enumerate() {
            assert_eq!(data_type_for_index(i as u32), *ty, "index {i}");
        }
    }

    #[test]
    fn test_type_depends_only_on_remainder() {
        for i in 0..200u32 {
            assert_eq!(data_type_for_index(i), data_type_for_index(i % 13));
            assert_eq!(data_type_for_index(i), data_type_for_index(i + 13 * 7));
        }
        assert_eq!(data_type_for_index(u32::MAX), data_type_for_index(u32::MAX % 13));
    }

    #[test]
    fn test_name_and_type_of_generated_metric() {
        let mut rng = seeded(3);
        for i in 0..40u32 {
            let metric = random_metric(&mut rng, "NT", i, ValueRanges::Nominal).unwrap();
            assert_eq!(metric.name(), format!("NT-{i}"));
            assert_eq!(metric.data_type(), data_type_for_index(i));
            assert_eq!(metric.value().data_type(), metric.data_type());
        }
    }

    // -----------------------------------------------------------------------
    // Value ranges
    // -----------------------------------------------------------------------

    #[test]
    fn test_nominal_ranges_fit_bit_width() {
        let mut rng = seeded(11);
        for _ in 0..2000 {
            match random_value(&mut rng, MetricDataType::UInt8, ValueRanges::Nominal) {
                MetricValue::UInt8(v) => assert!((0..=255).contains(&v)),
                other => panic!("unexpected {other:?}"),
            }
            match random_value(&mut rng, MetricDataType::UInt16, ValueRanges::Nominal) {
                MetricValue::UInt16(v) => assert!((0..=65535).contains(&v)),
                other => panic!("unexpected {other:?}"),
            }
            match random_value(&mut rng, MetricDataType::UInt32, ValueRanges::Nominal) {
                MetricValue::UInt32(v) => assert!((0..=i64::from(u32::MAX)).contains(&v)),
                other => panic!("unexpected {other:?}"),
            }
        }
    }

    #[test]
    fn test_nominal_int16_draws_negative_values() {
        let mut rng = seeded(5);
        let any_negative = (0..500).any(|_| {
            matches!(
                random_value(&mut rng, MetricDataType::Int16, ValueRanges::Nominal),
                MetricValue::Int16(v) if v < 0
            )
        });
        assert!(any_negative);
    }

    #[test]
    fn test_legacy_ranges() {
        let mut rng = seeded(13);
        let mut saw_negative_uint16 = false;
        for _ in 0..2000 {
            match random_value(&mut rng, MetricDataType::Int16, ValueRanges::Legacy) {
                MetricValue::Int16(v) => assert!(v >= 0),
                other => panic!("unexpected {other:?}"),
            }
            match random_value(&mut rng, MetricDataType::UInt8, ValueRanges::Legacy) {
                MetricValue::UInt8(v) => assert!(v >= 0),
                other => panic!("unexpected {other:?}"),
            }
            if let MetricValue::UInt16(v) =
                random_value(&mut rng, MetricDataType::UInt16, ValueRanges::Legacy)
            {
                saw_negative_uint16 |= v < 0;
            }
        }
        assert!(saw_negative_uint16, "legacy UInt16 should span the i32 range");
    }

    #[test]
    fn test_floats_in_unit_interval() {
        let mut rng = seeded(17);
        for _ in 0..1000 {
            match random_value(&mut rng, MetricDataType::Float, ValueRanges::Nominal) {
                MetricValue::Float(v) => assert!((0.0..1.0).contains(&v)),
                other => panic!("unexpected {other:?}"),
            }
            match random_value(&mut rng, MetricDataType::Double, ValueRanges::Nominal) {
                MetricValue::Double(v) => assert!((0.0..1.0).contains(&v)),
                other => panic!("unexpected {other:?}"),
            }
        }
    }

    #[test]
    fn test_strings_are_upper_alphanumeric() {
        let mut rng = seeded(19);
        for ty in [MetricDataType::String, MetricDataType::Text] {
            let value = random_value(&mut rng, ty, ValueRanges::Nominal);
            let s = match value {
                MetricValue::String(s) | MetricValue::Text(s) => s,
                other => panic!("unexpected {other:?}"),
            };
            assert_eq!(s.len(), STRING_LEN);
            assert!(s.chars().all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()));
        }
    }

    #[test]
    fn test_same_seed_same_values() {
        let mut a = seeded(99);
        let mut b = seeded(99);
        for i in 0..26u32 {
            assert_eq!(
                random_metric(&mut a, "DT", i, ValueRanges::Legacy).unwrap(),
                random_metric(&mut b, "DT", i, ValueRanges::Legacy).unwrap()
            );
        }
    }

    #[test]
    fn test_value_ranges_serde() {
        assert_eq!(serde_json::to_string(&ValueRanges::Legacy).unwrap(), "\"legacy\"");
        let parsed: ValueRanges = serde_json::from_str("\"nominal\"").unwrap();
        assert_eq!(parsed, ValueRanges::Nominal);
    }
}
