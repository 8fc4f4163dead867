//! Key-value helper

/// Numbers `to_kv` accepts: every primitive integer and float
pub trait KvValue: Copy {
    fn to_f64(self) -> f64;
}

macro_rules! impl_kv_value {
    ($($t:ty),*) => {
        $(
            impl KvValue for $t {
                #[allow(clippy::cast_precision_loss, clippy::cast_lossless)]
                fn to_f64(self) -> f64 {
                    self as f64
                }
            }
        )*
    };
}

impl_kv_value!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64);

/// Pair `key` with the square of `value`, always as a float.
///
/// Integers beyond 2^53 are rounded to the nearest `f64` first.
pub fn to_kv<V: KvValue>(key: &str, value: V) -> (String, f64) {
    let value = value.to_f64();
    (key.to_string(), value * value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_int_value() {
        assert_eq!(to_kv("eggs", 3), ("eggs".to_string(), 9.0));
        assert_eq!(to_kv("neg", -4), ("neg".to_string(), 16.0));
    }

    #[test]
    fn test_wide_ints() {
        assert_eq!(to_kv("big", 3_000_000_000_i64).1, 9e18);
        assert_eq!(to_kv("unsigned", 12_u64).1, 144.0);
        assert_eq!(to_kv("len", 5_usize).1, 25.0);
    }

    #[test]
    fn test_float_value() {
        let (key, value) = to_kv("school", 0.02);
        assert_eq!(key, "school");
        assert!((value - 0.0004).abs() < 1e-12);
    }

    #[test]
    fn test_zero() {
        assert_eq!(to_kv("", 0_u8).1, 0.0);
    }
}
