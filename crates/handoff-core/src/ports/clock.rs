//! Clock port - 時刻の抽象化とフォーマット
//!
//! Console の各行には `HH:mm:ss.sss` 形式のローカル時刻が付く。

use std::fmt;

use chrono::{Local, NaiveTime, Timelike};

/// Which end of the value the zeros go on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PadSide {
    Prefix,
    Suffix,
}

/// Zero-pad `value` to `width` characters.
///
/// - `Prefix`: prepend `width - 1` zeros and keep the trailing `width` characters.
/// - `Suffix`: append `width - 1` zeros and keep the leading `width` characters.
///
/// Values longer than `width` are cut to `width`, so `width` is exact whenever the
/// value is non-empty. `width == 0` yields an empty string.
pub fn pad_zeros(value: impl fmt::Display, width: usize, side: PadSide) -> String {
    if width == 0 {
        return String::new();
    }
    let zeros = "0".repeat(width - 1);
    match side {
        PadSide::Prefix => {
            let padded: Vec<char> = format!("{zeros}{value}").chars().collect();
            padded[padded.len().saturating_sub(width)..].iter().collect()
        }
        PadSide::Suffix => format!("{value}{zeros}").chars().take(width).collect(),
    }
}

/// Format `t` as `HH:mm:ss.sss`.
pub fn format_time<T: Timelike>(t: &T) -> String {
    // leap second は nanosecond が 1e9 以上になるので 999 で止める
    let millis = (t.nanosecond() / 1_000_000).min(999);
    format!(
        "{}:{}:{}.{}",
        pad_zeros(t.hour(), 2, PadSide::Prefix),
        pad_zeros(t.minute(), 2, PadSide::Prefix),
        pad_zeros(t.second(), 2, PadSide::Prefix),
        pad_zeros(millis, 3, PadSide::Prefix),
    )
}

/// Console の時刻ソース
///
/// 実装は `now()` だけ用意すればよく、行頭に付ける文字列は
/// `now_string()` が `format_time` で組み立てる。日付は使わない。
pub trait Clock: Send + Sync {
    /// 現在のローカル時刻（時刻部分のみ）
    fn now(&self) -> NaiveTime;

    /// `now()` を `HH:mm:ss.sss` にしたもの
    fn now_string(&self) -> String {
        format_time(&self.now())
    }
}

/// Local wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveTime {
        Local::now().time()
    }
}

/// Always returns the same instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub NaiveTime);

impl FixedClock {
    pub fn at(hour: u32, minute: u32, second: u32, milli: u32) -> Option<Self> {
        NaiveTime::from_hms_milli_opt(hour, minute, second, milli).map(Self)
    }
}

impl Clock for FixedClock {
    fn now(&self) -> NaiveTime {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    /// `\d{2}:\d{2}:\d{2}\.\d{3}`
    fn is_clock_format(s: &str) -> bool {
        let b = s.as_bytes();
        b.len() == 12
            && b.iter().enumerate().all(|(i, c)| match i {
                2 | 5 => *c == b':',
                8 => *c == b'.',
                _ => c.is_ascii_digit(),
            })
    }

    #[rstest]
    #[case(5, 2, PadSide::Prefix, "05")]
    #[case(7, 3, PadSide::Suffix, "700")]
    #[case(12, 2, PadSide::Prefix, "12")]
    #[case(4, 3, PadSide::Prefix, "004")]
    #[case(45, 3, PadSide::Suffix, "450")]
    #[case(1234, 3, PadSide::Prefix, "234")]
    #[case(1234, 3, PadSide::Suffix, "123")]
    #[case(9, 1, PadSide::Prefix, "9")]
    fn pads(#[case] value: u32, #[case] width: usize, #[case] side: PadSide, #[case] expected: &str) {
        assert_eq!(pad_zeros(value, width, side), expected);
    }

    #[test]
    fn zero_width_is_empty() {
        assert_eq!(pad_zeros(42, 0, PadSide::Prefix), "");
        assert_eq!(pad_zeros(42, 0, PadSide::Suffix), "");
    }

    #[test]
    fn empty_value_is_all_zeros() {
        assert_eq!(pad_zeros("", 3, PadSide::Prefix), "00");
    }

    #[test]
    fn formats_fixed_time() {
        let clock = FixedClock::at(1, 2, 3, 4).unwrap();
        assert_eq!(clock.now_string(), "01:02:03.004");
    }

    #[test]
    fn every_time_of_day_matches_pattern() {
        for hour in 0..24 {
            for minute in (0..60).step_by(7) {
                for second in (0..60).step_by(11) {
                    for milli in [0, 1, 9, 10, 99, 100, 500, 999] {
                        let t = NaiveTime::from_hms_milli_opt(hour, minute, second, milli).unwrap();
                        let s = format_time(&t);
                        assert!(is_clock_format(&s), "bad format: {s}");
                    }
                }
            }
        }
    }

    #[test]
    fn leap_second_millis_are_clamped() {
        let t = NaiveTime::from_hms_milli_opt(23, 59, 59, 1_500).unwrap();
        assert_eq!(format_time(&t), "23:59:59.999");
    }

    #[test]
    fn system_clock_matches_pattern() {
        assert!(is_clock_format(&SystemClock.now_string()));
    }
}
