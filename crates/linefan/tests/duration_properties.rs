use linefan::duration::format_duration;
use proptest::prelude::*;

const SUFFIXES: [char; 5] = ['y', 'd', 'h', 'm', 's'];
const SIZES: [u64; 5] = [365 * 86_400, 86_400, 3_600, 60, 1];

/// Turn `1d 0h 2m 3s` back into seconds, checking the unit order on the way
fn parse(text: &str) -> Option<u64> {
    let tokens: Vec<&str> = text.split(' ').collect();
    let start = SUFFIXES.len() - tokens.len();
    let mut total = 0u64;
    for (i, token) in tokens.iter().enumerate() {
        let suffix = SUFFIXES[start + i];
        let value: u64 = token.strip_suffix(suffix)?.parse().ok()?;
        total = total.checked_add(value.checked_mul(SIZES[start + i])?)?;
    }
    Some(total)
}

#[test]
fn test_documented_examples() {
    assert_eq!(format_duration(0), "0s");
    assert_eq!(format_duration(61), "1m 1s");
    assert_eq!(format_duration(3661), "1h 1m 1s");
    assert_eq!(format_duration(90061), "1d 1h 1m 1s");
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    /// Units run contiguously from the largest non-zero one down to seconds
    #[test]
    fn prop_no_gaps_and_lossless(secs in 0u64..(200 * 365 * 86_400)) {
        let text = format_duration(secs);
        prop_assert_eq!(parse(&text), Some(secs));
        prop_assert!(text.ends_with('s'));

        let leading: u64 = text
            .split(' ')
            .next()
            .unwrap()
            .trim_end_matches(|c: char| c.is_ascii_alphabetic())
            .parse()
            .unwrap();
        if secs > 0 {
            prop_assert!(leading > 0);
        }
    }

    /// Only the leading unit may exceed its natural range
    #[test]
    fn prop_smaller_units_in_range(secs in 1u64..(50 * 365 * 86_400)) {
        let text = format_duration(secs);
        let tokens: Vec<&str> = text.split(' ').collect();
        let limits = [u64::MAX, 365, 24, 60, 60];
        let start = SUFFIXES.len() - tokens.len();
        for (i, token) in tokens.iter().enumerate().skip(1) {
            let value: u64 = token[..token.len() - 1].parse().unwrap();
            prop_assert!(value < limits[start + i]);
        }
    }
}
