// Compact human-readable durations for the fan status line

const SECONDS_PER_MINUTE: u64 = 60;
const SECONDS_PER_HOUR: u64 = 60 * SECONDS_PER_MINUTE;
const SECONDS_PER_DAY: u64 = 24 * SECONDS_PER_HOUR;
const SECONDS_PER_YEAR: u64 = 365 * SECONDS_PER_DAY;

/// Format a number of seconds as e.g. `1d 0h 3m 12s`
///
/// Units are emitted from the first non-zero one downward; once a unit has
/// been emitted every smaller unit follows, even when it is zero.
/// Zero seconds is rendered as `0s`.
pub fn format_duration(delta_secs: u64) -> String {
    if delta_secs == 0 {
        return "0s".to_string();
    }

    let mut rest = delta_secs;
    let mut units = [(0u64, 'y'), (0, 'd'), (0, 'h'), (0, 'm'), (0, 's')];
    for (slot, size) in units.iter_mut().zip([
        SECONDS_PER_YEAR,
        SECONDS_PER_DAY,
        SECONDS_PER_HOUR,
        SECONDS_PER_MINUTE,
        1,
    ]) {
        slot.0 = rest / size;
        rest %= size;
    }

    let first = units
        .iter()
        .position(|(value, _)| *value > 0)
        .unwrap_or(units.len() - 1);

    units[first..]
        .iter()
        .map(|(value, suffix)| format!("{}{}", value, suffix))
        .collect::<Vec<_>>()
        .join(" ")
}
