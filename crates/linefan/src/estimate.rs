use crate::duration::format_duration;

/// Fan glyphs, one per emitted status line
pub const FAN: [char; 8] = ['|', '/', '-', '\\', '|', '/', '-', '\\'];

/// Estimation targets; zero disables the corresponding estimate
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Targets {
    pub lines: u64,
    pub duration_secs: u64,
}

/// Builds the status text shown after the title: fan glyph, completion
/// percentage and remaining time
#[derive(Debug, Clone, Default)]
pub struct Estimator {
    cycle: usize,
    targets: Targets,
}

impl Estimator {
    pub fn new(targets: Targets) -> Self {
        Self { cycle: 0, targets }
    }

    /// Index of the glyph the next call to [`Estimator::next`] will emit
    pub fn cycle_index(&self) -> usize {
        self.cycle
    }

    /// Compute the status text for the current sample and advance the fan
    pub fn next(&mut self, elapsed_secs: u64, line_count: u64) -> String {
        let mut text = FAN[self.cycle].to_string();
        self.cycle = (self.cycle + 1) % FAN.len();

        let Targets {
            lines: target_lines,
            duration_secs,
        } = self.targets;

        if target_lines > 0 {
            text.push_str(&percent_fragment(line_count, target_lines));
            if duration_secs == 0 {
                if let Some(eta) = eta_secs(elapsed_secs, line_count, target_lines) {
                    text.push_str(&format!(" ({})", format_duration(eta)));
                }
            }
        }

        if duration_secs > 0 {
            text.push_str(&countdown_fragment(elapsed_secs, duration_secs));
        }

        text
    }
}

/// ` NNN%` while within the target, `   ?%` once the target is exceeded
pub fn percent_fragment(line_count: u64, target_lines: u64) -> String {
    let percent = u128::from(line_count) * 100 / u128::from(target_lines);
    if percent <= 100 {
        format!(" {:>3}%", percent)
    } else {
        "   ?%".to_string()
    }
}

/// Seconds left at the current line velocity, plus one to cover the
/// second in progress
///
/// None until time has passed and lines have arrived, and once the line
/// count has overshot the target.
pub fn eta_secs(elapsed_secs: u64, line_count: u64, target_lines: u64) -> Option<u64> {
    if elapsed_secs == 0 || line_count == 0 || line_count > target_lines {
        return None;
    }
    // remaining / (lines / elapsed), floored
    let remaining = u128::from(target_lines - line_count);
    let eta = remaining * u128::from(elapsed_secs) / u128::from(line_count);
    Some(u64::try_from(eta).unwrap_or(u64::MAX).saturating_add(1))
}

/// ` <remaining>` against a fixed total duration, ` ?` once it has passed
pub fn countdown_fragment(elapsed_secs: u64, duration_secs: u64) -> String {
    match duration_secs.checked_sub(elapsed_secs) {
        Some(remaining) => format!(" {}", format_duration(remaining)),
        None => " ?".to_string(),
    }
}
