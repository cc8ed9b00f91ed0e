use crate::clock::Clock;
use crate::estimate::{Estimator, Targets};
use crate::render::Renderer;
use std::io::Write;
use tracing::debug;

/// Where the fan is in its single run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Nothing read yet; the title may already be on screen
    Idle,
    /// Lines are arriving
    Running,
    /// Input has ended
    Draining,
    /// Final newline or erase has been written
    Done,
}

/// Rendering behaviour for one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FanOptions {
    /// Printed once before the fan, followed by a space
    pub title: Option<String>,
    pub echo: bool,
    pub quiet: bool,
    pub clean: bool,
    /// Render on every Nth line
    pub sample_every: u64,
    pub targets: Targets,
}

impl Default for FanOptions {
    fn default() -> Self {
        Self {
            title: None,
            echo: false,
            quiet: false,
            clean: false,
            sample_every: 1,
            targets: Targets::default(),
        }
    }
}

/// What a finished run measured
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub elapsed_secs: u64,
    pub line_count: u64,
}

/// Whether the `line_count`-th line (1-based) triggers a render
pub fn is_sample(line_count: u64, sample_every: u64) -> bool {
    line_count > 0 && (line_count - 1) % sample_every.max(1) == 0
}

/// Consumes input lines one at a time and keeps the status line on `out`
/// current
pub struct FanLoop<W: Write, C: Clock> {
    out: W,
    clock: C,
    options: FanOptions,
    estimator: Estimator,
    renderer: Renderer,
    line_count: u64,
    phase: Phase,
}

impl<W: Write, C: Clock> FanLoop<W, C> {
    pub fn new(out: W, clock: C, options: FanOptions) -> Self {
        Self {
            out,
            clock,
            estimator: Estimator::new(options.targets),
            options,
            renderer: Renderer::new(),
            line_count: 0,
            phase: Phase::Idle,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn line_count(&self) -> u64 {
        self.line_count
    }

    pub fn into_output(self) -> W {
        self.out
    }

    /// Print the title, if any; only has an effect before the first line
    pub fn begin(&mut self) {
        if self.phase != Phase::Idle {
            return;
        }
        if let Some(title) = self.options.title.clone() {
            let text = self.renderer.print_title(&format!("{} ", title));
            self.emit(&text);
        }
    }

    /// Handle one input line; returns true when the status line was redrawn
    pub fn on_line(&mut self, line: &str) -> bool {
        debug_assert!(matches!(self.phase, Phase::Idle | Phase::Running));
        self.phase = Phase::Running;
        self.line_count += 1;

        if self.options.echo {
            self.emit(&format!("{}\n", line));
        }
        if self.options.quiet || !is_sample(self.line_count, self.options.sample_every) {
            return false;
        }

        let text = self
            .estimator
            .next(self.clock.elapsed_secs(), self.line_count);
        let bytes = self.renderer.repaint(&text);
        self.emit(&bytes);

        if self.options.echo {
            self.emit("\n");
        }
        true
    }

    /// Input is exhausted
    pub fn end_of_input(&mut self) {
        if matches!(self.phase, Phase::Idle | Phase::Running) {
            debug!("Input ended after {} lines", self.line_count);
            self.phase = Phase::Draining;
        }
    }

    /// Leave the terminal line in its final state and report the run
    pub fn finish(&mut self) -> RunSummary {
        self.end_of_input();
        let elapsed_secs = self.clock.elapsed_secs();

        if self.phase == Phase::Draining && !self.options.quiet {
            if self.options.clean {
                let bytes = self.renderer.clear();
                self.emit(&bytes);
            } else {
                self.emit("\n");
            }
        }
        self.phase = Phase::Done;

        RunSummary {
            elapsed_secs,
            line_count: self.line_count,
        }
    }

    fn emit(&mut self, text: &str) {
        // Best effort: a closed terminal must not stop the line consumer
        let _ = self.out.write_all(text.as_bytes());
        let _ = self.out.flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;

    fn fan(options: FanOptions) -> FanLoop<Vec<u8>, ManualClock> {
        FanLoop::new(Vec::new(), ManualClock::default(), options)
    }

    fn output(fan: FanLoop<Vec<u8>, ManualClock>) -> String {
        String::from_utf8(fan.into_output()).unwrap()
    }

    #[test]
    fn test_sampling_condition() {
        let hits: Vec<u64> = (1..=10).filter(|n| is_sample(*n, 3)).collect();
        assert_eq!(hits, vec![1, 4, 7, 10]);
        assert!((1..=5).all(|n| is_sample(n, 1)));
        assert!(!is_sample(0, 1));
        // Zero interval behaves like one
        assert!(is_sample(2, 0));
    }

    #[test]
    fn test_phases() {
        let mut fan = fan(FanOptions::default());
        assert_eq!(fan.phase(), Phase::Idle);
        fan.begin();
        assert_eq!(fan.phase(), Phase::Idle);
        fan.on_line("a");
        assert_eq!(fan.phase(), Phase::Running);
        fan.end_of_input();
        assert_eq!(fan.phase(), Phase::Draining);
        fan.finish();
        assert_eq!(fan.phase(), Phase::Done);
    }

    #[test]
    fn test_plain_run_ends_with_newline() {
        let mut fan = fan(FanOptions::default());
        fan.begin();
        fan.on_line("a");
        fan.on_line("b");
        let summary = fan.finish();

        assert_eq!(summary.line_count, 2);
        assert_eq!(output(fan), "|\x08/\n");
    }

    #[test]
    fn test_title_then_clean_erase() {
        let mut fan = fan(FanOptions {
            title: Some("build".to_string()),
            clean: true,
            ..Default::default()
        });
        fan.begin();
        fan.on_line("a");
        fan.finish();

        let out = output(fan);
        assert!(out.starts_with("build |"));
        assert!(out.ends_with(&"\x08 \x08".repeat(7)));
    }

    #[test]
    fn test_quiet_counts_but_draws_nothing() {
        let mut fan = fan(FanOptions {
            quiet: true,
            ..Default::default()
        });
        fan.begin();
        assert!(!fan.on_line("a"));
        assert!(!fan.on_line("b"));
        let summary = fan.finish();

        assert_eq!(summary.line_count, 2);
        assert_eq!(output(fan), "");
    }

    #[test]
    fn test_echo_writes_lines_and_breaks_after_status() {
        let mut fan = fan(FanOptions {
            echo: true,
            ..Default::default()
        });
        fan.on_line("one");
        fan.on_line("two");
        fan.finish();

        assert_eq!(output(fan), "one\n|\ntwo\n\x08/\n\n");
    }

    #[test]
    fn test_sampled_renders_only() {
        let mut fan = fan(FanOptions {
            sample_every: 3,
            ..Default::default()
        });
        let rendered: Vec<bool> = (0..7).map(|_| fan.on_line("x")).collect();
        assert_eq!(
            rendered,
            vec![true, false, false, true, false, false, true]
        );
        assert_eq!(fan.line_count(), 7);
    }

    #[test]
    fn test_finish_without_lines() {
        let mut fan = fan(FanOptions::default());
        fan.begin();
        let summary = fan.finish();
        assert_eq!(summary.line_count, 0);
        assert_eq!(output(fan), "\n");
    }
}
