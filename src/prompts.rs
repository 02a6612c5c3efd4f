//! Timed narrative prompts, expressed as data and flattened into a single
//! ordered list of timer events.

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PromptCue {
    /// Index into the page's prompt elements, in document order.
    pub element: usize,
    pub show_at_ms: f64,
    pub hide_at_ms: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PromptAction {
    Show(usize),
    Hide(usize),
    /// Input goes live, the readout appears.
    Activate,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PromptEvent {
    pub at_ms: f64,
    pub action: PromptAction,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PromptSchedule {
    pub cues: Vec<PromptCue>,
    pub activate_at_ms: f64,
}

impl PromptSchedule {
    /// `count` prompts, the first shown at `start`, each visible for `hold`,
    /// each next one starting `step` after the previous. Activation lands
    /// where a further prompt would have started.
    pub fn staggered(count: usize, start: f64, hold: f64, step: f64) -> Self {
        let cues = (0..count)
            .map(|i| {
                let show = start + step * i as f64;
                PromptCue {
                    element: i,
                    show_at_ms: show,
                    hide_at_ms: show + hold,
                }
            })
            .collect();
        Self {
            cues,
            activate_at_ms: start + step * count as f64,
        }
    }

    /// Explicit `(show, hide)` offsets per prompt.
    pub fn fixed(offsets: &[(f64, f64)], activate_at_ms: f64) -> Self {
        let cues = offsets
            .iter()
            .enumerate()
            .map(|(element, &(show_at_ms, hide_at_ms))| PromptCue {
                element,
                show_at_ms,
                hide_at_ms,
            })
            .collect();
        Self { cues, activate_at_ms }
    }

    /// Drops cues for elements the page does not have. Activation is kept.
    pub fn limited_to(&self, available: usize) -> Self {
        Self {
            cues: self
                .cues
                .iter()
                .copied()
                .filter(|c| c.element < available)
                .collect(),
            activate_at_ms: self.activate_at_ms,
        }
    }

    /// All timer events sorted by time. Ties keep show/hide before activation.
    pub fn events(&self) -> Vec<PromptEvent> {
        let mut events: Vec<PromptEvent> = self
            .cues
            .iter()
            .flat_map(|c| {
                [
                    PromptEvent {
                        at_ms: c.show_at_ms,
                        action: PromptAction::Show(c.element),
                    },
                    PromptEvent {
                        at_ms: c.hide_at_ms,
                        action: PromptAction::Hide(c.element),
                    },
                ]
            })
            .collect();
        events.push(PromptEvent {
            at_ms: self.activate_at_ms,
            action: PromptAction::Activate,
        });
        // stable sort
        events.sort_by(|a, b| a.at_ms.total_cmp(&b.at_ms));
        events
    }
}

/// How a page's prompts are timed before the number of prompt elements is
/// known.
#[derive(Debug, Clone, PartialEq)]
pub enum PromptTimeline {
    /// One cue per prompt element found on the page.
    Staggered { start: f64, hold: f64, step: f64 },
    /// Hand-placed offsets; elements beyond the page are dropped.
    Fixed(PromptSchedule),
}

impl PromptTimeline {
    pub fn schedule(&self, available: usize) -> PromptSchedule {
        match *self {
            PromptTimeline::Staggered { start, hold, step } => {
                PromptSchedule::staggered(available, start, hold, step)
            }
            PromptTimeline::Fixed(ref schedule) => schedule.limited_to(available),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIXED: [(f64, f64); 3] = [(1000.0, 3500.0), (4000.0, 6500.0), (7000.0, 9500.0)];

    fn activation(at_ms: f64) -> PromptEvent {
        PromptEvent {
            at_ms,
            action: PromptAction::Activate,
        }
    }

    #[test]
    fn staggered_matches_three_prompt_timeline() {
        let s = PromptSchedule::staggered(3, 1000.0, 2500.0, 3000.0);
        let shows: Vec<_> = s
            .cues
            .iter()
            .map(|c| (c.show_at_ms, c.hide_at_ms))
            .collect();
        assert_eq!(shows, FIXED.to_vec());
        assert_eq!(s.activate_at_ms, 10000.0);
    }

    #[test]
    fn events_are_time_ordered_and_end_with_activation() {
        let s = PromptSchedule::fixed(&FIXED, 9500.0);
        let events = s.events();
        assert_eq!(events.len(), 7);
        assert!(events.windows(2).all(|w| w[0].at_ms <= w[1].at_ms));
        assert_eq!(events[0].action, PromptAction::Show(0));
        // hide of the last prompt and activation share 9500ms; hide comes first
        assert_eq!(events[5].action, PromptAction::Hide(2));
        assert_eq!(events[6], activation(9500.0));
    }

    #[test]
    fn limited_schedule_still_activates() {
        let s = PromptSchedule::staggered(3, 1000.0, 2500.0, 3000.0).limited_to(0);
        assert_eq!(s.events(), vec![activation(10000.0)]);
    }

    #[test]
    fn staggered_timeline_covers_every_prompt_on_the_page() {
        let timeline = PromptTimeline::Staggered {
            start: 1000.0,
            hold: 2500.0,
            step: 3000.0,
        };
        let five = timeline.schedule(5);
        assert_eq!(five.cues.len(), 5);
        assert_eq!(five.cues[4].element, 4);
        assert_eq!(five.cues[4].show_at_ms, 13000.0);
        assert_eq!(five.events().last(), Some(&activation(16000.0)));

        let two = timeline.schedule(2);
        assert_eq!(two.cues.len(), 2);
        assert_eq!(two.activate_at_ms, 7000.0);
    }

    #[test]
    fn fixed_timeline_keeps_its_offsets() {
        let timeline = PromptTimeline::Fixed(PromptSchedule::fixed(&FIXED, 9500.0));
        let five = timeline.schedule(5);
        assert_eq!(five.cues.len(), 3);
        assert_eq!(five.activate_at_ms, 9500.0);
        assert_eq!(timeline.schedule(1).cues.len(), 1);
    }
}
