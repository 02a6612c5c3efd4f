/// Where the session is in its one-way story: prompts, then drawing, then
/// the morphing shape. Never moves backwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum InteractionPhase {
    #[default]
    Prompting,
    Drawing,
    Morphing,
}

impl InteractionPhase {
    /// Moves to `next` if it is strictly later. Returns whether the phase changed.
    pub fn advance_to(&mut self, next: InteractionPhase) -> bool {
        if next > *self {
            log::info!("phase {:?} -> {:?}", self, next);
            *self = next;
            true
        } else {
            false
        }
    }

    /// Input and readout are live (the "mouse active" flag).
    pub fn is_active(self) -> bool {
        self >= InteractionPhase::Drawing
    }

    pub fn is_drawing(self) -> bool {
        self == InteractionPhase::Drawing
    }

    pub fn is_morphing(self) -> bool {
        self == InteractionPhase::Morphing
    }
}
