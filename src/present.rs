//! The page-side surface the sketch writes to. Implemented over the DOM in
//! the wasm build and by [`Recording`] in tests.

pub trait Presenter {
    fn set_prompt_visible(&mut self, index: usize, visible: bool);
    fn show_metric(&mut self);
    fn set_metric_text(&mut self, text: &str);
    fn show_footer(&mut self);
    fn set_cursor_hidden(&mut self, hidden: bool);
}

/// Everything a presenter was told, in order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Recording {
    pub calls: Vec<PresenterCall>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PresenterCall {
    Prompt(usize, bool),
    ShowMetric,
    Metric(String),
    ShowFooter,
    CursorHidden(bool),
}

impl Recording {
    pub fn last_metric(&self) -> Option<&str> {
        self.calls.iter().rev().find_map(|c| match c {
            PresenterCall::Metric(s) => Some(s.as_str()),
            _ => None,
        })
    }
}

impl Presenter for Recording {
    fn set_prompt_visible(&mut self, index: usize, visible: bool) {
        self.calls.push(PresenterCall::Prompt(index, visible));
    }

    fn show_metric(&mut self) {
        self.calls.push(PresenterCall::ShowMetric);
    }

    fn set_metric_text(&mut self, text: &str) {
        self.calls.push(PresenterCall::Metric(text.to_string()));
    }

    fn show_footer(&mut self) {
        self.calls.push(PresenterCall::ShowFooter);
    }

    fn set_cursor_hidden(&mut self, hidden: bool) {
        self.calls.push(PresenterCall::CursorHidden(hidden));
    }
}
