/// Title of the dialog asking for a text annotation.
pub const TEXT_PROMPT_TITLE: &str = "Enter Text";

/// A blocking text-entry dialog. Returns `None` when the user cancels.
pub trait TextPrompt {
    fn prompt(&mut self, title: &str) -> Option<String>;
}

impl<F> TextPrompt for F
where
    F: FnMut(&str) -> Option<String>,
{
    fn prompt(&mut self, title: &str) -> Option<String> {
        self(title)
    }
}

/// A prompt whose answer is already known.
///
/// Immediate-mode UIs cannot block inside an event handler, so the app shows
/// its own modal first and replays the pointer press with the collected
/// answer once the modal closes.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct AnsweredPrompt {
    answer: Option<String>,
}

impl AnsweredPrompt {
    pub fn new(answer: Option<String>) -> Self {
        Self { answer }
    }

    pub fn cancelled() -> Self {
        Self { answer: None }
    }
}

impl TextPrompt for AnsweredPrompt {
    fn prompt(&mut self, _title: &str) -> Option<String> {
        self.answer.take()
    }
}
