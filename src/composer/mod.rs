//! Entry composer: the text buffer under the day view and its dictation hook.

mod speech;

pub use speech::BrowserDictation;

use crate::models::EntryType;

/// What a key press in the composer should do.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyAction {
    Submit,
    StopDictation,
    /// Let the textarea handle it (Shift+Enter inserts a newline).
    Default,
}

pub fn key_action(key: &str, shift: bool, listening: bool) -> KeyAction {
    match key {
        "Enter" if !shift => KeyAction::Submit,
        "Escape" if listening => KeyAction::StopDictation,
        _ => KeyAction::Default,
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Composer {
    pub text: String,
    pub entry_type: EntryType,
    pub listening: bool,
}

impl Default for Composer {
    fn default() -> Self {
        Self::new(EntryType::Task)
    }
}

impl Composer {
    pub fn new(entry_type: EntryType) -> Self {
        Self {
            text: String::new(),
            entry_type,
            listening: false,
        }
    }

    pub fn can_submit(&self) -> bool {
        !self.text.trim().is_empty()
    }

    /// Takes the trimmed text out of the buffer. Blank text stays put and
    /// yields nothing.
    pub fn submit(&mut self) -> Option<(String, EntryType)> {
        let content = self.text.trim();
        if content.is_empty() {
            return None;
        }
        let content = content.to_string();
        self.text.clear();
        self.listening = false;
        Some((content, self.entry_type))
    }

    pub fn start_listening(&mut self) {
        self.text.clear();
        self.listening = true;
    }

    /// The engine sends the whole transcript so far, not a delta.
    pub fn on_transcript(&mut self, transcript: String) {
        if self.listening {
            self.text = transcript;
        }
    }

    pub fn stop_listening(&mut self) {
        self.listening = false;
    }
}

/// Speech-to-text engine.
pub trait Dictation {
    fn is_supported(&self) -> bool;

    /// Starts listening. `on_transcript` gets the full live transcript on every
    /// change; `on_end` fires when the engine stops on its own or errors.
    /// Returns false if listening could not start.
    fn start(&self, on_transcript: Box<dyn Fn(String)>, on_end: Box<dyn Fn()>) -> bool;

    fn stop(&self);
}

/// For browsers without a speech engine.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoDictation;

impl Dictation for NoDictation {
    fn is_supported(&self) -> bool {
        false
    }

    fn start(&self, _on_transcript: Box<dyn Fn(String)>, _on_end: Box<dyn Fn()>) -> bool {
        false
    }

    fn stop(&self) {}
}

/// The page's speech engine, or [`NoDictation`] when there is none.
pub fn detect_dictation() -> Box<dyn Dictation> {
    let browser = BrowserDictation::new();
    if browser.is_supported() {
        Box::new(browser)
    } else {
        log::info!("speech recognition unavailable; dictation disabled");
        Box::new(NoDictation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_blank_submit_yields_nothing() {
        let mut c = Composer::new(EntryType::Log);
        assert_eq!(c.submit(), None);
        c.text = "  \n\t ".to_string();
        assert!(!c.can_submit());
        assert_eq!(c.submit(), None);
        assert_eq!(c.text, "  \n\t ");
    }

    #[test]
    fn test_submit_trims_and_clears() {
        let mut c = Composer::new(EntryType::Reflection);
        c.text = "  calm day \n".to_string();
        assert_eq!(c.submit(), Some(("calm day".to_string(), EntryType::Reflection)));
        assert!(c.text.is_empty());
    }

    #[test]
    fn test_key_bindings() {
        assert_eq!(key_action("Enter", false, false), KeyAction::Submit);
        assert_eq!(key_action("Enter", true, false), KeyAction::Default);
        assert_eq!(key_action("Escape", false, true), KeyAction::StopDictation);
        assert_eq!(key_action("Escape", false, false), KeyAction::Default);
        assert_eq!(key_action("a", false, true), KeyAction::Default);
    }

    #[test]
    fn test_dictation_overwrites_buffer() {
        let mut c = Composer::new(EntryType::Log);
        c.text = "typed".to_string();
        c.start_listening();
        assert!(c.text.is_empty());
        c.on_transcript("hello".to_string());
        c.on_transcript("hello world".to_string());
        assert_eq!(c.text, "hello world");

        c.stop_listening();
        c.on_transcript("late result".to_string());
        assert_eq!(c.text, "hello world");
    }

    #[test]
    fn test_submit_ends_listening() {
        let mut c = Composer::new(EntryType::Log);
        c.start_listening();
        c.on_transcript("spoken".to_string());
        assert!(c.submit().is_some());
        assert!(!c.listening);
    }

    /// Scripted engine driving the composer through the trait.
    struct FakeDictation {
        on_transcript: RefCell<Option<Box<dyn Fn(String)>>>,
    }

    impl Dictation for FakeDictation {
        fn is_supported(&self) -> bool {
            true
        }

        fn start(&self, on_transcript: Box<dyn Fn(String)>, _on_end: Box<dyn Fn()>) -> bool {
            *self.on_transcript.borrow_mut() = Some(on_transcript);
            true
        }

        fn stop(&self) {
            self.on_transcript.borrow_mut().take();
        }
    }

    #[test]
    fn test_engine_transcripts_reach_composer() {
        let composer = Rc::new(RefCell::new(Composer::new(EntryType::Log)));
        let engine = FakeDictation {
            on_transcript: RefCell::new(None),
        };

        composer.borrow_mut().start_listening();
        let sink = composer.clone();
        assert!(engine.start(
            Box::new(move |t| sink.borrow_mut().on_transcript(t)),
            Box::new(|| {}),
        ));
        if let Some(cb) = engine.on_transcript.borrow().as_ref() {
            cb("note to self".to_string());
        }
        assert_eq!(composer.borrow().text, "note to self");
        engine.stop();
        assert!(engine.on_transcript.borrow().is_none());
    }

    #[test]
    fn test_no_dictation() {
        let d = NoDictation;
        assert!(!d.is_supported());
        assert!(!d.start(Box::new(|_| {}), Box::new(|| {})));
    }
}
