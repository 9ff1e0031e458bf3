use super::Dictation;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};

struct Session {
    _on_result: Closure<dyn FnMut(JsValue)>,
    _on_end: Closure<dyn FnMut(JsValue)>,
    _on_error: Closure<dyn FnMut(JsValue)>,
}

/// `SpeechRecognition` (or the `webkit` prefixed one) driven through
/// `js_sys::Reflect`, since web-sys only exposes it behind unstable APIs.
#[derive(Clone)]
pub struct BrowserDictation {
    recognition: Option<JsValue>,
    session: Rc<RefCell<Option<Session>>>,
}

fn get(target: &JsValue, key: &str) -> Option<JsValue> {
    js_sys::Reflect::get(target, &JsValue::from_str(key))
        .ok()
        .filter(|v| !v.is_undefined() && !v.is_null())
}

fn set(target: &JsValue, key: &str, value: &JsValue) {
    let _ = js_sys::Reflect::set(target, &JsValue::from_str(key), value);
}

fn call0(target: &JsValue, method: &str) {
    if let Some(f) = get(target, method).and_then(|f| f.dyn_into::<js_sys::Function>().ok()) {
        if let Err(e) = f.call0(target) {
            log::error!("speech recognition {method} failed: {e:?}");
        }
    }
}

/// Joins `event.results[i][0].transcript` over every result so far.
fn transcript_of(event: &JsValue) -> String {
    let Some(results) = get(event, "results") else {
        return String::new();
    };
    let len = get(&results, "length").and_then(|l| l.as_f64()).unwrap_or(0.0) as u32;
    (0..len)
        .filter_map(|i| js_sys::Reflect::get_u32(&results, i).ok())
        .filter_map(|r| js_sys::Reflect::get_u32(&r, 0).ok())
        .filter_map(|alt| get(&alt, "transcript").and_then(|t| t.as_string()))
        .collect()
}

impl BrowserDictation {
    pub fn new() -> Self {
        let recognition = web_sys::window().map(JsValue::from).and_then(|w| {
            let ctor = get(&w, "SpeechRecognition").or_else(|| get(&w, "webkitSpeechRecognition"))?;
            let ctor = ctor.dyn_into::<js_sys::Function>().ok()?;
            let r = js_sys::Reflect::construct(&ctor, &js_sys::Array::new()).ok()?;
            set(&r, "continuous", &JsValue::TRUE);
            set(&r, "interimResults", &JsValue::TRUE);
            Some(r)
        });
        Self {
            recognition,
            session: Rc::new(RefCell::new(None)),
        }
    }
}

impl Default for BrowserDictation {
    fn default() -> Self {
        Self::new()
    }
}

impl Dictation for BrowserDictation {
    fn is_supported(&self) -> bool {
        self.recognition.is_some()
    }

    fn start(&self, on_transcript: Box<dyn Fn(String)>, on_end: Box<dyn Fn()>) -> bool {
        let Some(r) = &self.recognition else {
            return false;
        };

        let on_end: Rc<dyn Fn()> = Rc::from(on_end);
        let on_result = Closure::<dyn FnMut(JsValue)>::new(move |event: JsValue| {
            on_transcript(transcript_of(&event));
        });
        let end = on_end.clone();
        let on_end_cb = Closure::<dyn FnMut(JsValue)>::new(move |_| (*end)());
        let on_error = Closure::<dyn FnMut(JsValue)>::new(move |event: JsValue| {
            let reason = get(&event, "error").and_then(|e| e.as_string()).unwrap_or_default();
            log::error!("speech recognition error: {reason}");
            (*on_end)();
        });

        set(r, "onresult", on_result.as_ref());
        set(r, "onend", on_end_cb.as_ref());
        set(r, "onerror", on_error.as_ref());
        *self.session.borrow_mut() = Some(Session {
            _on_result: on_result,
            _on_end: on_end_cb,
            _on_error: on_error,
        });

        call0(r, "start");
        true
    }

    fn stop(&self) {
        if let Some(r) = &self.recognition {
            call0(r, "stop");
        }
    }
}
