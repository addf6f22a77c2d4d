//! In-memory `Driver` over a synthetic DOM.
//!
//! The root document holds plain elements plus one iframe element per
//! frame; each frame holds its own elements. Elements can appear late,
//! be non-interactable, and trigger effects when clicked.

#![allow(dead_code)]

use async_trait::async_trait;
use fiel_engine::driver::{Driver, DriverError};
use fiel_engine::locator::LocatorSpec;
use fiel_engine::scripts::{
    CLICK_CANDIDATE_JS, REVEAL_FILE_INPUT_JS, SCRIPT_CLICK_JS, SCROLL_HORIZONTAL_JS,
    SCROLL_INTO_VIEW_JS, TEXT_CANDIDATES_JS,
};
use fiel_engine::strategy::TextCandidate;
use serde_json::{Value, json};
use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::Duration;
use tokio::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Context {
    Root,
    Frame(usize),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementRef {
    pub context: Context,
    pub id: usize,
    pub generation: u64,
}

#[derive(Debug, Clone)]
pub enum Effect {
    /// Load a new page; references from the old one go stale.
    Navigate(String),
    OpenWindow(String),
    /// Write `<name><marker>` after `delay`, then rename it to `name` after another `delay`.
    Download {
        dir: PathBuf,
        name: String,
        marker: String,
        delay: Duration,
    },
}

#[derive(Debug, Clone, Default)]
pub struct MockElement {
    pub locators: Vec<LocatorSpec>,
    pub appears_after: Duration,
    pub interactable: bool,
    pub frame: Option<usize>,
    pub on_click: Vec<Effect>,
    pub native_click_fails: bool,
}

impl MockElement {
    pub fn new(locators: Vec<LocatorSpec>) -> Self {
        Self {
            locators,
            interactable: true,
            ..Default::default()
        }
    }

    pub fn id(value: &str) -> Self {
        Self::new(vec![LocatorSpec::Id(value.to_string())])
    }

    pub fn css(value: &str) -> Self {
        Self::new(vec![LocatorSpec::Css(value.to_string())])
    }

    pub fn appears_after(mut self, delay: Duration) -> Self {
        self.appears_after = delay;
        self
    }

    pub fn hidden(mut self) -> Self {
        self.interactable = false;
        self
    }

    pub fn on_click(mut self, effect: Effect) -> Self {
        self.on_click.push(effect);
        self
    }

    pub fn native_click_fails(mut self) -> Self {
        self.native_click_fails = true;
        self
    }
}

#[derive(Debug, Default)]
pub struct MockState {
    pub root: Vec<MockElement>,
    pub frames: Vec<Vec<MockElement>>,
    pub candidates: HashMap<Context, Vec<TextCandidate>>,
    /// Candidates that replace the current ones right after the next scan.
    pub rerender: HashMap<Context, Vec<TextCandidate>>,
    pub frame_switch_failures: HashSet<usize>,

    pub context: Option<Context>,
    pub generation: u64,
    pub url: String,
    pub windows: Vec<String>,
    pub current_window: String,

    pub lookups: Vec<(Context, LocatorSpec)>,
    pub clicks: Vec<(Context, usize)>,
    pub script_clicks: Vec<(Context, usize)>,
    pub candidate_clicks: Vec<(Context, usize)>,
    pub revealed: Vec<(Context, usize)>,
    pub typed: Vec<(Context, usize, String)>,
    pub cleared: Vec<(Context, usize)>,
    pub navigations: Vec<String>,
    pub scripts: Vec<&'static str>,
    pub quit: bool,
}

pub struct MockDriver {
    started: Instant,
    pub state: Mutex<MockState>,
}

impl Default for MockDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl MockDriver {
    pub fn new() -> Self {
        let state = MockState {
            context: Some(Context::Root),
            windows: vec!["main".to_string()],
            current_window: "main".to_string(),
            url: "about:blank".to_string(),
            ..Default::default()
        };
        Self {
            started: Instant::now(),
            state: Mutex::new(state),
        }
    }

    pub fn add_root(&self, element: MockElement) -> usize {
        let mut state = self.state.lock().unwrap();
        state.root.push(element);
        state.root.len() - 1
    }

    /// Adds an iframe to the root document and returns the frame index.
    pub fn add_frame(&self, elements: Vec<MockElement>) -> usize {
        let mut state = self.state.lock().unwrap();
        let index = state.frames.len();
        state.frames.push(elements);
        let mut frame = MockElement::new(vec![
            LocatorSpec::Css("iframe".to_string()),
            LocatorSpec::Css("iframe, frame".to_string()),
        ]);
        frame.frame = Some(index);
        state.root.push(frame);
        index
    }

    pub fn add_frame_element(&self, frame: usize, element: MockElement) -> usize {
        let mut state = self.state.lock().unwrap();
        state.frames[frame].push(element);
        state.frames[frame].len() - 1
    }

    pub fn fail_frame_switch(&self, frame: usize) {
        self.state.lock().unwrap().frame_switch_failures.insert(frame);
    }

    pub fn set_candidates(&self, context: Context, candidates: Vec<TextCandidate>) {
        self.state
            .lock()
            .unwrap()
            .candidates
            .insert(context, candidates);
    }

    pub fn rerender_after_scan(&self, context: Context, candidates: Vec<TextCandidate>) {
        self.state
            .lock()
            .unwrap()
            .rerender
            .insert(context, candidates);
    }

    pub fn context(&self) -> Context {
        self.state.lock().unwrap().context.unwrap_or(Context::Root)
    }

    pub fn with_state<R>(&self, f: impl FnOnce(&MockState) -> R) -> R {
        f(&self.state.lock().unwrap())
    }

    fn current(&self, state: &MockState) -> Context {
        state.context.unwrap_or(Context::Root)
    }

    fn document<'s>(&self, state: &'s MockState, context: Context) -> &'s [MockElement] {
        match context {
            Context::Root => &state.root,
            Context::Frame(i) => &state.frames[i],
        }
    }

    fn element<'s>(
        &self,
        state: &'s MockState,
        element: &ElementRef,
    ) -> Result<&'s MockElement, DriverError> {
        if element.generation != state.generation || element.context != self.current(state) {
            return Err(DriverError::Command("stale element reference".into()));
        }
        self.document(state, element.context)
            .get(element.id)
            .ok_or_else(|| DriverError::Command("no such element".into()))
    }

    fn apply(&self, state: &mut MockState, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::Navigate(url) => {
                    state.url = url;
                    state.generation += 1;
                    state.context = Some(Context::Root);
                }
                Effect::OpenWindow(handle) => state.windows.push(handle),
                Effect::Download {
                    dir,
                    name,
                    marker,
                    delay,
                } => {
                    tokio::spawn(async move {
                        let partial = dir.join(format!("{}{}", name, marker));
                        tokio::time::sleep(delay).await;
                        std::fs::write(&partial, b"%PDF-1.4 partial").unwrap();
                        tokio::time::sleep(delay).await;
                        std::fs::rename(&partial, dir.join(&name)).unwrap();
                    });
                }
            }
        }
    }

    fn click_inner(&self, element: &ElementRef, native: bool) -> Result<(), DriverError> {
        let mut state = self.state.lock().unwrap();
        let target = self.element(&state, element)?;
        if native && target.native_click_fails {
            return Err(DriverError::Command("element click intercepted".into()));
        }
        let effects = target.on_click.clone();
        if native {
            state.clicks.push((element.context, element.id));
        } else {
            state.script_clicks.push((element.context, element.id));
        }
        self.apply(&mut state, effects);
        Ok(())
    }
}

#[async_trait]
impl Driver for MockDriver {
    type Element = ElementRef;

    async fn goto(&self, url: &str) -> Result<(), DriverError> {
        let mut state = self.state.lock().unwrap();
        state.navigations.push(url.to_string());
        state.url = url.to_string();
        state.context = Some(Context::Root);
        Ok(())
    }

    async fn current_url(&self) -> Result<String, DriverError> {
        Ok(self.state.lock().unwrap().url.clone())
    }

    async fn find_all(&self, locator: &LocatorSpec) -> Result<Vec<ElementRef>, DriverError> {
        let mut state = self.state.lock().unwrap();
        let context = self.current(&state);
        state.lookups.push((context, locator.clone()));
        let elapsed = self.started.elapsed();
        let generation = state.generation;
        Ok(self
            .document(&state, context)
            .iter()
            .enumerate()
            .filter(|(_, e)| e.appears_after <= elapsed && e.locators.contains(locator))
            .map(|(id, _)| ElementRef {
                context,
                id,
                generation,
            })
            .collect())
    }

    async fn is_interactable(&self, element: &ElementRef) -> Result<bool, DriverError> {
        let state = self.state.lock().unwrap();
        Ok(self.element(&state, element)?.interactable)
    }

    async fn click(&self, element: &ElementRef) -> Result<(), DriverError> {
        self.click_inner(element, true)
    }

    async fn clear(&self, element: &ElementRef) -> Result<(), DriverError> {
        let mut state = self.state.lock().unwrap();
        self.element(&state, element)?;
        state.cleared.push((element.context, element.id));
        Ok(())
    }

    async fn send_keys(&self, element: &ElementRef, text: &str) -> Result<(), DriverError> {
        let mut state = self.state.lock().unwrap();
        self.element(&state, element)?;
        state
            .typed
            .push((element.context, element.id, text.to_string()));
        Ok(())
    }

    async fn execute(&self, script: &str, args: Vec<Value>) -> Result<Value, DriverError> {
        let mut state = self.state.lock().unwrap();
        let context = self.current(&state);
        if script == TEXT_CANDIDATES_JS {
            state.scripts.push("candidates");
            let candidates = state.candidates.get(&context).cloned().unwrap_or_default();
            if let Some(next) = state.rerender.remove(&context) {
                state.candidates.insert(context, next);
            }
            return Ok(json!(candidates));
        }
        if script == CLICK_CANDIDATE_JS {
            state.scripts.push("click_candidate");
            let index = args
                .get(1)
                .and_then(Value::as_u64)
                .ok_or_else(|| DriverError::Script("missing index".into()))?
                as usize;
            let expected = args.get(2).and_then(Value::as_str).unwrap_or_default();
            let current = state
                .candidates
                .get(&context)
                .and_then(|c| c.iter().find(|c| c.index == index))
                .map(|c| c.text.trim().to_string());
            if current.as_deref() != Some(expected) {
                return Ok(json!(false));
            }
            state.candidate_clicks.push((context, index));
            return Ok(json!(true));
        }
        if script == SCROLL_HORIZONTAL_JS {
            state.scripts.push("scroll_horizontal");
            return Ok(json!(true));
        }
        Ok(Value::Null)
    }

    async fn execute_on(
        &self,
        script: &str,
        element: &ElementRef,
        _args: Vec<Value>,
    ) -> Result<Value, DriverError> {
        if script == SCRIPT_CLICK_JS {
            self.click_inner(element, false)?;
            return Ok(json!(true));
        }
        let mut state = self.state.lock().unwrap();
        self.element(&state, element)?;
        if script == REVEAL_FILE_INPUT_JS {
            state.revealed.push((element.context, element.id));
        } else if script == SCROLL_INTO_VIEW_JS {
            state.scripts.push("scroll_into_view");
        }
        Ok(json!(true))
    }

    async fn enter_frame(&self, element: &ElementRef) -> Result<(), DriverError> {
        let mut state = self.state.lock().unwrap();
        let frame = self.element(&state, element)?.frame;
        match frame {
            Some(index) if !state.frame_switch_failures.contains(&index) => {
                state.context = Some(Context::Frame(index));
                Ok(())
            }
            Some(index) => Err(DriverError::Frame(format!("frame {} unavailable", index))),
            None => Err(DriverError::Frame("not a frame".into())),
        }
    }

    async fn enter_root(&self) -> Result<(), DriverError> {
        self.state.lock().unwrap().context = Some(Context::Root);
        Ok(())
    }

    async fn window(&self) -> Result<String, DriverError> {
        Ok(self.state.lock().unwrap().current_window.clone())
    }

    async fn windows(&self) -> Result<Vec<String>, DriverError> {
        Ok(self.state.lock().unwrap().windows.clone())
    }

    async fn switch_to_window(&self, handle: &str) -> Result<(), DriverError> {
        let mut state = self.state.lock().unwrap();
        if !state.windows.iter().any(|w| w == handle) {
            return Err(DriverError::Window(format!("no such window {}", handle)));
        }
        state.current_window = handle.to_string();
        state.context = Some(Context::Root);
        Ok(())
    }

    async fn close_window(&self) -> Result<(), DriverError> {
        let mut state = self.state.lock().unwrap();
        let current = state.current_window.clone();
        state.windows.retain(|w| *w != current);
        Ok(())
    }

    async fn quit(&self) -> Result<(), DriverError> {
        self.state.lock().unwrap().quit = true;
        Ok(())
    }
}

pub fn visible(index: usize, text: &str) -> TextCandidate {
    TextCandidate {
        index,
        text: text.to_string(),
        width: 100.0,
        height: 24.0,
        display: "block".to_string(),
        visibility: "visible".to_string(),
        opacity: "1".to_string(),
    }
}
