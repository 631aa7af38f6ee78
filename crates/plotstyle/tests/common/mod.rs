//! Shared helpers for integration tests.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use plotstyle::fetch::MockFetcher;
use plotstyle::fonts::MemoryFontRegistry;
use plotstyle::ConfigStore;
use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;

// ============================================================================
// Log capture
// ============================================================================

#[derive(Debug, Clone)]
pub struct CapturedEvent {
    pub level: Level,
    pub message: String,
    pub fields: Vec<(String, String)>,
}

impl CapturedEvent {
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }
}

struct FieldVisitor(Vec<(String, String)>);

impl tracing::field::Visit for FieldVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        self.0.push((field.name().to_string(), format!("{value:?}")));
    }

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        self.0.push((field.name().to_string(), value.to_string()));
    }
}

struct Capture {
    events: Arc<Mutex<Vec<CapturedEvent>>>,
}

impl<S: tracing::Subscriber> tracing_subscriber::Layer<S> for Capture {
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: tracing_subscriber::layer::Context<'_, S>) {
        let mut visitor = FieldVisitor(Vec::new());
        event.record(&mut visitor);

        let message = visitor
            .0
            .iter()
            .find(|(k, _)| k == "message")
            .map(|(_, v)| v.clone())
            .unwrap_or_default();

        self.events.lock().unwrap().push(CapturedEvent {
            level: *event.metadata().level(),
            message,
            fields: visitor.0,
        });
    }
}

/// Runs `f` with a subscriber that records every event.
pub fn capture<T>(f: impl FnOnce() -> T) -> (T, Vec<CapturedEvent>) {
    let events = Arc::new(Mutex::new(Vec::new()));
    let subscriber = tracing_subscriber::registry().with(Capture {
        events: Arc::clone(&events),
    });
    let result = tracing::subscriber::with_default(subscriber, f);
    let events = events.lock().unwrap().clone();
    (result, events)
}

/// Only the warnings among `events`.
pub fn warnings(events: &[CapturedEvent]) -> Vec<&CapturedEvent> {
    events.iter().filter(|e| e.level == Level::WARN).collect()
}

// ============================================================================
// Store setup
// ============================================================================

pub fn store_with(fetcher: MockFetcher) -> (ConfigStore, Arc<MemoryFontRegistry>) {
    let fonts = Arc::new(MemoryFontRegistry::new());
    let store = ConfigStore::new(Arc::new(fetcher), fonts.clone());
    (store, fonts)
}

pub fn theme_yaml(name: &str, font_family: &str, extra: &str) -> String {
    format!(
        "{name}:\n  base_theme: theme_minimal\n  font_family: {font_family}\n  axis_text_size: 10\n  axis_title_size: 12\n{extra}"
    )
}
