//! Recording layer for asserting spans and events in tests.
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};

use tracing::field::{Field, Visit};
use tracing::span::{Attributes, Id, Record};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::Layer;
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::registry::LookupSpan;

/// Layer capturing closed spans and emitted events with their fields.
///
/// # Examples
/// ```
/// use genenet_test_support::tracing::RecordingLayer;
///
/// let layer = RecordingLayer::default();
/// let value = layer.record(|| {
///     let _span = tracing::info_span!("demo.span", items = 3).entered();
///     tracing::warn!(reason = "example", "something odd");
///     7
/// });
/// assert_eq!(value, 7);
/// assert!(layer.has_span("demo.span"));
/// assert_eq!(layer.events_at(tracing::Level::WARN).len(), 1);
/// ```
#[derive(Clone, Default)]
pub struct RecordingLayer {
    spans: Arc<Mutex<Vec<SpanRecord>>>,
    events: Arc<Mutex<Vec<EventRecord>>>,
}

/// Closed span with its name and recorded fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpanRecord {
    /// Span name from the tracing metadata.
    pub name: String,
    /// Fields recorded on creation or later via `Span::record`.
    pub fields: HashMap<String, String>,
}

/// Emitted event with its level, target and fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventRecord {
    /// Event level.
    pub level: Level,
    /// Event target, usually the emitting module path.
    pub target: String,
    /// Structured fields, including `message`.
    pub fields: HashMap<String, String>,
}

impl EventRecord {
    /// Returns the formatted message, if any.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.fields.get("message").map(String::as_str)
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().expect("recording layer lock poisoned")
}

impl RecordingLayer {
    /// Runs `f` with a registry carrying this layer as the default
    /// subscriber and returns its result.
    pub fn record<T>(&self, f: impl FnOnce() -> T) -> T {
        let subscriber = tracing_subscriber::registry().with(self.clone());
        tracing::subscriber::with_default(subscriber, f)
    }

    /// Snapshot of closed spans in completion order.
    #[must_use]
    pub fn spans(&self) -> Vec<SpanRecord> {
        lock(&self.spans).clone()
    }

    /// Snapshot of events in emission order.
    #[must_use]
    pub fn events(&self) -> Vec<EventRecord> {
        lock(&self.events).clone()
    }

    /// Returns whether a span called `name` has closed.
    #[must_use]
    pub fn has_span(&self, name: &str) -> bool {
        lock(&self.spans).iter().any(|span| span.name == name)
    }

    /// Returns the first closed span called `name`.
    #[must_use]
    pub fn span(&self, name: &str) -> Option<SpanRecord> {
        lock(&self.spans).iter().find(|span| span.name == name).cloned()
    }

    /// Returns the events emitted at `level`.
    #[must_use]
    pub fn events_at(&self, level: Level) -> Vec<EventRecord> {
        lock(&self.events)
            .iter()
            .filter(|event| event.level == level)
            .cloned()
            .collect()
    }
}

struct PendingSpan(SpanRecord);

impl<S> Layer<S> for RecordingLayer
where
    S: Subscriber + for<'span> LookupSpan<'span>,
{
    fn on_new_span(&self, attrs: &Attributes<'_>, id: &Id, ctx: Context<'_, S>) {
        let Some(span) = ctx.span(id) else {
            return;
        };
        let mut record = SpanRecord {
            name: attrs.metadata().name().to_owned(),
            fields: HashMap::new(),
        };
        attrs.record(&mut FieldRecorder(&mut record.fields));
        span.extensions_mut().insert(PendingSpan(record));
    }

    fn on_record(&self, id: &Id, values: &Record<'_>, ctx: Context<'_, S>) {
        let Some(span) = ctx.span(id) else {
            return;
        };
        if let Some(PendingSpan(record)) = span.extensions_mut().get_mut::<PendingSpan>() {
            values.record(&mut FieldRecorder(&mut record.fields));
        }
    }

    fn on_close(&self, id: Id, ctx: Context<'_, S>) {
        let Some(span) = ctx.span(&id) else {
            return;
        };
        if let Some(PendingSpan(record)) = span.extensions_mut().remove::<PendingSpan>() {
            lock(&self.spans).push(record);
        }
    }

    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut fields = HashMap::new();
        event.record(&mut FieldRecorder(&mut fields));
        lock(&self.events).push(EventRecord {
            level: *event.metadata().level(),
            target: event.metadata().target().to_owned(),
            fields,
        });
    }
}

struct FieldRecorder<'a>(&'a mut HashMap<String, String>);

impl FieldRecorder<'_> {
    fn put(&mut self, field: &Field, value: String) {
        self.0.insert(field.name().to_owned(), value);
    }
}

impl Visit for FieldRecorder<'_> {
    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.put(field, format!("{value:?}"));
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        self.put(field, value.to_owned());
    }

    fn record_error(&mut self, field: &Field, value: &(dyn std::error::Error + 'static)) {
        self.put(field, value.to_string());
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.put(field, value.to_string());
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.put(field, value.to_string());
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.put(field, value.to_string());
    }

    fn record_f64(&mut self, field: &Field, value: f64) {
        self.put(field, value.to_string());
    }
}
