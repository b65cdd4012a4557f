//! A layer that records spans and events so tests can assert on them.

use std::{
    collections::HashMap,
    fmt,
    sync::{Arc, Mutex, PoisonError},
};

use ::tracing::{
    Event, Level, Subscriber,
    field::{Field, Visit},
    span::{Attributes, Id, Record},
};
use tracing_subscriber::{Layer, layer::Context, registry::LookupSpan};

/// Captures closed spans and emitted events with their structured fields.
///
/// Clones share storage, so a clone can be installed in a subscriber while
/// the original is kept for assertions.
///
/// # Examples
/// ```
/// use lcknn_test_support::tracing::RecordingLayer;
/// use tracing_subscriber::layer::SubscriberExt;
///
/// let layer = RecordingLayer::default();
/// let subscriber = tracing_subscriber::registry().with(layer.clone());
/// tracing::subscriber::with_default(subscriber, || {
///     let _span = tracing::info_span!("demo", answer = 42).entered();
///     tracing::info!(count = 3, "hello");
/// });
/// assert_eq!(layer.spans()[0].fields["answer"], "42");
/// assert!(layer.has_event(tracing::Level::INFO, "hello"));
/// ```
#[derive(Clone, Default)]
pub struct RecordingLayer {
    spans: Arc<Mutex<Vec<SpanRecord>>>,
    events: Arc<Mutex<Vec<EventRecord>>>,
}

impl RecordingLayer {
    /// Returns the closed spans in completion order.
    #[must_use]
    pub fn spans(&self) -> Vec<SpanRecord> {
        self.spans
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Returns the emitted events in emission order.
    #[must_use]
    pub fn events(&self) -> Vec<EventRecord> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Returns the first closed span called `name`.
    #[must_use]
    pub fn span(&self, name: &str) -> Option<SpanRecord> {
        self.spans().into_iter().find(|span| span.name == name)
    }

    /// Returns `true` when an event at `level` carried `message`.
    #[must_use]
    pub fn has_event(&self, level: Level, message: &str) -> bool {
        self.events()
            .iter()
            .any(|event| event.level == level && event.message() == Some(message))
    }
}

/// A closed span and the fields recorded against it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SpanRecord {
    /// Span name from the callsite metadata.
    pub name: String,
    /// Field values rendered as text.
    pub fields: HashMap<String, String>,
}

/// An emitted event.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EventRecord {
    /// Event level.
    pub level: Level,
    /// Event target, normally the emitting module path.
    pub target: String,
    /// Field values rendered as text, the message included.
    pub fields: HashMap<String, String>,
}

impl EventRecord {
    /// Returns the event message, if it had one.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.fields.get("message").map(String::as_str)
    }
}

struct OpenSpan(SpanRecord);

struct FieldRecorder<'a>(&'a mut HashMap<String, String>);

impl Visit for FieldRecorder<'_> {
    fn record_str(&mut self, field: &Field, value: &str) {
        self.0.insert(field.name().to_owned(), value.to_owned());
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.0.insert(field.name().to_owned(), format!("{value:?}"));
    }
}

impl<S> Layer<S> for RecordingLayer
where
    S: Subscriber + for<'span> LookupSpan<'span>,
{
    fn on_new_span(&self, attrs: &Attributes<'_>, id: &Id, ctx: Context<'_, S>) {
        let Some(span) = ctx.span(id) else {
            return;
        };
        let mut fields = HashMap::new();
        attrs.record(&mut FieldRecorder(&mut fields));
        span.extensions_mut().insert(OpenSpan(SpanRecord {
            name: attrs.metadata().name().to_owned(),
            fields,
        }));
    }

    fn on_record(&self, id: &Id, values: &Record<'_>, ctx: Context<'_, S>) {
        let Some(span) = ctx.span(id) else {
            return;
        };
        if let Some(OpenSpan(record)) = span.extensions_mut().get_mut::<OpenSpan>() {
            values.record(&mut FieldRecorder(&mut record.fields));
        }
    }

    fn on_close(&self, id: Id, ctx: Context<'_, S>) {
        let Some(span) = ctx.span(&id) else {
            return;
        };
        let Some(OpenSpan(record)) = span.extensions_mut().remove::<OpenSpan>() else {
            return;
        };
        self.spans
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(record);
    }

    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut fields = HashMap::new();
        event.record(&mut FieldRecorder(&mut fields));
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(EventRecord {
                level: *event.metadata().level(),
                target: event.metadata().target().to_owned(),
                fields,
            });
    }
}
