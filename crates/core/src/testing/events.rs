//! Capture of tracing events for assertions on log output.

use std::fmt;
use std::sync::{Arc, Mutex};

use tracing::field::{Field, Visit};
use tracing::subscriber::DefaultGuard;
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::Layer;

use super::lock;

/// One recorded event: its level and the names of its fields.
#[derive(Debug, Clone)]
pub struct CapturedEvent {
    pub level: Level,
    pub fields: Vec<&'static str>,
}

impl CapturedEvent {
    pub fn has_field(&self, name: &str) -> bool {
        self.fields.contains(&name)
    }
}

/// Records every event on the current thread while the guard lives.
#[derive(Clone, Default)]
pub struct EventLog(Arc<Mutex<Vec<CapturedEvent>>>);

impl EventLog {
    pub fn install() -> (Self, DefaultGuard) {
        let log = Self::default();
        let guard =
            tracing::subscriber::set_default(tracing_subscriber::registry().with(log.clone()));
        (log, guard)
    }

    pub fn with_field(&self, name: &str) -> Vec<CapturedEvent> {
        lock(&self.0)
            .iter()
            .filter(|e| e.has_field(name))
            .cloned()
            .collect()
    }
}

struct FieldNames(Vec<&'static str>);

impl Visit for FieldNames {
    fn record_debug(&mut self, field: &Field, _value: &dyn fmt::Debug) {
        self.0.push(field.name());
    }
}

impl<S: Subscriber> Layer<S> for EventLog {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut fields = FieldNames(Vec::new());
        event.record(&mut fields);
        lock(&self.0).push(CapturedEvent {
            level: *event.metadata().level(),
            fields: fields.0,
        });
    }
}
