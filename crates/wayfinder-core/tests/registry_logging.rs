#![forbid(unsafe_code)]

//! Validation failures are reported through `tracing`, never raised.
//!
//! Run:
//!   cargo test -p wayfinder-core --test registry_logging

use std::sync::{Arc, Mutex};

use serde_json::json;
use tracing_subscriber::layer::SubscriberExt;
use wayfinder_core::{StepRegistry, validate_step, validate_steps};

#[derive(Clone, Default)]
struct WarnCapture {
    warnings: Arc<Mutex<Vec<(String, String)>>>,
}

struct ErrorField(Option<String>);

impl tracing::field::Visit for ErrorField {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        if field.name() == "error" {
            self.0 = Some(format!("{value:?}"));
        }
    }
}

impl<S: tracing::Subscriber> tracing_subscriber::Layer<S> for WarnCapture {
    fn on_event(
        &self,
        event: &tracing::Event<'_>,
        _ctx: tracing_subscriber::layer::Context<'_, S>,
    ) {
        if *event.metadata().level() != tracing::Level::WARN {
            return;
        }
        let mut visitor = ErrorField(None);
        event.record(&mut visitor);
        self.warnings.lock().unwrap().push((
            event.metadata().target().to_string(),
            visitor.0.unwrap_or_default(),
        ));
    }
}

fn warnings_from<F: FnOnce()>(f: F) -> Vec<(String, String)> {
    let layer = WarnCapture::default();
    let subscriber = tracing_subscriber::registry().with(layer.clone());
    tracing::subscriber::with_default(subscriber, f);
    layer.warnings.lock().unwrap().clone()
}

#[test]
fn each_bad_element_is_reported() {
    let warnings = warnings_from(|| {
        let ok = validate_steps(&json!([
            { "selector": "#a" },
            { "selector": "" },
            "not a record",
        ]));
        assert!(!ok);
    });
    assert_eq!(warnings.len(), 2);
    assert!(warnings.iter().all(|(target, _)| target == "wayfinder.registry"));
    assert_eq!(warnings[0].1, "step selector is empty");
    assert_eq!(warnings[1].1, "step is not a plain record");
}

#[test]
fn valid_step_is_silent() {
    let warnings = warnings_from(|| {
        assert!(validate_step(&json!({ "selector": ".menu > li" })));
    });
    assert!(warnings.is_empty());
}

#[test]
fn empty_sequence_is_reported_once() {
    let warnings = warnings_from(|| {
        assert!(!validate_steps(&json!([])));
        let (registry, issues) = StepRegistry::from_value(&json!([]));
        assert!(registry.is_empty());
        assert_eq!(issues.len(), 1);
    });
    assert_eq!(warnings.len(), 2);
    assert!(warnings.iter().all(|(_, err)| err == "step sequence is empty"));
}
