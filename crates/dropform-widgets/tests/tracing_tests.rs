#![forbid(unsafe_code)]

//! Render span instrumentation.
//!
//! Spans enabled:
//!   cargo test -p dropform-widgets --features tracing --test tracing_tests
//!
//! Without the feature no spans are emitted:
//!   cargo test -p dropform-widgets --test tracing_tests -- zero_overhead

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use dropform_core::geometry::Rect;
use dropform_render::buffer::Buffer;
use dropform_widgets::{FieldDescriptor, FormEngine, FormSchema, Widget};

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;

#[derive(Debug, Clone)]
#[allow(dead_code)]
struct CapturedSpan {
    name: String,
    fields: HashMap<String, String>,
    parent_widget: Option<String>,
}

#[derive(Default)]
struct SpanCapture {
    spans: Arc<Mutex<Vec<CapturedSpan>>>,
    // Span id -> widget field, so children can name their parent.
    widgets: Arc<Mutex<HashMap<tracing::span::Id, String>>>,
}

struct FieldVisitor(Vec<(String, String)>);

impl tracing::field::Visit for FieldVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        self.0.push((field.name().to_string(), format!("{value:?}")));
    }

    fn record_u64(&mut self, field: &tracing::field::Field, value: u64) {
        self.0.push((field.name().to_string(), value.to_string()));
    }

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        self.0.push((field.name().to_string(), value.to_string()));
    }
}

impl<S> tracing_subscriber::Layer<S> for SpanCapture
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_new_span(
        &self,
        attrs: &tracing::span::Attributes<'_>,
        id: &tracing::span::Id,
        ctx: tracing_subscriber::layer::Context<'_, S>,
    ) {
        let mut visitor = FieldVisitor(Vec::new());
        attrs.record(&mut visitor);
        let fields: HashMap<String, String> = visitor.0.into_iter().collect();

        let mut widgets = self.widgets.lock().unwrap();
        let parent_widget = ctx
            .current_span()
            .id()
            .and_then(|parent| widgets.get(parent).cloned());
        if let Some(widget) = fields.get("widget") {
            widgets.insert(id.clone(), widget.clone());
        }

        self.spans.lock().unwrap().push(CapturedSpan {
            name: attrs.metadata().name().to_string(),
            fields,
            parent_widget,
        });
    }
}

fn with_captured_spans(f: impl FnOnce()) -> Vec<CapturedSpan> {
    let layer = SpanCapture::default();
    let spans = layer.spans.clone();
    let subscriber = tracing_subscriber::registry().with(layer);
    tracing::subscriber::with_default(subscriber, f);
    let captured = spans.lock().unwrap().clone();
    captured
}

fn sign_up() -> FormEngine {
    let schema = FormSchema::new(vec![
        FieldDescriptor::email("email", "Email"),
        FieldDescriptor::file("avatar", "Avatar"),
    ])
    .unwrap();
    FormEngine::builder(schema)
        .submit_label("Register")
        .build()
        .unwrap()
}

fn render(form: &FormEngine, w: u16, h: u16) {
    let mut buf = Buffer::new(w, h);
    form.render(Rect::from_size(w, h), &mut buf);
}

#[cfg(feature = "tracing")]
fn widget_spans<'a>(spans: &'a [CapturedSpan], widget: &str) -> Vec<&'a CapturedSpan> {
    spans
        .iter()
        .filter(|s| s.name == "widget_render" && s.fields.get("widget").is_some_and(|w| w == widget))
        .collect()
}

#[test]
#[cfg(feature = "tracing")]
fn form_render_records_area() {
    let form = sign_up();
    let spans = with_captured_spans(|| render(&form, 50, 16));

    let form_spans = widget_spans(&spans, "FormEngine");
    assert_eq!(form_spans.len(), 1);
    let fields = &form_spans[0].fields;
    assert_eq!(fields.get("w").map(String::as_str), Some("50"));
    assert_eq!(fields.get("h").map(String::as_str), Some("16"));
    assert_eq!(form_spans[0].parent_widget, None);
}

#[test]
#[cfg(feature = "tracing")]
fn drop_zone_span_nests_under_form() {
    let form = sign_up();
    let spans = with_captured_spans(|| render(&form, 50, 16));

    let zones = widget_spans(&spans, "DropZone");
    assert_eq!(zones.len(), 1);
    assert_eq!(zones[0].parent_widget.as_deref(), Some("FormEngine"));
}

#[test]
#[cfg(feature = "tracing")]
fn spinner_span_only_while_busy() {
    let mut form = sign_up();
    let idle = with_captured_spans(|| render(&form, 50, 16));
    assert!(widget_spans(&idle, "Spinner").is_empty());

    form.set_busy(true);
    let busy = with_captured_spans(|| render(&form, 50, 16));
    let spinners = widget_spans(&busy, "Spinner");
    assert_eq!(spinners.len(), 1);
    assert_eq!(spinners[0].parent_widget.as_deref(), Some("FormEngine"));
}

#[test]
#[cfg(not(feature = "tracing"))]
fn zero_overhead_without_feature() {
    let form = sign_up();
    let spans = with_captured_spans(|| render(&form, 50, 16));
    assert!(spans.iter().all(|s| s.name != "widget_render"));
}
