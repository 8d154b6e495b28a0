//! Benchmarks for form rendering and input handling.
//!
//! Run with: cargo bench -p dropform-widgets

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use dropform_core::event::{Event, KeyCode, KeyEvent};
use dropform_core::geometry::Rect;
use dropform_render::buffer::Buffer;
use dropform_widgets::validation::{Email, MinLength, Required, Rules};
use dropform_widgets::{FieldDescriptor, FormEngine, FormSchema, FormValues, Widget};
use std::hint::black_box;

fn sign_up_schema() -> FormSchema {
    FormSchema::new(vec![
        FieldDescriptor::text("firstName", "First Name").span(2),
        FieldDescriptor::text("lastName", "Last Name").span(2),
        FieldDescriptor::email("email", "Email"),
        FieldDescriptor::password("password", "Password"),
        FieldDescriptor::file("picture", "Picture").placeholder("Add Picture Here"),
    ])
    .expect("static schema")
}

fn filled_form() -> FormEngine {
    FormEngine::builder(sign_up_schema())
        .initial_values(
            FormValues::new()
                .with_text("firstName", "Ada")
                .with_text("lastName", "Lovelace")
                .with_text("email", "ada@example.com")
                .with_text("password", "analytical")
                .with_file("picture", "/tmp/ada.png"),
        )
        .ruleset(
            Rules::new()
                .text("email", Required::new())
                .text("email", Email::new())
                .text("password", MinLength::new(6)),
        )
        .submit_label("Register")
        .toggle_label("Already have an account? Login here.")
        .build()
        .expect("values match schema")
}

fn bench_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("form/render");

    for busy in [false, true] {
        let mut form = filled_form();
        form.set_busy(busy);
        let label = if busy { "busy" } else { "idle" };

        for (w, h) in [(30, 30), (80, 24), (200, 60)] {
            let area = Rect::from_size(w, h);
            let mut buf = Buffer::new(w, h);
            group.bench_with_input(
                BenchmarkId::new(label, format!("{w}x{h}")),
                &(),
                |b, _| {
                    b.iter(|| {
                        buf.clear();
                        form.render(area, &mut buf);
                        black_box(&buf);
                    })
                },
            );
        }
    }

    group.finish();
}

fn bench_typing(c: &mut Criterion) {
    let mut group = c.benchmark_group("form/input");
    let keys: Vec<Event> = "someone@example.com"
        .chars()
        .map(|ch| Event::Key(KeyEvent::new(KeyCode::Char(ch))))
        .collect();

    group.bench_function("type_email", |b| {
        b.iter(|| {
            let mut form = FormEngine::new(sign_up_schema());
            form.focus_field("email").expect("email exists");
            for key in &keys {
                form.handle_event(key);
            }
            black_box(form.values().text("email").map(str::len));
        })
    });

    group.bench_function("validate", |b| {
        let form = filled_form();
        b.iter(|| black_box(form.validate()))
    });

    group.finish();
}

criterion_group!(benches, bench_render, bench_typing);
criterion_main!(benches);
