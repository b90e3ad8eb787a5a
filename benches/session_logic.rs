use criterion::{black_box, criterion_group, criterion_main, Criterion};
use tui_quiz::core::{generate_round, QuizSession, SimpleRng};
use tui_quiz::term::{FrameBuffer, QuizView, Viewport};

fn bench_generate_round(c: &mut Criterion) {
    let mut rng = SimpleRng::new(12345);

    c.bench_function("generate_round", |b| {
        b.iter(|| black_box(generate_round(&mut rng)))
    });
}

fn bench_submit_verdict(c: &mut Criterion) {
    let mut session = QuizSession::new(12345);
    let _ = session.start_session();

    c.bench_function("submit_verdict", |b| {
        b.iter(|| {
            let _ = session.submit_verdict(black_box(true));
            session.take_events();
        })
    });
}

fn bench_full_session_ticks(c: &mut Criterion) {
    c.bench_function("session_20_ticks", |b| {
        b.iter(|| {
            let mut session = QuizSession::new(7);
            let _ = session.start_session();
            for _ in 0..400 {
                session.advance(black_box(50));
            }
            black_box(session.take_events().len())
        })
    });
}

fn bench_render(c: &mut Criterion) {
    let mut session = QuizSession::new(12345);
    let _ = session.start_session();
    let snap = session.snapshot();
    let view = QuizView::new();
    let mut fb = FrameBuffer::new(80, 24);

    c.bench_function("render_80x24", |b| {
        b.iter(|| view.render_into(black_box(&snap), Viewport::new(80, 24), &mut fb))
    });
}

criterion_group!(
    benches,
    bench_generate_round,
    bench_submit_verdict,
    bench_full_session_ticks,
    bench_render
);
criterion_main!(benches);
