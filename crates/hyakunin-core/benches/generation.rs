use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::rngs::StdRng;
use rand::SeedableRng;

use hyakunin_core::generator::generate;
use hyakunin_core::session::{OrderMode, QuestionTypeMode, QuizSession, SessionConfig};
use hyakunin_core::{PoemCatalog, PoemStore, QuestionType};

fn bench_generate(c: &mut Criterion) {
    let store = PoemStore::bundled().expect("bundled corpus");
    let poem = store.get(42).expect("poem 42").clone();
    let mut group = c.benchmark_group("generate");

    for question_type in QuestionType::ALL {
        let mut rng = StdRng::seed_from_u64(7);
        group.bench_function(question_type.to_string(), |b| {
            b.iter(|| generate(black_box(&poem), question_type, &store, &mut rng))
        });
    }

    group.finish();
}

fn bench_session(c: &mut Criterion) {
    let catalog: Arc<dyn PoemCatalog> = Arc::new(PoemStore::bundled().expect("bundled corpus"));
    let config = SessionConfig {
        order_mode: OrderMode::Random,
        question_type_mode: QuestionTypeMode::Random,
        subset_size: None,
    };

    c.bench_function("full_session_100", |b| {
        b.iter(|| {
            let mut session = QuizSession::seeded(Arc::clone(&catalog), 1);
            session.start(config.clone()).expect("start");
            for _ in 0..session.len() {
                let answer = session.current_question().expect("question").correct_index;
                session.submit_answer(answer).expect("answer");
                session.advance().expect("advance");
            }
            black_box(session.accuracy())
        })
    });
}

fn bench_load(c: &mut Criterion) {
    c.bench_function("load_bundled_corpus", |b| {
        b.iter(|| PoemStore::bundled().expect("bundled corpus"))
    });
}

criterion_group!(benches, bench_generate, bench_session, bench_load);
criterion_main!(benches);
