use criterion::{BatchSize, Criterion, black_box, criterion_group, criterion_main};
use workbench_core::{IdPool, LruList, Position, QueryEditor};

fn query_text(line_count: usize) -> String {
    let mut out = String::with_capacity(line_count * 48);
    for i in 0..line_count {
        out.push_str(&format!(
            "SELECT col_{i}, 'literal {i}' FROM schema.table_{i} -- line {i}\n"
        ));
    }
    out.pop();
    out
}

fn bench_id_pool_churn(c: &mut Criterion) {
    c.bench_function("id_pool/10k_get_release", |b| {
        b.iter(|| {
            let mut pool = IdPool::new();
            for _ in 0..1_000 {
                pool.get();
            }
            for i in (0..1_000).step_by(3) {
                pool.release(i).unwrap();
            }
            for _ in 0..9_000 {
                let id = pool.get();
                pool.release(black_box(id)).unwrap();
            }
            black_box(pool.watermark());
        })
    });
}

fn bench_lru_put_and_sort(c: &mut Criterion) {
    let options: Vec<String> = (0..500).map(|i| format!("option_{i}")).collect();
    c.bench_function("lru/put_and_sort_500", |b| {
        b.iter(|| {
            let mut lru = LruList::new(40).with_fallback(|a: &String, b: &String| a.cmp(b));
            for option in options.iter().step_by(7) {
                lru.put(option.clone());
            }
            let mut sorted = options.clone();
            lru.sort(&mut sorted);
            black_box(sorted);
        })
    });
}

fn bench_typing_with_undo(c: &mut Criterion) {
    let text = query_text(2_000);
    c.bench_function("editor/type_100_then_undo", |b| {
        b.iter_batched(
            || {
                let mut editor = QueryEditor::new(&text);
                editor.set_caret(Position::new(1_000, 10));
                editor
            },
            |mut editor| {
                for _ in 0..100 {
                    editor.insert_text("x");
                }
                editor.undo();
                black_box(editor.text().len());
            },
            BatchSize::LargeInput,
        )
    });
}

criterion_group!(
    benches,
    bench_id_pool_churn,
    bench_lru_put_and_sort,
    bench_typing_with_undo
);
criterion_main!(benches);
