use criterion::{Criterion, black_box, criterion_group, criterion_main};
use std::time::Instant;
use workbench_complete::{FetchError, NamespaceFetcher, NavChild, NavInfo, PrefixTrie};
use workbench_core::StyleType;

struct Wide(usize);

impl NamespaceFetcher for Wide {
    fn fetch(&self, _url: &str) -> Result<NavInfo, FetchError> {
        Ok(NavInfo {
            name: "bench".to_string(),
            is_readable_child: true,
            children: (0..self.0)
                .map(|i| NavChild {
                    name: format!("table_{i:05}"),
                    ..NavChild::default()
                })
                .collect(),
        })
    }
}

fn keyword_trie(count: usize) -> PrefixTrie {
    let mut trie = PrefixTrie::new();
    for i in 0..count {
        let style = if i % 3 == 0 {
            StyleType::Reserved
        } else {
            StyleType::Keyword
        };
        trie.add_entry(&format!("KW_{i:05}"), style);
        trie.add_entry(&format!("kw_{i:05}"), style);
    }
    trie
}

fn bench_build(c: &mut Criterion) {
    c.bench_function("trie/add_10k", |b| {
        b.iter(|| black_box(keyword_trie(5_000)))
    });
}

fn bench_enumerate(c: &mut Criterion) {
    let trie = keyword_trie(5_000);
    c.bench_function("trie/enumerate_case_insensitive", |b| {
        b.iter(|| black_box(trie.strings_from_prefix(black_box("kw_01")).count()))
    });
    c.bench_function("trie/first_match", |b| {
        b.iter(|| black_box(trie.strings_from_prefix(black_box("k")).next()))
    });
    c.bench_function("trie/style_lookup", |b| {
        b.iter(|| black_box(trie.style(black_box("Kw_04999"))))
    });
}

fn bench_cached_request(c: &mut Criterion) {
    let fetcher = Wide(2_000);
    let mut trie = PrefixTrie::new();
    let now = Instant::now();
    black_box(
        trie.strings_from_request_at(&fetcher, "http://bench/", "db.sch.", now)
            .count(),
    );

    c.bench_function("trie/cached_nested_request", |b| {
        b.iter(|| {
            black_box(
                trie.strings_from_request_at(&fetcher, "http://bench/", "db.sch.table_01", now)
                    .count(),
            )
        })
    });
}

criterion_group!(benches, bench_build, bench_enumerate, bench_cached_request);
criterion_main!(benches);
