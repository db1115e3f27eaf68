use std::pin::pin;

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use stackref::{Holder, Watcher};

fn bench_watch(c: &mut Criterion) {
    let mut group = c.benchmark_group("holder_watcher");

    group.bench_function("bind_reset_churn", |b| {
        let mut watcher = Box::pin(Watcher::new());
        b.iter(|| {
            // A fresh holder per iteration keeps the key space from running out.
            let holder = pin!(Holder::new(0u64));
            for _ in 0..64 {
                watcher.as_mut().bind(holder.as_ref());
                watcher.as_mut().reset();
            }
        });
    });

    group.bench_function("guarded_read", |b| {
        let holder = Box::pin(Holder::new(42u64));
        let mut watcher = Box::pin(Watcher::new());
        watcher.as_mut().bind(holder.as_ref());
        b.iter(|| {
            if watcher.is_valid() {
                black_box(*watcher.borrow());
            }
        });
    });

    group.bench_function("holder_drop_with_64_watchers", |b| {
        let mut watchers: Vec<_> = (0..64).map(|_| Box::pin(Watcher::<u64>::new())).collect();
        b.iter(|| {
            let holder = Box::pin(Holder::new(black_box(7u64)));
            for w in &mut watchers {
                w.as_mut().bind(holder.as_ref());
            }
            drop(holder);
        });
    });

    group.bench_function("refcell_baseline_read", |b| {
        let cell = std::rc::Rc::new(std::cell::RefCell::new(42u64));
        let weak = std::rc::Rc::downgrade(&cell);
        b.iter(|| {
            if let Some(strong) = weak.upgrade() {
                black_box(*strong.borrow());
            }
        });
    });

    group.finish();
}

criterion_group!(benches, bench_watch);
criterion_main!(benches);
