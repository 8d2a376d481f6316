use classforge::model::{Gender, Language, Student, SwapMove};
use classforge::optimizer::evaluator::{evaluate, TierTarget};
use classforge::optimizer::{OptimizationOptions, Optimizer, SilentProgress};
use classforge::roster::Roster;
use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use std::collections::BTreeMap;
use std::hint::black_box;

// Deterministic, deliberately lopsided: tier-1 students pile up in the first classes.
fn setup_roster(classes: usize, population: usize) -> Roster {
    let mut partition: BTreeMap<String, Vec<String>> = (0..classes)
        .map(|c| (format!("C{}", c), Vec::new()))
        .collect();
    let mut students = Vec::with_capacity(population);

    for i in 0..population {
        let name = format!("s{:03}", i);
        let tier = (i % 5) as u8 + 1;
        let class = if tier == 1 { i % 2 } else { i % classes };
        let friends = if i % 7 == 0 && i + 1 < population {
            vec![format!("s{:03}", i + 1)]
        } else {
            Vec::new()
        };
        if let Some(members) = partition.get_mut(&format!("C{}", class)) {
            members.push(name.clone());
        }
        students.push(
            Student::builder()
                .name(name)
                .tier(tier)
                .gender(if i % 2 == 0 { Gender::Boy } else { Gender::Girl })
                .language(if i % 6 == 0 {
                    Language::Limited
                } else {
                    Language::Fluent
                })
                .friends(friends)
                .build(),
        );
    }
    Roster::new(students, partition).unwrap()
}

fn criterion_benchmark(c: &mut Criterion) {
    let roster = setup_roster(6, 150);

    c.bench_function("optimize (150 students, 6 classes)", |b| {
        b.iter_batched(
            || roster.clone(),
            |mut r| {
                Optimizer::new(OptimizationOptions::default())
                    .run(&mut r, &SilentProgress)
                    .unwrap()
            },
            BatchSize::SmallInput,
        )
    });

    let swap = SwapMove::new("C0", vec!["s000".into()], "C2", vec!["s002".into()]);
    let mut scratch = roster.clone();
    c.bench_function("evaluate single swap", |b| {
        b.iter(|| {
            evaluate(
                black_box(&mut scratch),
                TierTarget { tier: 1, cap: 2 },
                black_box(&swap),
            )
            .unwrap()
        })
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
