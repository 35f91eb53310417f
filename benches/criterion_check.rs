#![cfg(all(feature = "criterion-bench", feature = "memory-store"))]

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use futures::executor::block_on;
use rs_ability::{
    Ability, Decision, DetectorError, MemoryRelationStore, Model, RelationStore, Target, Verdict,
};
use std::hint::black_box;

struct User {
    id: String,
    name: String,
}
rs_ability::impl_model!(User, "users");

struct Post {
    id: String,
}
rs_ability::impl_model!(Post, "posts");

fn user(id: &str) -> User {
    User {
        id: id.to_string(),
        name: id.to_string(),
    }
}

fn setup_ability(store: MemoryRelationStore) -> Ability<User> {
    Ability::<User>::with_setup(|can| {
        can.declare(["view", "edit"], User::model(), |me: &User, target: Target<'_>| {
            target
                .downcast_ref::<User>()
                .is_some_and(|other| other.name == me.name)
        })?;
        can.declare("update", Post::model(), move |me: &User, target: Target<'_>| {
            let post = target.require::<Post>()?;
            let (store, user_id, post_id) = (store.clone(), me.id.clone(), post.id.clone());
            Ok::<_, DetectorError>(Decision::pending(async move {
                store.count("users_posts", &user_id, &post_id).await
            }))
        })
    })
    .unwrap()
}

fn setup_wide_ability(resource_count: usize) -> Ability<User> {
    let mut ability = Ability::<User>::new();
    for i in 0..resource_count {
        ability
            .declare(
                ["view", "edit", "destroy"],
                format!("resource_{i}"),
                |_: &User, _: Target<'_>| true,
            )
            .unwrap();
    }
    ability
}

fn bench_check(c: &mut Criterion) {
    let mut group = c.benchmark_group("check");
    group.sample_size(30);
    group.throughput(Throughput::Elements(1));

    let store = MemoryRelationStore::new();
    store.link("users_posts", "user_1", "post_1");
    let ability = setup_ability(store);
    let me = user("user_1");
    let post = Post {
        id: "post_1".to_string(),
    };

    assert_eq!(
        block_on(ability.check(&me, "update", &post)).unwrap(),
        Verdict::Int(1)
    );

    group.bench_function("immediate", |b| {
        b.iter(|| {
            let verdict = block_on(ability.check(&me, "view", &me)).unwrap();
            black_box(verdict);
        });
    });
    group.bench_function("pending", |b| {
        b.iter(|| {
            let verdict = block_on(ability.check(&me, "update", &post)).unwrap();
            black_box(verdict);
        });
    });
    group.bench_function("bare_name_target", |b| {
        b.iter(|| {
            let verdict = block_on(ability.check(&me, "view", "users")).unwrap();
            black_box(verdict);
        });
    });
    group.bench_function("unknown_action", |b| {
        b.iter(|| {
            let result = block_on(ability.check(&me, "destroy", &me));
            assert!(result.is_err());
            black_box(result.is_err());
        });
    });

    group.finish();
}

fn bench_registry_size(c: &mut Criterion) {
    let mut group = c.benchmark_group("check_registry_size");
    group.sample_size(30);
    group.throughput(Throughput::Elements(1));

    let me = user("user_1");
    for resource_count in [1usize, 8, 32, 128] {
        let ability = setup_wide_ability(resource_count);
        let target = format!("resource_{}", resource_count - 1);

        let id = BenchmarkId::from_parameter(resource_count);
        group.bench_with_input(id, &resource_count, |b, _| {
            b.iter(|| {
                let verdict = block_on(ability.check(&me, "edit", &target)).unwrap();
                black_box(verdict);
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_check, bench_registry_size);
criterion_main!(benches);
