use criterion::{black_box, criterion_group, criterion_main, Criterion};
use lunary_api::social::format::fit_to_budget;
use lunary_api::social::platform::Platform;
use lunary_api::social::validate::validate_draft;

fn benchmark_validate_and_format(c: &mut Criterion) {
    let strategy = Platform::Instagram.strategy();
    let hashtags = vec!["#astrology".to_string(), "#scorpio".to_string()];

    // Clean long-form body near the budget
    let clean_body = "Scorpio placements tend to notice what others miss. ".repeat(40);
    // Dirty body that trips several validators
    let dirty_body = format!(
        "{} Scorpio always controls everything and your growth awaits...",
        "Scorpio tends to run deep. ".repeat(40)
    );

    let mut group = c.benchmark_group("social_pipeline");

    group.bench_function("validate_clean_long_body", |b| {
        b.iter(|| {
            validate_draft(
                black_box(&clean_body),
                black_box(&hashtags),
                "Scorpio",
                &strategy,
            )
        })
    });

    group.bench_function("validate_dirty_long_body", |b| {
        b.iter(|| {
            validate_draft(
                black_box(&dirty_body),
                black_box(&hashtags),
                "Scorpio",
                &strategy,
            )
        })
    });

    group.bench_function("format_over_budget_body", |b| {
        let twitter = Platform::Twitter.strategy();
        b.iter(|| fit_to_budget(black_box(&clean_body), black_box(&hashtags), &twitter))
    });

    group.finish();
}

criterion_group!(benches, benchmark_validate_and_format);
criterion_main!(benches);
