use care_core::db::establish_connection;
use care_core::models::{ActivityKind, NewOccurrence, Occurrence, RecurrenceKind};
use care_core::recurrence::series_dates;
use care_core::repository::{OccurrenceRepository, SeriesRepository, SqliteRepository};
use chrono::NaiveDate;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn bench_series_dates(c: &mut Criterion) {
    let mut group = c.benchmark_group("series_dates");
    let start = ymd(2024, 1, 31);

    for (kind, until) in [
        (RecurrenceKind::Daily, ymd(2025, 1, 31)),
        (RecurrenceKind::Weekly, ymd(2029, 1, 31)),
        (RecurrenceKind::Monthly, ymd(2054, 1, 31)),
    ] {
        group.bench_with_input(BenchmarkId::from_parameter(kind), &until, |b, until| {
            b.iter(|| series_dates(black_box(start), kind, *until))
        });
    }

    group.finish();
}

fn bench_clone_generation(c: &mut Criterion) {
    let base = Occurrence {
        recurrence_kind: RecurrenceKind::Daily,
        what: "Benchmark".to_string(),
        ..Default::default()
    };
    let dates = series_dates(ymd(2024, 1, 1), RecurrenceKind::Daily, ymd(2024, 12, 31));

    c.bench_function("clone_for_date_year_of_daily", |b| {
        b.iter(|| {
            dates
                .iter()
                .map(|d| base.clone_for_date(*d))
                .collect::<Vec<_>>()
        })
    });
}

fn bench_sync_daily_year(c: &mut Criterion) {
    let temp_dir = tempfile::tempdir().unwrap();
    let db_path = temp_dir.path().join("bench.db");
    let runtime = tokio::runtime::Runtime::new().unwrap();

    let (repo, mut base) = runtime.block_on(async {
        let pool = establish_connection(&db_path.to_string_lossy()).await.unwrap();
        let repo = SqliteRepository::new(pool);
        let base = repo
            .add_occurrence(NewOccurrence {
                activity: ActivityKind::Medication,
                what: "Benchmark".to_string(),
                caregiver: "Bench".to_string(),
                date: ymd(2024, 1, 1),
                recurrence_kind: RecurrenceKind::Daily,
                series_end_date: Some(ymd(2024, 12, 31)),
                ..Default::default()
            })
            .await
            .unwrap();
        (repo, base)
    });

    c.bench_function("sync_daily_year", |b| {
        b.iter(|| {
            runtime
                .block_on(repo.sync_recurrence_series(&mut base, None))
                .unwrap()
        })
    });
}

fn bench_stepper(c: &mut Criterion) {
    c.bench_function("next_date_monthly", |b| {
        b.iter(|| care_core::recurrence::next_date(black_box(ymd(2024, 1, 31)), RecurrenceKind::Monthly))
    });
}

criterion_group!(
    benches,
    bench_series_dates,
    bench_clone_generation,
    bench_sync_daily_year,
    bench_stepper
);
criterion_main!(benches);
