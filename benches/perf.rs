use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

use ap_leaderboard::leaderboard_fetch::parse_leaderboard_json;
use ap_leaderboard::names::clean_display_name;
use ap_leaderboard::output::{ProcessedPlayer, group_by_country};

const COUNTRIES: &[&str] = &["NL", "DE", "SE", "US", "JP", "BR", "Unknown"];

fn sample_players(n: usize) -> Vec<ProcessedPlayer> {
    (0..n)
        .map(|i| ProcessedPlayer {
            rank: i as u32 + 1,
            name: format!("Player{i}"),
            uuid: format!("uuid-{i}"),
            country: COUNTRIES[i % COUNTRIES.len()].to_string(),
            current_ap: 40_000.0 - (i as f64) * 37.5,
            start_ap: 39_000.0 - (i as f64) * 30.0,
            monthly_gain: 1_000.0 - (i as f64) * 7.5,
        })
        .collect()
}

fn bench_leaderboard_parse(c: &mut Criterion) {
    c.bench_function("leaderboard_parse", |b| {
        b.iter(|| {
            let rows = parse_leaderboard_json(black_box(LEADERBOARD_JSON)).unwrap();
            black_box(rows.len());
        })
    });
}

fn bench_clean_names(c: &mut Criterion) {
    let names = [
        "§b[MVP§c+§b] Steve",
        "§6[MVP§0++§6] Alex",
        "§a[VIP] Notch",
        "§7jeb_",
        "Dinnerbone",
    ];
    c.bench_function("clean_display_name", |b| {
        b.iter(|| {
            for name in names {
                black_box(clean_display_name(black_box(name)));
            }
        })
    });
}

fn bench_group_by_country(c: &mut Criterion) {
    let players = sample_players(100);
    c.bench_function("group_by_country_100", |b| {
        b.iter(|| {
            let groups = group_by_country(black_box(&players));
            black_box(groups.len());
        })
    });
}

criterion_group!(
    perf,
    bench_leaderboard_parse,
    bench_clean_names,
    bench_group_by_country
);
criterion_main!(perf);

static LEADERBOARD_JSON: &str = include_str!("../tests/fixtures/leaderboard_page.json");
