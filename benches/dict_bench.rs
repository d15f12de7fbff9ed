use cellar::prelude::*;
use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn records(n: u64) -> Vec<MintRecord> {
    (0..n)
        .map(|index| MintRecord {
            index: index * 7,
            owner_address: Address::new(0, [index as u8; 32]),
            content: format!("{index}.json"),
            amount: Coins::from(50_000_000u64),
        })
        .collect()
}

fn staking_dict_bench(c: &mut Criterion) {
    let dict: Dictionary<u16> =
        Dictionary::from_entries(16, (0..200u64).map(|k| (k * 311 % 65_536, k as u16))).unwrap();
    c.bench_function("staking dict root", |b| {
        b.iter(|| black_box(&dict).root_cell().unwrap())
    });
}

fn batch_mint_bench(c: &mut Criterion) {
    let batch = BatchMint {
        query_id: 0,
        nfts: records(250),
    };
    c.bench_function("batch mint 250", |b| b.iter(|| black_box(&batch).to_body().unwrap()));
}

criterion_group!(benches, staking_dict_bench, batch_mint_bench);
criterion_main!(benches);
