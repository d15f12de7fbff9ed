use cellar::prelude::*;
use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn owner() -> Address {
    Address::new(0, [0x5a; 32])
}

fn uint_fill_bench(c: &mut Criterion) {
    c.bench_function("store_uint x15", |b| {
        b.iter(|| {
            let mut builder = CellBuilder::new();
            for i in 0..15u64 {
                builder.store_uint(black_box(i * 0x0101_0101), 64).unwrap();
            }
            builder.build()
        })
    });
}

fn mint_body_bench(c: &mut Criterion) {
    let mint = MintNft {
        query_id: 1,
        item_index: 42,
        item_owner_address: owner(),
        item_content: "42.json".into(),
        amount: Coins::from(50_000_000u64),
    };
    c.bench_function("mint body", |b| b.iter(|| black_box(&mint).to_body().unwrap()));
}

fn boc_bench(c: &mut Criterion) {
    let body = MintNft {
        query_id: 1,
        item_index: 42,
        item_owner_address: owner(),
        item_content: "42.json".into(),
        amount: Coins::from(50_000_000u64),
    }
    .to_body()
    .unwrap();
    c.bench_function("boc base64", |b| b.iter(|| boc_to_base64(black_box(&body))));
}

criterion_group!(benches, uint_fill_bench, mint_body_bench, boc_bench);
criterion_main!(benches);
