use criterion::{Criterion, criterion_group, criterion_main};
use structpack::{StructBuilder, StructType};

fn gen_struct(field_count: usize) -> StructType {
    let fmt = vec!["S>"; field_count].join(" ");
    StructBuilder::new().format(&fmt).build().unwrap()
}

fn gen_packet(len: usize) -> Vec<u8> {
    // Deterministic but non-trivial pattern
    (0..len).map(|i| (i * 31 % 256) as u8).collect()
}

fn bench_struct_decode(c: &mut Criterion) {
    for &field_count in &[1usize, 10, 50, 100] {
        let ty = gen_struct(field_count);
        let packet = gen_packet(ty.size());

        c.bench_function(&format!("decode_{}_fields", field_count), |b| {
            b.iter(|| ty.decode(&packet))
        });

        let record = ty.decode(&packet);
        c.bench_function(&format!("encode_{}_fields", field_count), |b| {
            b.iter(|| record.encode().unwrap())
        });
    }
}

fn bench_struct_define(c: &mut Criterion) {
    let fmt = "A4 N n C C x2 L< L< Q> a16 H8";
    c.bench_function("define_format", |b| {
        b.iter(|| StructBuilder::new().format(fmt).build().unwrap())
    });
}

criterion_group!(benches, bench_struct_decode, bench_struct_define);
criterion_main!(benches);
