use criterion::{Criterion, criterion_group, criterion_main};
use quarto_scanner::{ScanOptions, Scanner, tokenize};
use xi_rope::Rope;

fn generate_content(size: usize) -> String {
    let base = "Some *emphasis* and **strong** text, with ***both*** at once.\n\
                Intraword snake_case_names stay_plain, **** rules stay literal.\n\
                An *unclosed run and a `*code*` span with _under_ scores.\n\n";
    base.repeat(size)
}

fn bench_tokenize(c: &mut Criterion) {
    let mut group = c.benchmark_group("scan");
    group.sample_size(10);

    for size in [10, 100] {
        let rope = Rope::from(generate_content(size));
        group.bench_function(format!("tokenize_{size}"), |b| {
            b.iter(|| {
                let mut scanner = Scanner::new(ScanOptions::default());
                let out = tokenize(std::hint::black_box(&rope), &mut scanner);
                std::hint::black_box(out);
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_tokenize);
criterion_main!(benches);
