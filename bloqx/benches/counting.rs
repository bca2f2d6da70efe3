use criterion::{criterion_group, criterion_main, Criterion};

use bloqx::catalog::find;

fn benchmark_costing(c: &mut Criterion) {
    for name in ["mod_exp_small", "prepare_nu", "qubitization_walk"] {
        let bloq = find(name).unwrap().bloq();

        c.bench_function(&format!("t_complexity_{}", name), |b| {
            b.iter(|| std::hint::black_box(bloq.t_complexity().unwrap()));
        });

        c.bench_function(&format!("leaf_tally_{}", name), |b| {
            b.iter(|| {
                let cg = bloq.call_graph().unwrap();
                std::hint::black_box(cg.sigma().unwrap());
            });
        });
    }
}

fn benchmark_flattening(c: &mut Criterion) {
    let bloq = find("mod_exp_small").unwrap().bloq();
    let cbloq = bloq.decompose().unwrap();

    c.bench_function("flatten_mod_exp_small", |b| {
        b.iter(|| std::hint::black_box(cbloq.flatten(|_| true).unwrap()));
    });
}

criterion_group!(benches, benchmark_costing, benchmark_flattening);
criterion_main!(benches);
