use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};
use sem_ver::SemVer;

fn version_cmp_neither_prerelease(c: &mut Criterion) {
    let sa = "1.82.0";
    let sb = "v1.82.1";
    let va = SemVer::new(sa);
    let vb = SemVer::new(sb);
    c.bench_function(&format!("Compare {sa} and {sb}"), |b| {
        b.iter(|| {
            let _ver = black_box(va.compare(&vb));
        })
    });
}

fn version_cmp_one_prerelease(c: &mut Criterion) {
    let sa = "1.82.0";
    let sb = "1.82.0-alpha1";
    let va = SemVer::new(sa);
    let vb = SemVer::new(sb);
    c.bench_function(&format!("Compare {sa} and {sb}"), |b| {
        b.iter(|| {
            let _ver = black_box(va.compare(&vb));
        })
    });
}

fn version_cmp_both_prerelease(c: &mut Criterion) {
    let sa = "1.82.0-rc4";
    let sb = "1.82.0-alpha1";
    let va = SemVer::new(sa);
    let vb = SemVer::new(sb);
    c.bench_function(&format!("Compare {sa} and {sb}"), |b| {
        b.iter(|| {
            let _ver = black_box(va.compare(&vb));
        })
    });
}

fn version_first_parse(c: &mut Criterion) {
    let sa = "v12.34.56-beta_2";
    c.bench_function(&format!("Validate {sa} on first access"), |b| {
        b.iter(|| {
            let _valid = black_box(SemVer::new(sa).is_valid());
        })
    });
}

criterion_group!(
    benches,
    version_cmp_both_prerelease,
    version_cmp_neither_prerelease,
    version_cmp_one_prerelease,
    version_first_parse
);
criterion_main!(benches);
