//! 해석기/로더 벤치마크

use criterion::{Criterion, black_box, criterion_group, criterion_main};

use airlock_core::paths::RootedPath;
use airlock_yarn_classic::classifier::{
    is_from_trusted_registry, is_tarball_url, is_version_control_url,
};
use airlock_yarn_classic::lockfile::{RawLockEntry, YarnLockLoader};
use airlock_yarn_classic::resolver::resolve_packages;

/// n개의 레지스트리 항목을 담은 lockfile 본문을 생성합니다.
fn synthetic_lockfile(n: usize) -> String {
    let mut content = String::from("# yarn lockfile v1\n\n");
    for i in 0..n {
        content.push_str(&format!(
            "pkg-{i}@^1.0.0:\n  version \"1.0.{i}\"\n  resolved \"https://registry.yarnpkg.com/pkg-{i}/-/pkg-{i}-1.0.{i}.tgz#abc\"\n  integrity sha512-abc{i}\n\n"
        ));
    }
    content
}

fn synthetic_entries(n: usize) -> Vec<RawLockEntry> {
    YarnLockLoader::parse(&synthetic_lockfile(n), "bench.lock").unwrap()
}

fn bench_lockfile_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("lockfile_parse");
    for size in [10, 100, 1000] {
        let content = synthetic_lockfile(size);
        group.bench_function(format!("{size}_entries"), |b| {
            b.iter(|| YarnLockLoader::parse(black_box(&content), "bench.lock").unwrap());
        });
    }
    group.finish();
}

fn bench_classifier_predicates(c: &mut Criterion) {
    let urls = [
        "https://registry.yarnpkg.com/chai/-/chai-4.2.0.tgz#abc",
        "git+https://github.com/org/repo.git#fffffff",
        "https://example.com/archive-1.0.0.tar.gz",
        "https://codeload.github.com/org/foo/tar.gz/fffffff",
        "ftp://foo.com/bar.tar",
    ];
    c.bench_function("classifier_predicates", |b| {
        b.iter(|| {
            for url in urls {
                black_box(is_from_trusted_registry(black_box(url)));
                black_box(is_version_control_url(black_box(url)));
                black_box(is_tarball_url(black_box(url)));
            }
        });
    });
}

fn bench_resolve_packages(c: &mut Criterion) {
    let root = RootedPath::new("/project");
    let mut group = c.benchmark_group("resolve_packages");
    for size in [10, 100, 1000] {
        let entries = synthetic_entries(size);
        group.bench_function(format!("{size}_entries"), |b| {
            b.iter(|| resolve_packages(black_box(&root), black_box(&entries)).unwrap());
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_lockfile_parse,
    bench_classifier_predicates,
    bench_resolve_packages
);
criterion_main!(benches);
