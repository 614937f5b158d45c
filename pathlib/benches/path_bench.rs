use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use pathlib::flavor::Flavor;
use pathlib::path::normalize::resolve_components;
use pathlib::path::parse::parse_parts;
use pathlib::{BoundPath, MemFs, PurePath, Walk, WalkControl};
use std::sync::Arc;

fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse");

    for (name, flavor, input) in [
        ("posix_absolute", Flavor::Posix, "/usr/local/lib/python3.11/site.py"),
        ("posix_noisy", Flavor::Posix, "a//b/./c/../d/"),
        ("windows_drive", Flavor::Windows, r"C:\Users\bob\notes.txt"),
        ("windows_unc", Flavor::Windows, r"\\server\share\dir\file.txt"),
        ("windows_mixed", Flavor::Windows, "c:/Program Files\\App/bin"),
    ] {
        group.bench_with_input(BenchmarkId::new("parse_parts", name), &input, |b, &input| {
            b.iter(|| parse_parts([black_box(input)], flavor));
        });
    }

    group.bench_function("split_root_unc", |b| {
        b.iter(|| Flavor::Windows.split_root(black_box(r"\\server\share\dir")));
    });

    group.finish();
}

fn bench_algebra(c: &mut Criterion) {
    let mut group = c.benchmark_group("algebra");

    let path = PurePath::posix(["/home/user/projects/pathlib/src/lib.rs"]);
    let base = PurePath::posix(["/home/user/projects"]);
    let windows = PurePath::windows([r"C:\Users\Bob\Projects\pathlib\src\lib.rs"]);
    let windows_base = PurePath::windows(["c:/users/bob"]);

    group.bench_function("name_suffix_stem", |b| {
        b.iter(|| {
            let p = black_box(&path);
            (p.name().len(), p.suffix().len(), p.stem().len())
        });
    });

    group.bench_function("join", |b| {
        b.iter(|| black_box(&base).join(["pathlib", "Cargo.toml"]));
    });

    group.bench_function("parents", |b| {
        b.iter(|| black_box(&path).parents());
    });

    group.bench_function("relative_to", |b| {
        b.iter(|| black_box(&path).relative_to(black_box(&base)));
    });

    group.bench_function("relative_to_casefolded", |b| {
        b.iter(|| black_box(&windows).relative_to(black_box(&windows_base)));
    });

    group.bench_function("matches", |b| {
        b.iter(|| black_box(&path).matches(black_box("pathlib/*/*.rs")));
    });

    group.bench_function("with_suffix", |b| {
        b.iter(|| black_box(&path).with_suffix(".md"));
    });

    group.finish();
}

fn bench_clean(c: &mut Criterion) {
    let mut group = c.benchmark_group("clean");

    group.bench_function("resolve_components", |b| {
        b.iter(|| resolve_components(black_box(&["a", "b", "..", "c", ".", "d"]), true));
    });

    group.bench_function("clean_many_dots", |b| {
        let p = PurePath::posix(["/a/b/c/d/../../e/f/../g"]);
        b.iter(|| black_box(&p).clean());
    });

    group.finish();
}

fn bench_walk(c: &mut Criterion) {
    let mut group = c.benchmark_group("walk");

    let root = BoundPath::new(Arc::new(MemFs::new()), ["/bench"]);
    for d in 0..10 {
        let dir = root.join([format!("dir{d}")]);
        dir.mkdir_all(None).unwrap();
        for f in 0..20 {
            dir.join([format!("file{f}.txt")]).write_file(b"x").unwrap();
        }
    }

    group.bench_function("memfs_200_files", |b| {
        let walk = Walk::new(root.clone());
        b.iter(|| {
            let mut count = 0usize;
            walk.walk(|_, _| {
                count += 1;
                Ok(WalkControl::Continue)
            })
            .unwrap();
            black_box(count)
        });
    });

    group.finish();
}

criterion_group!(benches, bench_parse, bench_algebra, bench_clean, bench_walk);
criterion_main!(benches);
