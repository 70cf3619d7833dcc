//! Cross-module behavior over the in-memory host: write/read round trips,
//! scoping, globbing and removal as a caller would drive them.

use originfs_fs::{ErrorKind, VirtualFs};
use originfs_host::memory::MemoryDirectory;

fn mounted() -> (MemoryDirectory, VirtualFs) {
    let host = MemoryDirectory::new();
    let fs = VirtualFs::mount(host.handle(), "/app").unwrap();
    (host, fs)
}

#[test]
fn store_then_load_round_trips() {
    let (_host, fs) = mounted();
    let payload = b"watchful little bytes".as_slice();

    let writer = fs.store("saves/slot1.sav").unwrap();
    let mut written = 0;
    while written < payload.len() {
        written += writer.write(&payload[written..]).unwrap();
    }
    writer.close().unwrap();

    let reader = fs.load("saves/slot1.sav").unwrap();
    assert_eq!(reader.size_at_open(), payload.len() as u64);
    let mut out = Vec::new();
    let mut buf = [0u8; 7];
    loop {
        let n = reader.read(&mut buf).unwrap();
        if n == 0 {
            break;
        }
        out.extend_from_slice(&buf[..n]);
    }
    assert_eq!(out, payload);

    // Exhausted readers keep reporting end-of-data, without error.
    assert_eq!(reader.read(&mut buf).unwrap(), 0);
    reader.close().unwrap();
}

#[test]
fn store_overwrites_from_offset_zero() {
    let (host, fs) = mounted();

    let writer = fs.store("f.bin").unwrap();
    writer.write(b"long original content").unwrap();
    writer.close().unwrap();

    let writer = fs.store("f.bin").unwrap();
    writer.write(b"short").unwrap();
    writer.close().unwrap();

    // The host resource is positional: rewriting from 0 leaves the tail.
    let app = host.put_dir("app");
    let content = app.file_content("f.bin").unwrap();
    assert!(content.starts_with(b"short"));

    // But a reader sees the size captured at its own open.
    let reader = fs.load("f.bin").unwrap();
    assert_eq!(reader.size_at_open(), content.len() as u64);
    reader.close().unwrap();
}

#[test]
fn sub_scopes_compose_and_stay_independent() {
    let (_host, fs) = mounted();

    let saves = fs.sub("saves", true).unwrap();
    let writer = saves.store("slot1.sav").unwrap();
    writer.write(b"s1").unwrap();
    writer.close().unwrap();

    // Visible through the parent under the joined path.
    assert!(fs.exist("saves/slot1.sav"));
    // The parent scope did not move.
    assert_eq!(fs.abs_root(), "/app");
    assert_eq!(saves.abs_root(), "/app/saves");

    // Absolute addressing inside the child scope follows its root.
    assert!(saves.exist("/app/saves/slot1.sav"));
    let err = saves.sub("/app/other", false).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::InvalidPath(_)));
}

#[test]
fn glob_spans_scopes_like_direct_paths() {
    let (_host, fs) = mounted();
    for name in ["d1/x.sav", "d1/d2/y.sav", "top.sav"] {
        let writer = fs.store(name).unwrap();
        writer.close().unwrap();
    }

    assert_eq!(fs.glob("*.sav").unwrap(), vec!["top.sav"]);
    assert_eq!(fs.glob("*/*.sav").unwrap(), vec!["d1/x.sav"]);

    // The same pattern run from a sub-scope is relative to it.
    let d1 = fs.sub("d1", false).unwrap();
    assert_eq!(d1.glob("*.sav").unwrap(), vec!["x.sav"]);
    assert_eq!(d1.glob("*/*.sav").unwrap(), vec!["d2/y.sav"]);
}

#[test]
fn remove_is_recursive_and_scoped() {
    let (_host, fs) = mounted();
    for name in ["keep.txt", "trash/a.txt", "trash/deep/b.txt"] {
        let writer = fs.store(name).unwrap();
        writer.close().unwrap();
    }

    fs.remove("trash").unwrap();
    assert!(!fs.exist_dir("trash"));
    assert!(!fs.exist("trash/a.txt"));
    assert!(fs.exist("keep.txt"));
}

#[test]
fn handles_are_usable_across_threads() {
    let (_host, fs) = mounted();
    let writer = fs.store("shared.bin").unwrap();

    // One writer, driven from several threads: the per-handle lock
    // serializes them and every byte lands.
    std::thread::scope(|scope| {
        for _ in 0..4 {
            scope.spawn(|| {
                for _ in 0..25 {
                    writer.write(b"x").unwrap();
                }
            });
        }
    });
    writer.close().unwrap();

    let reader = fs.load("shared.bin").unwrap();
    assert_eq!(reader.size_at_open(), 100);
    reader.close().unwrap();
}

#[test]
fn independent_scopes_do_not_interfere() {
    let (_host, fs) = mounted();
    let a = fs.sub("a", true).unwrap();
    let b = fs.sub("b", true).unwrap();

    std::thread::scope(|scope| {
        scope.spawn(|| {
            for i in 0..20 {
                let writer = a.store(&format!("f{i}")).unwrap();
                writer.write(b"a").unwrap();
                writer.close().unwrap();
            }
        });
        scope.spawn(|| {
            for i in 0..20 {
                let writer = b.store(&format!("f{i}")).unwrap();
                writer.write(b"b").unwrap();
                writer.close().unwrap();
            }
        });
    });

    assert_eq!(fs.glob("a/*").unwrap().len(), 20);
    assert_eq!(fs.glob("b/*").unwrap().len(), 20);
}
