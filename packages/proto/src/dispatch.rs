//! Request execution against a mounted filesystem.

use tracing::debug;

use originfs_fs::{path, VirtualFs};

use crate::{Request, Response};

/// Execute one request against `fs`, folding any failure into
/// [`Response::Error`].
pub fn dispatch(fs: &VirtualFs, request: Request) -> Response {
    debug!(?request, "dispatch");
    match request {
        Request::ReadFile { path } => read_file(fs, &path),
        Request::WriteFile { path, data } => write_file(fs, &path, &data),
        Request::Exists { path } => Response::Bool {
            value: fs.exist(&path),
        },
        Request::ExistsDir { path } => Response::Bool {
            value: fs.exist_dir(&path),
        },
        Request::Glob { pattern } => match fs.glob(&pattern) {
            Ok(paths) => Response::Paths { paths },
            Err(err) => err.into(),
        },
        Request::Remove { path } => match fs.remove(&path) {
            Ok(()) => Response::Ok,
            Err(err) => err.into(),
        },
        Request::Validate { dir, config } => Response::Bool {
            value: fs.exist_dir(&dir) && fs.exist(&path::join(&dir, &config)),
        },
    }
}

fn read_file(fs: &VirtualFs, fpath: &str) -> Response {
    let reader = match fs.load(fpath) {
        Ok(reader) => reader,
        Err(err) => return err.into(),
    };

    let mut data = Vec::with_capacity(reader.size_at_open() as usize);
    let mut buf = [0u8; 8192];
    let drained = loop {
        match reader.read(&mut buf) {
            Ok(0) => break Ok(()),
            Ok(n) => data.extend_from_slice(&buf[..n]),
            Err(err) => break Err(err),
        }
    };
    // The handle is closed whether or not the drain succeeded.
    let closed = reader.close();

    match drained.and(closed) {
        Ok(()) => Response::Data { data },
        Err(err) => err.into(),
    }
}

fn write_file(fs: &VirtualFs, fpath: &str, data: &[u8]) -> Response {
    let writer = match fs.store(fpath) {
        Ok(writer) => writer,
        Err(err) => return err.into(),
    };

    let mut written = 0;
    let stored = loop {
        if written >= data.len() {
            break Ok(());
        }
        match writer.write(&data[written..]) {
            Ok(n) => written += n,
            Err(err) => break Err(err),
        }
    };
    let closed = writer.close();

    match stored.and(closed) {
        Ok(()) => Response::Ok,
        Err(err) => err.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use originfs_host::memory::MemoryDirectory;

    fn mounted() -> VirtualFs {
        VirtualFs::mount(MemoryDirectory::new().handle(), "/app").unwrap()
    }

    fn write(fs: &VirtualFs, path: &str, data: &[u8]) {
        let response = dispatch(
            fs,
            Request::WriteFile {
                path: path.to_string(),
                data: data.to_vec(),
            },
        );
        assert_eq!(response, Response::Ok);
    }

    #[test]
    fn write_then_read_round_trips() {
        let fs = mounted();
        write(&fs, "saves/slot1.sav", b"payload");

        let response = dispatch(
            &fs,
            Request::ReadFile {
                path: "saves/slot1.sav".to_string(),
            },
        );
        assert_eq!(
            response,
            Response::Data {
                data: b"payload".to_vec()
            }
        );
    }

    #[test]
    fn read_missing_reports_scoped_error() {
        let fs = mounted();
        let response = dispatch(
            &fs,
            Request::ReadFile {
                path: "missing.sav".to_string(),
            },
        );
        match response {
            Response::Error { op, path, message } => {
                assert_eq!(op, "open-read");
                assert_eq!(path, "missing.sav");
                assert!(message.contains("not found"));
            }
            other => panic!("expected error response, got {other:?}"),
        }
    }

    #[test]
    fn exists_variants() {
        let fs = mounted();
        write(&fs, "d/f.txt", b"x");

        assert_eq!(
            dispatch(
                &fs,
                Request::Exists {
                    path: "d/f.txt".to_string()
                }
            ),
            Response::Bool { value: true }
        );
        assert_eq!(
            dispatch(
                &fs,
                Request::Exists {
                    path: "d".to_string()
                }
            ),
            Response::Bool { value: false }
        );
        assert_eq!(
            dispatch(
                &fs,
                Request::ExistsDir {
                    path: "d".to_string()
                }
            ),
            Response::Bool { value: true }
        );
    }

    #[test]
    fn glob_and_remove() {
        let fs = mounted();
        write(&fs, "a.txt", b"");
        write(&fs, "b.log", b"");

        assert_eq!(
            dispatch(
                &fs,
                Request::Glob {
                    pattern: "*.txt".to_string()
                }
            ),
            Response::Paths {
                paths: vec!["a.txt".to_string()]
            }
        );

        assert_eq!(
            dispatch(
                &fs,
                Request::Remove {
                    path: "a.txt".to_string()
                }
            ),
            Response::Ok
        );
        assert_eq!(
            dispatch(
                &fs,
                Request::Exists {
                    path: "a.txt".to_string()
                }
            ),
            Response::Bool { value: false }
        );
    }

    #[test]
    fn validate_checks_dir_and_config_together() {
        let fs = mounted();
        write(&fs, "pkg/app.config", b"{}");

        let valid = dispatch(
            &fs,
            Request::Validate {
                dir: "pkg".to_string(),
                config: "app.config".to_string(),
            },
        );
        assert_eq!(valid, Response::Bool { value: true });

        let invalid = dispatch(
            &fs,
            Request::Validate {
                dir: "pkg".to_string(),
                config: "other.config".to_string(),
            },
        );
        assert_eq!(invalid, Response::Bool { value: false });

        let no_dir = dispatch(
            &fs,
            Request::Validate {
                dir: "absent".to_string(),
                config: "app.config".to_string(),
            },
        );
        assert_eq!(no_dir, Response::Bool { value: false });
    }
}
