use crate::{
    birderr,
    result::{trace_ok_err, BirdResult},
};
use lazy_static::lazy_static;
use std::{
    ffi::OsStr,
    fmt::Debug,
    io,
    path::{Path, PathBuf},
};
use tracing::info;

lazy_static! {
    pub static ref DEFAULT_TMPDIR: PathBuf = std::env::temp_dir().join("birdpoly");
}
lazy_static! {
    pub static ref DEFAULT_HOMEDIR: PathBuf = match dirs::home_dir() {
        Some(p) => p.join(".birdpoly"),
        _ => std::env::temp_dir().join("birdpoly"),
    };
}

pub fn osstr_to_str(p: Option<&OsStr>) -> io::Result<&str> {
    p.ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, format!("{p:?} not found")))?
        .to_str()
        .ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidData,
                format!("{p:?} not convertible to unicode"),
            )
        })
}

/// The last component of a path, i.e., the key of an image in the annotation store.
pub fn filename(p: &Path) -> BirdResult<&str> {
    osstr_to_str(p.file_name())
        .map_err(|e| birderr!("could not extract the filename of {:?} due to {:?}", p, e))
}

pub struct Defer<F: FnMut()> {
    pub func: F,
}
impl<F: FnMut()> Drop for Defer<F> {
    fn drop(&mut self) {
        (self.func)();
    }
}
#[macro_export]
macro_rules! defer {
    ($f:expr) => {
        let _dfr = $crate::file_util::Defer { func: $f };
    };
}
pub fn checked_remove<'a, P: AsRef<Path> + Debug>(
    path: &'a P,
    func: fn(p: &'a P) -> io::Result<()>,
) {
    if trace_ok_err(func(path)).is_some() {
        info!("removed {path:?}");
    }
}
#[macro_export]
macro_rules! defer_folder_removal {
    ($path:expr) => {
        let func = || $crate::file_util::checked_remove($path, std::fs::remove_dir_all);
        $crate::defer!(func);
    };
}
#[macro_export]
macro_rules! defer_file_removal {
    ($path:expr) => {
        let func = || $crate::file_util::checked_remove($path, std::fs::remove_file);
        $crate::defer!(func);
    };
}

#[test]
fn test_filename() {
    assert_eq!(
        filename(Path::new("some/folder/AMAV123_foo.jpg")).unwrap(),
        "AMAV123_foo.jpg"
    );
    assert_eq!(filename(Path::new("BF045_x.jpg")).unwrap(), "BF045_x.jpg");
    assert!(filename(Path::new("/")).is_err());
    assert!(filename(Path::new("..")).is_err());
}

#[test]
fn test_defer() {
    let tmp_folder = DEFAULT_TMPDIR.join("defertest");
    std::fs::create_dir_all(&tmp_folder).unwrap();
    {
        defer_folder_removal!(&tmp_folder);
        let tmp_file = tmp_folder.join("some.txt");
        std::fs::write(&tmp_file, "bird").unwrap();
        {
            defer_file_removal!(&tmp_file);
        }
        assert!(!tmp_file.exists());
    }
    assert!(!tmp_folder.exists());
}
