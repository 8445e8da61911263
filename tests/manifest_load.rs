use std::fs;
use std::path::{Path, PathBuf};

use home_stow::{Direction, Manifest, StowError};
use tempfile::tempdir;

fn write_config(dir: &Path, text: &str) -> PathBuf {
    let path = dir.join("stow.ini");
    fs::write(&path, text).unwrap();
    path
}

#[test]
fn loads_storages_in_dirs_order() {
    let td = tempdir().unwrap();
    let cfg = write_config(
        td.path(),
        "; media layout\n\
         [dirs]\n\
         photos = /mnt/photos\n\
         music = HOME/../music\n\
         \n\
         [music]\n\
         Music/\n\
         \n\
         [photos]\n\
         Pictures/\n\
         - Screenshots/\n",
    );
    let m = Manifest::load(&cfg, Path::new("/home/u")).unwrap();

    let ids: Vec<&str> = m.storages().iter().map(|s| s.id.as_str()).collect();
    assert_eq!(ids, ["photos", "music"]);
    assert_eq!(m.storages()[0].base_dir, PathBuf::from("/mnt/photos"));
    assert_eq!(m.storages()[1].base_dir, PathBuf::from("/home/u/../music"));

    let photos = &m.storages()[0].declarations;
    assert_eq!(photos.len(), 2);
    assert_eq!(photos[1].relative, "Screenshots");
    assert_eq!(photos[1].direction, Direction::Remove);
}

#[test]
fn missing_file_is_reported_as_such() {
    let td = tempdir().unwrap();
    let err = Manifest::load(&td.path().join("absent.ini"), Path::new("/home/u")).unwrap_err();
    assert!(matches!(err, StowError::ConfigNotFound(_)));
    assert_eq!(err.code(), "config_not_found");
}

#[test]
fn parse_errors_name_the_config() {
    let td = tempdir().unwrap();
    let cfg = write_config(td.path(), "[dirs]\nphotos = /mnt/photos\n[photos\n");
    let err = Manifest::load(&cfg, Path::new("/home/u")).unwrap_err();
    assert!(matches!(err, StowError::ConfigParse { .. }), "{err:?}");
    assert_eq!(err.code(), "config_parse");
    assert!(err.to_string().contains("stow.ini"));
}

#[test]
fn dirs_section_is_required() {
    let td = tempdir().unwrap();
    let cfg = write_config(td.path(), "[photos]\nPictures/\n");
    let err = Manifest::load(&cfg, Path::new("/home/u")).unwrap_err();
    assert!(matches!(err, StowError::MissingDirs));
}

#[test]
fn relative_base_is_rejected() {
    let td = tempdir().unwrap();
    let cfg = write_config(td.path(), "[dirs]\nphotos = mnt/photos\n");
    let err = Manifest::load(&cfg, Path::new("/home/u")).unwrap_err();
    assert!(matches!(err, StowError::InvalidBase { ref storage, .. } if storage == "photos"));
}

#[test]
fn escaping_home_is_set_aside() {
    let td = tempdir().unwrap();
    let cfg = write_config(td.path(), "[dirs]\ns = /mnt/s\n[s]\n../etc/passwd\nMusic/\n");
    let m = Manifest::load(&cfg, Path::new("/home/u")).unwrap();
    let s = &m.storages()[0];
    assert_eq!(s.declarations.len(), 1);
    assert_eq!(s.rejected[0].raw, "../etc/passwd");
}
