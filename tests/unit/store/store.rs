use super::*;

fn temp_dir(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!(
        "marketclash_{name}_{}_{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    ))
}

fn solid(w: u32, h: u32, rgba: [u8; 4]) -> FrameRGBA {
    FrameRGBA {
        width: w,
        height: h,
        data: rgba.repeat((w * h) as usize),
        premultiplied: true,
    }
}

#[test]
fn file_names_are_zero_padded() {
    assert_eq!(frame_file_name(0), "frame_00000.png");
    assert_eq!(frame_file_name(1234), "frame_01234.png");
}

#[test]
fn create_makes_missing_directory() {
    let dir = temp_dir("store_create").join("nested");
    let store = FrameStore::create(&dir).unwrap();
    assert!(dir.is_dir());
    assert!(store.is_empty());
    std::fs::remove_dir_all(dir.parent().unwrap()).unwrap();
}

#[test]
fn persist_writes_sequential_files() {
    let dir = temp_dir("store_persist");
    let mut store = FrameStore::create(&dir).unwrap();
    for _ in 0..3 {
        store.persist(&solid(4, 2, [10, 20, 30, 255])).unwrap();
    }
    let names: Vec<String> = store
        .frames()
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(
        names,
        ["frame_00000.png", "frame_00001.png", "frame_00002.png"]
    );
    assert_eq!(store.written(), 3);

    let img = image::open(&store.frames()[1]).unwrap().to_rgba8();
    assert_eq!(img.dimensions(), (4, 2));
    assert_eq!(img.get_pixel(0, 0).0, [10, 20, 30, 255]);

    store.cleanup().unwrap();
    std::fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn persisted_frames_are_opaque() {
    let dir = temp_dir("store_opaque");
    let mut store = FrameStore::create(&dir).unwrap();
    let path = store.persist(&solid(2, 2, [64, 0, 0, 128])).unwrap();
    let img = image::open(&path).unwrap().to_rgba8();
    assert_eq!(img.get_pixel(1, 1).0, [64, 0, 0, 255]);
    store.cleanup().unwrap();
    std::fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn hold_last_repeats_path_without_writing() {
    let dir = temp_dir("store_hold");
    let mut store = FrameStore::create(&dir).unwrap();
    assert!(store.hold_last(3).is_err());

    store.persist(&solid(2, 2, [0, 0, 0, 255])).unwrap();
    let last = store.persist(&solid(2, 2, [255, 255, 255, 255])).unwrap();
    store.hold_last(3).unwrap();

    assert_eq!(store.len(), 5);
    assert_eq!(store.written(), 2);
    assert!(store.frames()[2..].iter().all(|p| *p == last));

    store.cleanup().unwrap();
    std::fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn cleanup_removes_only_frame_files() {
    let dir = temp_dir("store_cleanup");
    let mut store = FrameStore::create(&dir).unwrap();
    for _ in 0..4 {
        store.persist(&solid(2, 2, [1, 2, 3, 255])).unwrap();
    }
    store.hold_last(10).unwrap();
    std::fs::write(dir.join("keep.txt"), b"x").unwrap();

    assert_eq!(store.cleanup().unwrap(), 4);
    assert!(store.is_empty());
    let left: Vec<_> = std::fs::read_dir(&dir)
        .unwrap()
        .map(|e| e.unwrap().file_name())
        .collect();
    assert_eq!(left, [std::ffi::OsString::from("keep.txt")]);
    assert_eq!(store.cleanup().unwrap(), 0);

    std::fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn create_fails_under_a_file() {
    let dir = temp_dir("store_blocked");
    std::fs::create_dir_all(&dir).unwrap();
    let file = dir.join("occupied");
    std::fs::write(&file, b"x").unwrap();
    let err = FrameStore::create(file.join("frames")).unwrap_err();
    assert!(err.to_string().contains("frame directory"), "{err}");
    std::fs::remove_dir_all(&dir).unwrap();
}
