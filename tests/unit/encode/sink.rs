use super::*;

fn frame() -> FrameRGBA {
    FrameRGBA {
        width: 2,
        height: 2,
        data: vec![0; 16],
        premultiplied: true,
    }
}

fn cfg() -> SinkConfig {
    SinkConfig {
        width: 2,
        height: 2,
        fps: Fps::new(60, 1).unwrap(),
    }
}

#[test]
fn captures_config_and_frames() {
    let mut sink = InMemorySink::new();
    sink.begin(cfg()).unwrap();
    sink.push_frame(FrameIndex(0), &frame()).unwrap();
    sink.push_frame(FrameIndex(1), &frame()).unwrap();
    sink.end().unwrap();

    assert_eq!(sink.config(), Some(cfg()));
    assert_eq!(sink.frames().len(), 2);
    assert!(sink.is_finished());
}

#[test]
fn rejects_push_before_begin() {
    let mut sink = InMemorySink::new();
    assert!(sink.push_frame(FrameIndex(0), &frame()).is_err());
}

#[test]
fn rejects_out_of_order_push() {
    let mut sink = InMemorySink::new();
    sink.begin(cfg()).unwrap();
    sink.push_frame(FrameIndex(3), &frame()).unwrap();
    assert!(sink.push_frame(FrameIndex(3), &frame()).is_err());
    assert!(sink.push_frame(FrameIndex(2), &frame()).is_err());
}

#[test]
fn begin_resets_previous_capture() {
    let mut sink = InMemorySink::new();
    sink.begin(cfg()).unwrap();
    sink.push_frame(FrameIndex(0), &frame()).unwrap();
    sink.end().unwrap();
    sink.begin(cfg()).unwrap();
    assert!(sink.frames().is_empty());
    assert!(!sink.is_finished());
}
