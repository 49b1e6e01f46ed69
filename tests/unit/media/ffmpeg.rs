use super::*;

#[derive(Default)]
struct Events(Mutex<Vec<String>>);

impl DecoderListener for Events {
    fn on_prepared(&self) {
        self.0.lock().unwrap().push("prepared".into());
    }
    fn on_first_frame(&self) {
        self.0.lock().unwrap().push("first_frame".into());
    }
    fn on_completion(&self) {
        self.0.lock().unwrap().push("completion".into());
    }
    fn on_error(&self, code: i32, _extra: i32, _message: &str) {
        self.0.lock().unwrap().push(format!("error:{code}"));
    }
}

fn scratch_file(tag: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!(
        "alphaplay-ffmpeg-{tag}-{}.mp4",
        std::process::id()
    ));
    std::fs::write(&path, b"not really a video").unwrap();
    path
}

#[test]
fn missing_file_is_rejected_up_front() {
    let mut dec = FfmpegDecoder::new();
    let err = dec
        .set_source(Path::new("/definitely/not/here.mp4"))
        .unwrap_err();
    assert!(matches!(err, AlphaError::Validation(_)));
}

#[test]
fn lifecycle_calls_out_of_order_are_state_errors() {
    let mut dec = FfmpegDecoder::new();
    dec.set_listener(Arc::new(Events::default()));
    assert!(matches!(dec.prepare_async(), Err(AlphaError::State(_))));
    assert!(dec.video_dimensions().is_err());

    let path = scratch_file("order");
    dec.set_source(&path).unwrap();
    assert!(matches!(dec.start(), Err(AlphaError::State(_))));
    dec.release();
    let _ = std::fs::remove_file(&path);
}

#[test]
fn decoder_errors_keep_their_codes() {
    let (code, extra, message) = error_parts(&AlphaError::decoder(MEDIA_ERROR_IO, 7, "boom"));
    assert_eq!((code, extra, message.as_str()), (MEDIA_ERROR_IO, 7, "boom"));

    let (code, _, message) = error_parts(&AlphaError::state("odd"));
    assert_eq!(code, MEDIA_ERROR_UNKNOWN);
    assert!(message.contains("odd"));
}

#[cfg(not(feature = "media-ffmpeg"))]
#[test]
fn prepare_without_tools_reports_unsupported() {
    let events = Arc::new(Events::default());
    let mut dec = FfmpegDecoder::new();
    dec.set_listener(events.clone());
    let path = scratch_file("unsupported");
    dec.set_source(&path).unwrap();
    dec.prepare_async().unwrap();
    dec.reset().unwrap();

    let seen = events.0.lock().unwrap().clone();
    assert_eq!(
        seen,
        vec![format!("error:{}", crate::media::decoder::MEDIA_ERROR_UNSUPPORTED)]
    );
    let _ = std::fs::remove_file(&path);
}

#[test]
fn stream_fields_parse_into_durations() {
    assert_eq!(parse_seconds("4.000000"), Some(Duration::from_secs(4)));
    assert_eq!(parse_seconds("N/A"), None);
    assert_eq!(parse_seconds("0"), None);

    let pal = parse_frame_interval("25/1").unwrap();
    assert_eq!(pal.as_millis(), 40);
    let ntsc = parse_frame_interval("30000/1001").unwrap();
    assert!((ntsc.as_secs_f64() - 1001.0 / 30000.0).abs() < 1e-9);
    assert_eq!(parse_frame_interval("0/0"), None);
    assert_eq!(parse_frame_interval("30"), None);
}

#[test]
fn duration_is_unknown_before_prepare() {
    let dec = FfmpegDecoder::new();
    assert_eq!(dec.duration(), None);
    assert!(dec.video_dimensions().is_err());
}

#[cfg(unix)]
#[test]
fn reaper_kills_a_child_left_in_the_slot() {
    let shared = Shared::default();
    let child = std::process::Command::new("sleep")
        .arg("30")
        .spawn()
        .unwrap();
    *shared.child.lock().unwrap() = Some(child);

    // The worker stores its child and then sees `stopped`; leaving `play` must still reap it.
    shared.stopped.store(true, Ordering::Release);
    drop(ChildReaper(&shared));

    assert!(shared.child.lock().unwrap().is_none());
}
