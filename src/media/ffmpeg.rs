//! Decoder backed by the `ffmpeg`/`ffprobe` executables.
//!
//! Dimensions, duration and frame rate come from `ffprobe`. Playback pipes
//! `ffmpeg -re ... -f rawvideo -pix_fmt rgba` on a worker thread and submits every packed
//! frame to a [`PixelSurface`], reporting each frame's position in the pass. Without the
//! `media-ffmpeg` feature every operation that needs the tools reports an error instead.

use std::{
    path::{Path, PathBuf},
    sync::{
        Arc, Mutex,
        atomic::{AtomicBool, Ordering},
    },
    thread::JoinHandle,
    time::{Duration, Instant},
};

use crate::{
    foundation::{
        core::PixelSize,
        error::{AlphaError, AlphaResult},
    },
    media::decoder::{
        DecoderListener, MEDIA_ERROR_IO, MEDIA_ERROR_MALFORMED, MEDIA_ERROR_UNKNOWN, MediaDecoder,
    },
    render::texture::{PixelSurface, VideoFrame},
};

#[derive(Default)]
struct Shared {
    paused: AtomicBool,
    stopped: AtomicBool,
    looping: AtomicBool,
    child: Mutex<Option<std::process::Child>>,
}

impl Shared {
    fn kill_child(&self) {
        if let Ok(mut slot) = self.child.lock() {
            if let Some(mut child) = slot.take() {
                let _ = child.kill();
                let _ = child.wait();
            }
        }
    }
}

/// Kills and reaps the current `ffmpeg` child however the worker leaves [`play`].
struct ChildReaper<'a>(&'a Shared);

impl Drop for ChildReaper<'_> {
    fn drop(&mut self) {
        self.0.kill_child();
    }
}

/// What `ffprobe` reports about the first video stream.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StreamInfo {
    pub size: PixelSize,
    pub duration: Option<Duration>,
    /// Time between frames, from the average frame rate.
    pub frame_interval: Option<Duration>,
}

#[derive(Default)]
pub struct FfmpegDecoder {
    listener: Option<Arc<dyn DecoderListener>>,
    surface: Option<PixelSurface>,
    source: Option<PathBuf>,
    info: Arc<Mutex<Option<StreamInfo>>>,
    shared: Arc<Shared>,
    prepare: Option<JoinHandle<()>>,
    worker: Option<JoinHandle<()>>,
}

impl FfmpegDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    fn listener(&self) -> AlphaResult<Arc<dyn DecoderListener>> {
        self.listener
            .clone()
            .ok_or_else(|| AlphaError::state("decoder has no listener"))
    }

    fn stream_info(&self) -> AlphaResult<StreamInfo> {
        self.info
            .lock()
            .map_err(|_| AlphaError::state("stream info lock poisoned"))?
            .ok_or_else(|| AlphaError::state("stream info unknown until prepared"))
    }

    fn join_prepare(&mut self) {
        if let Some(handle) = self.prepare.take() {
            let _ = handle.join();
        }
    }

    fn halt_worker(&mut self) {
        self.shared.stopped.store(true, Ordering::Release);
        self.shared.kill_child();
        if let Some(handle) = self.worker.take() {
            let _ = handle.join();
        }
    }
}

impl MediaDecoder for FfmpegDecoder {
    type Surface = PixelSurface;

    fn player_type(&self) -> &'static str {
        "FfmpegDecoder"
    }

    fn set_listener(&mut self, listener: Arc<dyn DecoderListener>) {
        self.listener = Some(listener);
    }

    fn set_surface(&mut self, surface: PixelSurface) {
        self.surface = Some(surface);
    }

    fn set_source(&mut self, locator: &Path) -> AlphaResult<()> {
        if !locator.is_file() {
            return Err(AlphaError::validation(format!(
                "media file '{}' does not exist",
                locator.display()
            )));
        }
        self.source = Some(locator.to_path_buf());
        Ok(())
    }

    fn prepare_async(&mut self) -> AlphaResult<()> {
        let source = self
            .source
            .clone()
            .ok_or_else(|| AlphaError::state("prepare_async called before set_source"))?;
        let listener = self.listener()?;
        let info = Arc::clone(&self.info);
        self.join_prepare();
        self.prepare = Some(std::thread::spawn(move || {
            match probe_stream(&source) {
                Ok(probed) => {
                    tracing::debug!(?probed, "probed stream");
                    if let Ok(mut slot) = info.lock() {
                        *slot = Some(probed);
                    }
                    listener.on_prepared();
                }
                Err(e) => {
                    let (code, extra, message) = error_parts(&e);
                    listener.on_error(code, extra, &message);
                }
            }
        }));
        Ok(())
    }

    fn start(&mut self) -> AlphaResult<()> {
        if self.worker.as_ref().is_some_and(|w| !w.is_finished()) {
            self.shared.paused.store(false, Ordering::Release);
            return Ok(());
        }
        self.join_prepare();
        let source = self
            .source
            .clone()
            .ok_or_else(|| AlphaError::state("start called before set_source"))?;
        let surface = self
            .surface
            .clone()
            .ok_or_else(|| AlphaError::state("start called before a surface was attached"))?;
        let info = self.stream_info()?;
        let listener = self.listener()?;

        self.shared.stopped.store(false, Ordering::Release);
        self.shared.paused.store(false, Ordering::Release);
        let shared = Arc::clone(&self.shared);
        self.worker = Some(std::thread::spawn(move || {
            if let Err(e) = play(&source, info, &surface, &shared, listener.as_ref()) {
                if !shared.stopped.load(Ordering::Acquire) {
                    let (code, extra, message) = error_parts(&e);
                    listener.on_error(code, extra, &message);
                }
            }
        }));
        Ok(())
    }

    fn pause(&mut self) -> AlphaResult<()> {
        self.shared.paused.store(true, Ordering::Release);
        Ok(())
    }

    fn stop(&mut self) -> AlphaResult<()> {
        self.halt_worker();
        Ok(())
    }

    fn reset(&mut self) -> AlphaResult<()> {
        self.halt_worker();
        self.join_prepare();
        self.source = None;
        if let Ok(mut slot) = self.info.lock() {
            *slot = None;
        }
        Ok(())
    }

    fn release(&mut self) {
        self.halt_worker();
        self.join_prepare();
        self.surface = None;
        self.listener = None;
    }

    fn set_looping(&mut self, looping: bool) {
        self.shared.looping.store(looping, Ordering::Release);
    }

    fn set_screen_on_while_playing(&mut self, on: bool) {
        tracing::debug!(on, "screen-on hint ignored by ffmpeg decoder");
    }

    fn video_dimensions(&self) -> AlphaResult<PixelSize> {
        self.stream_info().map(|info| info.size)
    }

    fn duration(&self) -> Option<Duration> {
        self.stream_info().ok().and_then(|info| info.duration)
    }
}

impl Drop for FfmpegDecoder {
    fn drop(&mut self) {
        self.halt_worker();
    }
}

/// Split an error into the `(code, extra, message)` triple decoder listeners receive.
fn error_parts(e: &AlphaError) -> (i32, i32, String) {
    match e {
        AlphaError::Decoder {
            code,
            extra,
            message,
        } => (*code, *extra, message.clone()),
        other => (MEDIA_ERROR_UNKNOWN, 0, other.to_string()),
    }
}

/// Worker body: stream frames until EOF (restarting when looping) or until stopped.
fn play(
    source: &Path,
    info: StreamInfo,
    surface: &PixelSurface,
    shared: &Shared,
    listener: &dyn DecoderListener,
) -> AlphaResult<()> {
    use std::io::Read as _;

    let _reaper = ChildReaper(shared);
    let size = info.size;
    let frame_len = size.rgba8_len();
    if frame_len == 0 {
        return Err(AlphaError::decoder(
            MEDIA_ERROR_MALFORMED,
            0,
            "decoded video frame size is zero",
        ));
    }
    let mut first_frame_sent = false;

    loop {
        let mut child = spawn_rawvideo(source)?;
        let mut stdout = child
            .stdout
            .take()
            .ok_or_else(|| AlphaError::decoder(MEDIA_ERROR_IO, 0, "ffmpeg stdout not captured"))?;
        match shared.child.lock() {
            Ok(mut slot) => *slot = Some(child),
            Err(_) => {
                let _ = child.kill();
                return Err(AlphaError::state("child process lock poisoned"));
            }
        }

        let mut buf = vec![0u8; frame_len];
        let pass_start = Instant::now();
        let mut frames: u32 = 0;
        loop {
            if shared.stopped.load(Ordering::Acquire) {
                return Ok(());
            }
            if shared.paused.load(Ordering::Acquire) {
                std::thread::sleep(std::time::Duration::from_millis(10));
                continue;
            }
            match stdout.read_exact(&mut buf) {
                Ok(()) => {}
                Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => break,
                Err(e) => {
                    return Err(AlphaError::decoder(
                        MEDIA_ERROR_IO,
                        0,
                        format!("read ffmpeg output: {e}"),
                    ));
                }
            }
            surface.submit(VideoFrame::new(size, buf.clone())?)?;
            if !first_frame_sent {
                first_frame_sent = true;
                listener.on_first_frame();
            }
            let position = info
                .frame_interval
                .map_or_else(|| pass_start.elapsed(), |i| i.saturating_mul(frames));
            listener.on_frame(position);
            frames = frames.saturating_add(1);
        }

        shared.kill_child();
        if shared.stopped.load(Ordering::Acquire) {
            return Ok(());
        }
        if !shared.looping.load(Ordering::Acquire) {
            listener.on_completion();
            return Ok(());
        }
        tracing::debug!(source = %source.display(), "looping playback");
    }
}

/// Parse an `ffprobe` seconds field such as `"4.040000"`.
#[cfg_attr(not(feature = "media-ffmpeg"), allow(dead_code))]
fn parse_seconds(raw: &str) -> Option<Duration> {
    let secs: f64 = raw.trim().parse().ok()?;
    (secs.is_finite() && secs > 0.0).then(|| Duration::from_secs_f64(secs))
}

/// Frame interval from an `ffprobe` rate such as `"30000/1001"`; `"0/0"` means unknown.
#[cfg_attr(not(feature = "media-ffmpeg"), allow(dead_code))]
fn parse_frame_interval(raw: &str) -> Option<Duration> {
    let (num, den) = raw.trim().split_once('/')?;
    let num: f64 = num.parse().ok()?;
    let den: f64 = den.parse().ok()?;
    (num > 0.0 && den > 0.0).then(|| Duration::from_secs_f64(den / num))
}

#[cfg(feature = "media-ffmpeg")]
pub fn probe_stream(source: &Path) -> AlphaResult<StreamInfo> {
    #[derive(serde::Deserialize)]
    struct ProbeStream {
        codec_type: Option<String>,
        width: Option<u32>,
        height: Option<u32>,
        duration: Option<String>,
        avg_frame_rate: Option<String>,
    }
    #[derive(serde::Deserialize)]
    struct ProbeOut {
        streams: Vec<ProbeStream>,
    }

    let out = std::process::Command::new("ffprobe")
        .args(["-v", "error", "-print_format", "json", "-show_streams"])
        .arg(source)
        .output()
        .map_err(|e| AlphaError::decoder(MEDIA_ERROR_IO, 0, format!("failed to run ffprobe: {e}")))?;
    if !out.status.success() {
        return Err(AlphaError::decoder(
            MEDIA_ERROR_MALFORMED,
            0,
            format!(
                "ffprobe failed for '{}': {}",
                source.display(),
                String::from_utf8_lossy(&out.stderr).trim()
            ),
        ));
    }

    let parsed: ProbeOut = serde_json::from_slice(&out.stdout).map_err(|e| {
        AlphaError::decoder(MEDIA_ERROR_MALFORMED, 0, format!("ffprobe json parse failed: {e}"))
    })?;
    let video = parsed
        .streams
        .iter()
        .find(|s| s.codec_type.as_deref() == Some("video"))
        .ok_or_else(|| AlphaError::decoder(MEDIA_ERROR_MALFORMED, 0, "no video stream found"))?;
    let size = match (video.width, video.height) {
        (Some(w), Some(h)) => PixelSize::non_empty(w, h)?,
        _ => {
            return Err(AlphaError::decoder(
                MEDIA_ERROR_MALFORMED,
                0,
                "missing video dimensions from ffprobe",
            ));
        }
    };
    Ok(StreamInfo {
        size,
        duration: video.duration.as_deref().and_then(parse_seconds),
        frame_interval: video.avg_frame_rate.as_deref().and_then(parse_frame_interval),
    })
}

#[cfg(not(feature = "media-ffmpeg"))]
pub fn probe_stream(_source: &Path) -> AlphaResult<StreamInfo> {
    Err(unsupported())
}

#[cfg(feature = "media-ffmpeg")]
fn spawn_rawvideo(source: &Path) -> AlphaResult<std::process::Child> {
    std::process::Command::new("ffmpeg")
        .args(["-v", "error", "-re", "-i"])
        .arg(source)
        .args(["-an", "-f", "rawvideo", "-pix_fmt", "rgba", "pipe:1"])
        .stdin(std::process::Stdio::null())
        .stdout(std::process::Stdio::piped())
        .stderr(std::process::Stdio::null())
        .spawn()
        .map_err(|e| AlphaError::decoder(MEDIA_ERROR_IO, 0, format!("failed to run ffmpeg: {e}")))
}

#[cfg(not(feature = "media-ffmpeg"))]
fn spawn_rawvideo(_source: &Path) -> AlphaResult<std::process::Child> {
    Err(unsupported())
}

#[cfg(not(feature = "media-ffmpeg"))]
fn unsupported() -> AlphaError {
    AlphaError::decoder(
        crate::media::decoder::MEDIA_ERROR_UNSUPPORTED,
        0,
        "ffmpeg playback requires the 'media-ffmpeg' feature",
    )
}

#[cfg(test)]
#[path = "../../tests/unit/media/ffmpeg.rs"]
mod tests;
