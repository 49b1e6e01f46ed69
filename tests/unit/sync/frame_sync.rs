use std::sync::Arc;

use super::*;

#[test]
fn frame_pending_coalesces_repeated_signals() {
    let s = FrameSync::new();
    assert!(s.frame_available());
    assert!(!s.frame_available(), "second signal is not an edge");
    assert!(s.take_frame_pending());
    assert!(!s.take_frame_pending());
    assert!(!s.is_frame_pending());
}

#[test]
fn composite_flag_follows_first_frame_and_completion() {
    let s = FrameSync::new();
    assert!(!s.is_composite_enabled());
    assert!(s.first_frame());
    assert!(!s.first_frame());
    assert!(s.is_composite_enabled());
    assert!(s.completion());
    assert!(!s.completion());
    assert!(!s.is_composite_enabled());
}

#[test]
fn flags_are_independent() {
    let s = FrameSync::new();
    s.frame_available();
    s.first_frame();
    s.completion();
    assert!(s.is_frame_pending());
    assert!(s.take_frame_pending());
    assert!(!s.is_composite_enabled());
}

#[test]
fn teardown_revokes_compositing_first() {
    let s = FrameSync::new();
    s.first_frame();
    s.request_teardown();
    assert!(!s.is_composite_enabled());
    assert!(s.take_teardown());
    assert!(!s.take_teardown());
}

#[test]
fn discard_pending_forgets_stale_frames() {
    let s = FrameSync::new();
    s.frame_available();
    s.discard_pending();
    assert!(!s.take_frame_pending());
}

#[test]
fn concurrent_producers_yield_single_consumption() {
    let s = Arc::new(FrameSync::new());
    let handles: Vec<_> = (0..8)
        .map(|_| {
            let s = Arc::clone(&s);
            std::thread::spawn(move || {
                for _ in 0..1000 {
                    s.frame_available();
                }
            })
        })
        .collect();
    for h in handles {
        h.join().unwrap();
    }
    assert!(s.take_frame_pending());
    assert!(!s.take_frame_pending());
}
