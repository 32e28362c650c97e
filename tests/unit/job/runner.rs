use super::*;
use crate::bitmap::io::save_png;
use serde_json::json;

fn job(value: serde_json::Value) -> Job {
    serde_json::from_value(value).unwrap()
}

fn checker() -> MemBitmap {
    MemBitmap::from_pixels(
        2,
        2,
        vec![
            Pixel::rgb(255, 0, 0),
            Pixel::rgb(0, 255, 0),
            Pixel::rgb(0, 0, 255),
            Pixel::WHITE,
        ],
    )
    .unwrap()
}

#[test]
fn renders_background_and_registered_source() {
    let j = job(json!({
        "canvas": {"width": 3, "height": 3},
        "background": "#102030",
        "ops": [{"op": "blit", "source": "chk", "x": 1, "y": 1}]
    }));
    let out = JobRunner::default()
        .with_source("chk", checker())
        .run(&j)
        .unwrap();
    assert_eq!(out.get(0, 0), Some(Pixel::rgb(0x10, 0x20, 0x30)));
    assert_eq!(out.get(1, 1), Some(Pixel::rgb(255, 0, 0)));
    assert_eq!(out.get(2, 2), Some(Pixel::WHITE));
}

#[test]
fn applies_ops_in_order() {
    let j = job(json!({
        "canvas": {"width": 2, "height": 1},
        "ops": [
            {"op": "clear", "color": [10, 20, 30, 40]},
            {"op": "clear_rect", "rect": [1, 0, 1, 1], "mask": "0x00FFFFFF", "or": "0xFF000000"},
            {"op": "color_key", "color": "#0a141e"}
        ]
    }));
    let out = JobRunner::default().run(&j).unwrap();
    assert_eq!(out.into_pixels(), vec![Pixel::rgba(10, 20, 30, 0); 2]);
}

#[test]
fn copy_replaces_canvas_extent() {
    let j = job(json!({
        "canvas": {"width": 8, "height": 8},
        "ops": [{"op": "copy", "source": "chk"}]
    }));
    let out = JobRunner::default()
        .with_source("chk", checker())
        .run(&j)
        .unwrap();
    assert_eq!(out, checker());
}

#[test]
fn scaled_blit_defaults_to_whole_source() {
    let j = job(json!({
        "canvas": {"width": 4, "height": 4},
        "ops": [{"op": "scaled_blit", "source": "chk", "dst_rect": [0, 0, 4, 4]}]
    }));
    let out = JobRunner::default()
        .with_source("chk", checker())
        .run(&j)
        .unwrap();
    assert_eq!(out.get(1, 1), Some(Pixel::rgb(255, 0, 0)));
    assert_eq!(out.get(3, 0), Some(Pixel::rgb(0, 255, 0)));
    assert_eq!(out.get(0, 3), Some(Pixel::rgb(0, 0, 255)));
}

#[test]
fn loads_sources_relative_to_root() {
    let root = std::env::temp_dir().join(format!("blitline-runner-{}", std::process::id()));
    save_png(&checker(), &root.join("img").join("chk.png")).unwrap();

    let j = job(json!({
        "canvas": {"width": 2, "height": 2},
        "sources": {"chk": "img/chk.png"},
        "ops": [{"op": "blit", "source": "chk"}]
    }));
    let out = JobRunner::new(&root).run(&j).unwrap();
    assert_eq!(out, checker());

    let missing = job(json!({
        "canvas": {"width": 2, "height": 2},
        "sources": {"chk": "img/nope.png"},
        "ops": [{"op": "blit", "source": "chk"}]
    }));
    let err = JobRunner::new(&root).run(&missing).unwrap_err();
    assert!(matches!(err, BlitError::Io(_)));
    let _ = std::fs::remove_dir_all(&root);
}

#[test]
fn invalid_job_is_rejected_before_rendering() {
    let j = job(json!({
        "canvas": {"width": 2, "height": 2},
        "ops": [{"op": "blit", "source": "ghost"}]
    }));
    let err = JobRunner::default().run(&j).unwrap_err();
    assert!(matches!(err, BlitError::Validation(_)));
}
