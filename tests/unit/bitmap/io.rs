use std::io::Cursor;

use super::*;
use crate::bitmap::frame::FrameBitmap;

fn png_bytes(img: image::RgbaImage) -> Vec<u8> {
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

#[test]
fn decode_keeps_straight_alpha() {
    let img = image::RgbaImage::from_raw(2, 1, vec![100, 50, 200, 128, 1, 2, 3, 4]).unwrap();
    let bm = decode_image(&png_bytes(img)).unwrap();
    assert_eq!(bm.get(0, 0), Some(Pixel::rgba(100, 50, 200, 128)));
    assert_eq!(bm.get(1, 0), Some(Pixel::rgba(1, 2, 3, 4)));
}

#[test]
fn decode_garbage_is_an_error() {
    assert!(decode_image(b"not an image").is_err());
}

#[test]
fn to_rgba_image_drops_row_padding() {
    let mut mem = vec![Pixel::rgb(9, 9, 9); 4 * 2];
    mem[0] = Pixel::rgba(1, 2, 3, 4);
    mem[4] = Pixel::rgba(5, 6, 7, 8);
    let fb = FrameBitmap::new(&mut mem, 2, 2, 4).unwrap();
    let img = to_rgba_image(&fb).unwrap();
    assert_eq!(img.dimensions(), (2, 2));
    assert_eq!(img.get_pixel(0, 0).0, [1, 2, 3, 4]);
    assert_eq!(img.get_pixel(0, 1).0, [5, 6, 7, 8]);
}

#[test]
fn save_and_load_png() {
    let dir = std::env::temp_dir().join(format!("blitline-io-{}", std::process::id()));
    let path = dir.join("nested").join("out.png");
    let bm = MemBitmap::filled(3, 2, Pixel::rgba(10, 20, 30, 40)).unwrap();
    save_png(&bm, &path).unwrap();
    let back = load_png(&path).unwrap();
    assert_eq!(back, bm);
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn save_unsized_bitmap_fails() {
    let path = std::env::temp_dir().join("blitline-never-written.png");
    assert!(save_png(&MemBitmap::empty(), &path).is_err());
}
