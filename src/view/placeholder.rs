//! Stand-in artwork for frames whose photo is missing or still loading.

use image::{Rgba, RgbaImage};

const CREAM: [u8; 3] = [0xf8, 0xf4, 0xef];

/// Deterministic "random" scale in [0, n) derived from the picture id
fn seeded(seed: u32, n: f32) -> f32 {
    (seed.wrapping_mul(9301).wrapping_add(49297) % 233_280) as f32 / 233_280.0 * n
}

fn blend(px: &mut Rgba<u8>, rgb: [u8; 3], alpha: f32) {
    for (c, &src) in px.0.iter_mut().take(3).zip(rgb.iter()) {
        *c = (*c as f32 * (1.0 - alpha) + src as f32 * alpha).round() as u8;
    }
}

fn shade(base: f32, spread: f32, seed: u32) -> u8 {
    (base + seeded(seed, spread)).min(255.0) as u8
}

/// Distance from `p` to the segment `a`-`b`
fn segment_distance(p: (f32, f32), a: (f32, f32), b: (f32, f32)) -> f32 {
    let (dx, dy) = (b.0 - a.0, b.1 - a.1);
    let len_sq = dx * dx + dy * dy;
    let t = if len_sq > 0.0 {
        (((p.0 - a.0) * dx + (p.1 - a.1) * dy) / len_sq).clamp(0.0, 1.0)
    } else {
        0.0
    };
    let (cx, cy) = (a.0 + t * dx, a.1 + t * dy);
    ((p.0 - cx).powi(2) + (p.1 - cy).powi(2)).sqrt()
}

/// Abstract composition (tinted wash, a disc, a block and a diagonal
/// stroke) seeded by the picture id.
pub fn abstract_art(seed: u32, accent: [u8; 3], width: u32, height: u32) -> RgbaImage {
    let (w, h) = (width as f32, height as f32);
    let r = |n: f32| seeded(seed, n);

    let tone = [shade(128.0, 60.0, seed); 3];
    let block = [shade(60.0, 60.0, seed), shade(60.0, 60.0, seed), shade(80.0, 60.0, seed)];
    let stroke = [shade(40.0, 40.0, seed); 3];

    let centre = (w * 0.3 + r(w * 0.4), h * 0.3 + r(h * 0.4));
    let radius = 20.0 + r(25.0);
    let block_min = (w * 0.4, h * 0.35);
    let block_max = (block_min.0 + 40.0 + r(25.0), block_min.1 + 35.0 + r(20.0));
    let line = ((15.0, h - 20.0), (w - 15.0, 25.0 + r(25.0)));

    RgbaImage::from_fn(width, height, |x, y| {
        let p = (x as f32 + 0.5, y as f32 + 0.5);
        let mut px = Rgba([CREAM[0], CREAM[1], CREAM[2], 0xff]);
        blend(&mut px, tone, 0.3);

        if (p.0 - centre.0).powi(2) + (p.1 - centre.1).powi(2) <= radius * radius {
            blend(&mut px, accent, 0.5);
        }
        if p.0 >= block_min.0 && p.0 < block_max.0 && p.1 >= block_min.1 && p.1 < block_max.1 {
            blend(&mut px, block, 0.2);
        }
        if segment_distance(p, line.0, line.1) <= 1.5 {
            blend(&mut px, stroke, 0.3);
        }
        px
    })
}

/// Cover-fit an image into a frame: fill it completely, keep the aspect
/// ratio and crop the overflow. Returns `(x, y, width, height)` of the draw.
pub fn cover_fit(image_w: f32, image_h: f32, x: f32, y: f32, frame_w: f32, frame_h: f32) -> (f32, f32, f32, f32) {
    if image_w <= 0.0 || image_h <= 0.0 {
        return (x, y, frame_w, frame_h);
    }
    let image_ratio = image_w / image_h;
    if image_ratio > frame_w / frame_h {
        let draw_w = frame_h * image_ratio;
        (x - (draw_w - frame_w) / 2.0, y, draw_w, frame_h)
    } else {
        let draw_h = frame_w / image_ratio;
        (x, y - (draw_h - frame_h) / 2.0, frame_w, draw_h)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn art_has_requested_size_and_is_opaque() {
        let img = abstract_art(3, [0xb8, 0xa8, 0xc9], 200, 150);
        assert_eq!(img.dimensions(), (200, 150));
        assert!(img.pixels().all(|p| p.0[3] == 0xff));
    }

    #[test]
    fn same_seed_same_art() {
        let a = abstract_art(5, [0xe8, 0xc4, 0xa8], 64, 48);
        let b = abstract_art(5, [0xe8, 0xc4, 0xa8], 64, 48);
        assert_eq!(a, b);
        let c = abstract_art(6, [0xe8, 0xc4, 0xa8], 64, 48);
        assert_ne!(a, c);
    }

    #[test]
    fn corners_show_the_wash_only() {
        let img = abstract_art(1, [255, 0, 0], 200, 150);
        let corner = img.get_pixel(199, 0);
        let mut expected = Rgba([CREAM[0], CREAM[1], CREAM[2], 0xff]);
        blend(&mut expected, [shade(128.0, 60.0, 1); 3], 0.3);
        assert_eq!(*corner, expected);
    }

    #[test]
    fn wide_images_crop_sides() {
        let (x, y, w, h) = cover_fit(400.0, 100.0, 10.0, 20.0, 200.0, 150.0);
        assert_eq!((y, h), (20.0, 150.0));
        assert_eq!(w, 600.0);
        assert_eq!(x, 10.0 - 200.0);
    }

    #[test]
    fn tall_images_crop_top_and_bottom() {
        let (x, y, w, h) = cover_fit(100.0, 400.0, 0.0, 0.0, 200.0, 150.0);
        assert_eq!((x, w), (0.0, 200.0));
        assert_eq!(h, 800.0);
        assert_eq!(y, -325.0);
    }
}
