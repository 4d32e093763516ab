//! Recolors fully transparent pixels with the average color of their
//! already-colored neighbors, growing outwards one ring at a time from the
//! visible region. Alpha is left untouched, so the image looks the same but
//! chat clients that rescale without premultiplying do not pull in black
//! fringes around the circular edge.

use std::collections::VecDeque;

use bit_vec::BitVec;
use image::{Rgba, RgbaImage};

const NEIGHBORS: [(i64, i64); 8] = [
    (1, 0),
    (1, 1),
    (0, 1),
    (-1, 1),
    (-1, 0),
    (-1, -1),
    (0, -1),
    (1, -1),
];

pub fn alpha_bleed(img: &mut RgbaImage) {
    let (w, h) = img.dimensions();
    let mut colored = PixelSet::new(w, h);
    let mut queued = PixelSet::new(w, h);
    let mut frontier = VecDeque::new();

    for (x, y, pixel) in img.enumerate_pixels() {
        if pixel[3] != 0 {
            colored.insert(x, y);
            queued.insert(x, y);
        }
    }

    for y in 0..h {
        for x in 0..w {
            if queued.contains(x, y) {
                continue;
            }
            if neighbors(w, h, x, y).any(|(nx, ny)| colored.contains(nx, ny)) {
                queued.insert(x, y);
                frontier.push_back((x, y));
            }
        }
    }

    while !frontier.is_empty() {
        let mut filled = Vec::with_capacity(frontier.len());

        for _ in 0..frontier.len() {
            let Some((x, y)) = frontier.pop_front() else {
                break;
            };

            let mut sum = [0u32; 3];
            let mut samples = 0u32;
            for (nx, ny) in neighbors(w, h, x, y) {
                if colored.contains(nx, ny) {
                    let source = img.get_pixel(nx, ny);
                    for (acc, channel) in sum.iter_mut().zip(source.0) {
                        *acc += channel as u32;
                    }
                    samples += 1;
                } else if !queued.contains(nx, ny) {
                    queued.insert(nx, ny);
                    frontier.push_back((nx, ny));
                }
            }

            let samples = samples.max(1);
            img.put_pixel(
                x,
                y,
                Rgba([
                    (sum[0] / samples) as u8,
                    (sum[1] / samples) as u8,
                    (sum[2] / samples) as u8,
                    0,
                ]),
            );
            filled.push((x, y));
        }

        // Newly filled pixels only become sources for the next ring.
        for (x, y) in filled {
            colored.insert(x, y);
        }
    }
}

fn neighbors(w: u32, h: u32, x: u32, y: u32) -> impl Iterator<Item = (u32, u32)> {
    NEIGHBORS.iter().filter_map(move |(dx, dy)| {
        let nx = x as i64 + dx;
        let ny = y as i64 + dy;
        (nx >= 0 && ny >= 0 && nx < w as i64 && ny < h as i64).then_some((nx as u32, ny as u32))
    })
}

struct PixelSet {
    width: u32,
    bits: BitVec,
}

impl PixelSet {
    fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            bits: BitVec::from_elem(width as usize * height as usize, false),
        }
    }

    fn contains(&self, x: u32, y: u32) -> bool {
        self.bits
            .get(y as usize * self.width as usize + x as usize)
            .unwrap_or(false)
    }

    fn insert(&mut self, x: u32, y: u32) {
        self.bits
            .set(y as usize * self.width as usize + x as usize, true);
    }
}
