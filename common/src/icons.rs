//! 1-bit icon masks.
//!
//! Indicator squares carry a small bus pictogram tinted with the square's
//! icon color. Masks are stored MSB-first, one row after another, each row
//! padded to a whole byte. A built-in mask ships with the crate; hosts can
//! load a replacement at startup and pass it into each frame once ready.

use embedded_graphics::pixelcolor::Rgb888;
use embedded_graphics::prelude::*;

use crate::error::AssetError;

/// Built-in front view of a bus, `#` for set pixels.
const BUS_ART: [&str; 24] = [
    "........................",
    "....################....",
    "...##################...",
    "...##..............##...",
    "...##.############.##...",
    "...##.############.##...",
    "...##.############.##...",
    "...##.############.##...",
    "...##.############.##...",
    "...##.############.##...",
    "...##..............##...",
    "...##################...",
    "...##################...",
    "...#.###.......###..#...",
    "...#.###.......###..#...",
    "...##################...",
    "...##################...",
    "...##################...",
    "....################....",
    ".....###........###.....",
    ".....###........###.....",
    ".....###........###.....",
    "........................",
    "........................",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IconMask {
    width: u32,
    height: u32,
    bits: Vec<u8>,
}

impl IconMask {
    /// Bytes per row for a mask `width` pixels wide.
    const fn stride(width: u32) -> usize {
        width.div_ceil(8) as usize
    }

    /// Build a mask from raw MSB-first rows. The height is derived from the
    /// byte count, which must be a whole number of rows.
    pub fn from_raw(bytes: &[u8], width: u32) -> Result<Self, AssetError> {
        if width == 0 {
            return Err(AssetError::ZeroWidth);
        }
        let stride = Self::stride(width);
        if bytes.is_empty() || bytes.len() % stride != 0 {
            let rows = bytes.len() / stride;
            return Err(AssetError::InvalidLength {
                expected: (rows + 1) * stride,
                actual: bytes.len(),
            });
        }
        Ok(Self {
            width,
            height: (bytes.len() / stride) as u32,
            bits: bytes.to_vec(),
        })
    }

    /// Build a mask from ASCII art rows, `#` marking set pixels.
    fn from_art(rows: &[&str]) -> Self {
        let width = rows.iter().map(|row| row.len()).max().unwrap_or(0) as u32;
        let stride = Self::stride(width);
        let mut bits = vec![0u8; stride * rows.len()];
        for (y, row) in rows.iter().enumerate() {
            for (x, _) in row.bytes().enumerate().filter(|(_, b)| *b == b'#') {
                bits[y * stride + x / 8] |= 0x80 >> (x % 8);
            }
        }
        Self {
            width,
            height: rows.len() as u32,
            bits,
        }
    }

    /// The built-in bus pictogram.
    pub fn bus() -> Self {
        Self::from_art(&BUS_ART)
    }

    pub const fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    pub fn is_set(&self, x: u32, y: u32) -> bool {
        if x >= self.width || y >= self.height {
            return false;
        }
        let byte = self.bits[y as usize * Self::stride(self.width) + x as usize / 8];
        byte & (0x80 >> (x % 8)) != 0
    }

    /// Draw the mask scaled to `side` x `side` pixels at `top_left`,
    /// tinted with `color`. Unset pixels are left untouched.
    pub fn draw<D>(&self, target: &mut D, top_left: Point, side: u32, color: Rgb888)
    where
        D: DrawTarget<Color = Rgb888>,
    {
        if side == 0 || self.width == 0 || self.height == 0 {
            return;
        }
        let pixels = (0..side).flat_map(move |dy| {
            (0..side).filter_map(move |dx| {
                let sx = dx * self.width / side;
                let sy = dy * self.height / side;
                self.is_set(sx, sy)
                    .then(|| Pixel(top_left + Point::new(dx as i32, dy as i32), color))
            })
        });
        target.draw_iter(pixels).ok();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::colors::WHITE;
    use crate::testing::Canvas;

    #[test]
    fn test_bus_art_is_square() {
        assert!(BUS_ART.iter().all(|row| row.len() == 24), "every art row must be 24 wide");
        let bus = IconMask::bus();
        assert_eq!(bus.size(), Size::new(24, 24));
        assert!(bus.is_set(4, 1));
        assert!(!bus.is_set(0, 0));
    }

    #[test]
    fn test_from_raw_msb_first() {
        // 10px wide: two bytes per row.
        let mask = IconMask::from_raw(&[0b1000_0000, 0b0100_0000, 0x00, 0x00], 10).unwrap();
        assert_eq!(mask.size(), Size::new(10, 2));
        assert!(mask.is_set(0, 0));
        assert!(mask.is_set(9, 0));
        assert!(!mask.is_set(8, 0));
        assert!(!mask.is_set(0, 1));
    }

    #[test]
    fn test_from_raw_rejects_partial_row() {
        let err = IconMask::from_raw(&[0xff, 0xff, 0xff], 16).unwrap_err();
        assert!(matches!(err, AssetError::InvalidLength { expected: 4, actual: 3 }), "got {err}");
        assert!(matches!(IconMask::from_raw(&[], 8), Err(AssetError::InvalidLength { .. })));
        assert!(matches!(IconMask::from_raw(&[0xff], 0), Err(AssetError::ZeroWidth)));
    }

    #[test]
    fn test_draw_scales_mask() {
        let mask = IconMask::from_raw(&[0b1000_0000, 0b0000_0000], 2).unwrap();
        let mut canvas = Canvas::new(10, 10);
        mask.draw(&mut canvas, Point::new(2, 2), 4, WHITE);
        assert_eq!(canvas.count(WHITE), 4, "top-left pixel becomes a 2x2 block");
        assert_eq!(canvas.pixel(3, 3), Some(WHITE));
        assert_eq!(canvas.pixel(4, 4), Some(crate::colors::BLACK));
    }
}
