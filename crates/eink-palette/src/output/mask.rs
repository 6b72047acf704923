//! Binary selection mask, one bit per pixel.

/// A per-pixel on/off selection with the dimensions of its source image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mask {
    bits: Vec<bool>,
    width: usize,
    height: usize,
}

impl Mask {
    pub fn new(bits: Vec<bool>, width: usize, height: usize) -> Self {
        debug_assert_eq!(bits.len(), width * height);
        Self {
            bits,
            width,
            height,
        }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Whether `(x, y)` is selected.
    #[inline]
    pub fn get(&self, x: usize, y: usize) -> bool {
        self.bits[y * self.width + x]
    }

    /// Row-major selection flags.
    #[inline]
    pub fn bits(&self) -> &[bool] {
        &self.bits
    }

    /// Number of selected pixels.
    pub fn count_on(&self) -> usize {
        self.bits.iter().filter(|&&b| b).count()
    }

    /// Pack into 1 bit per pixel, MSB first, each row padded to a whole byte.
    ///
    /// This is the raster layout of PBM `P4` and of most e-ink controller
    /// bitplanes.
    ///
    /// ```
    /// use eink_palette::Mask;
    ///
    /// let mask = Mask::new(vec![true, false, true, false, false, false, false, false, true], 9, 1);
    /// assert_eq!(mask.to_packed_bits(), vec![0b1010_0000, 0b1000_0000]);
    /// ```
    pub fn to_packed_bits(&self) -> Vec<u8> {
        let row_bytes = self.width.div_ceil(8);
        let mut packed = vec![0u8; row_bytes * self.height];

        for y in 0..self.height {
            for x in 0..self.width {
                if self.bits[y * self.width + x] {
                    packed[y * row_bytes + x / 8] |= 0x80 >> (x % 8);
                }
            }
        }

        packed
    }
}
