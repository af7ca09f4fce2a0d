/// Braille Unicode canvas for high-resolution terminal graphics.
/// Each character cell holds a 2x4 dot grid; patterns live at U+2800..U+28FF.
#[derive(Clone)]
pub struct BrailleCanvas {
    width: usize,  // Characters
    height: usize, // Characters
    cells: Vec<u8>,
}

/// Dot bit for (x % 2, y % 4):
/// ```text
/// (0,0) (1,0)   bits: 0x01 0x08
/// (0,1) (1,1)   bits: 0x02 0x10
/// (0,2) (1,2)   bits: 0x04 0x20
/// (0,3) (1,3)   bits: 0x40 0x80
/// ```
const DOT_BITS: [[u8; 4]; 2] = [[0x01, 0x02, 0x04, 0x40], [0x08, 0x10, 0x20, 0x80]];

impl BrailleCanvas {
    /// Canvas of `width` x `height` characters, i.e. width*2 x height*4 dots.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![0; width * height],
        }
    }

    pub fn set_pixel(&mut self, x: usize, y: usize) {
        let (cx, cy) = (x / 2, y / 4);
        if cx >= self.width || cy >= self.height {
            return;
        }
        self.cells[cy * self.width + cx] |= DOT_BITS[x % 2][y % 4];
    }

    /// Signed variant; anything off the canvas is dropped.
    #[inline]
    pub fn set_pixel_signed(&mut self, x: i32, y: i32) {
        if x >= 0 && y >= 0 {
            self.set_pixel(x as usize, y as usize);
        }
    }

    pub fn is_set(&self, x: usize, y: usize) -> bool {
        let (cx, cy) = (x / 2, y / 4);
        cx < self.width && cy < self.height && self.cells[cy * self.width + cx] & DOT_BITS[x % 2][y % 4] != 0
    }

    /// Number of raised dots
    pub fn dot_count(&self) -> usize {
        self.cells.iter().map(|c| c.count_ones() as usize).sum()
    }

    /// Braille character of a cell, `None` when the cell is blank or out of range.
    pub fn cell(&self, col: usize, row: usize) -> Option<char> {
        if col >= self.width || row >= self.height {
            return None;
        }
        match self.cells[row * self.width + col] {
            0 => None,
            bits => char::from_u32(0x2800 + bits as u32),
        }
    }

    #[cfg(test)]
    pub fn to_string(&self) -> String {
        (0..self.height)
            .map(|row| {
                (0..self.width)
                    .map(|col| self.cell(col, row).unwrap_or('\u{2800}'))
                    .collect::<String>()
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}
