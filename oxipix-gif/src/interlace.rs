//! Row delivery order for GIF image data.

/// (first row, row step) for each of the four interlace passes.
const INTERLACE_PASSES: [(u32, u32); 4] = [(0, 8), (4, 8), (2, 4), (1, 2)];

const SEQUENTIAL: [(u32, u32); 1] = [(0, 1)];

/// Iterator over row numbers in the order they are stored in the stream.
///
/// Passes that start below the last row are skipped, so every row is
/// yielded exactly once for any height.
#[derive(Debug, Clone)]
pub struct RowOrder {
    height: u32,
    passes: &'static [(u32, u32)],
    pass: usize,
    row: u32,
}

impl RowOrder {
    /// Row order for an image of `height` rows.
    pub fn new(height: u32, interlaced: bool) -> Self {
        let passes: &'static [(u32, u32)] = if interlaced {
            &INTERLACE_PASSES
        } else {
            &SEQUENTIAL
        };
        Self {
            height,
            passes,
            pass: 0,
            row: 0,
        }
    }
}

impl Iterator for RowOrder {
    type Item = u32;

    fn next(&mut self) -> Option<u32> {
        loop {
            let &(_, step) = self.passes.get(self.pass)?;
            if self.row < self.height {
                let row = self.row;
                self.row += step;
                return Some(row);
            }
            self.pass += 1;
            let &(start, _) = self.passes.get(self.pass)?;
            self.row = start;
        }
    }
}
