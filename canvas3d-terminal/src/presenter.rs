/// Truecolor presenter that shows an RGBA frame in terminal cells
use crossterm::{
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    QueueableCommand,
};
use std::io::Write;

use canvas3d_core::PixelBuffer;

/// Upper half block: foreground paints the top half of a cell, background
/// the bottom half.
const HALF_BLOCK: char = '▀';

/// Colors of one terminal cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub top: [u8; 3],
    pub bottom: [u8; 3],
}

/// Scales a frame buffer onto a grid of terminal cells, two pixel rows per
/// cell.
pub struct TerminalPresenter {
    columns: usize,
    rows: usize,
    cells: Vec<Cell>,
}

impl TerminalPresenter {
    pub fn new(columns: usize, rows: usize) -> Self {
        let blank = Cell {
            top: [0, 0, 0],
            bottom: [0, 0, 0],
        };
        Self {
            columns,
            rows,
            cells: vec![blank; columns * rows],
        }
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cell(&self, column: usize, row: usize) -> Option<Cell> {
        if column >= self.columns || row >= self.rows {
            return None;
        }
        self.cells.get(row * self.columns + column).copied()
    }

    /// Nearest-neighbour sample `frame` into the cell grid.
    pub fn sample(&mut self, frame: &PixelBuffer) {
        let (width, height) = (frame.width(), frame.height());
        let pixel_rows = self.rows * 2;
        if width == 0 || height == 0 {
            return;
        }

        for row in 0..self.rows {
            let top_row = (row * 2) * height / pixel_rows;
            let bottom_row = (row * 2 + 1) * height / pixel_rows;
            for column in 0..self.columns {
                let x = column * width / self.columns;
                self.cells[row * self.columns + column] = Cell {
                    top: rgb(frame, x, top_row),
                    bottom: rgb(frame, x, bottom_row),
                };
            }
        }
    }

    /// Queue the cell grid on `writer`, starting at the cursor position.
    pub fn draw<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        for row in 0..self.rows {
            let mut last: Option<Cell> = None;
            for cell in &self.cells[row * self.columns..(row + 1) * self.columns] {
                // Only emit color changes between neighbouring cells
                if last != Some(*cell) {
                    writer.queue(SetForegroundColor(color(cell.top)))?;
                    writer.queue(SetBackgroundColor(color(cell.bottom)))?;
                    last = Some(*cell);
                }
                writer.queue(Print(HALF_BLOCK))?;
            }
            writer.queue(ResetColor)?;
            if row + 1 < self.rows {
                writer.queue(Print("\r\n"))?;
            }
        }
        Ok(())
    }
}

fn rgb(frame: &PixelBuffer, x: usize, row: usize) -> [u8; 3] {
    frame
        .rgba_at_row(x, row)
        .map(|[r, g, b, _]| [r, g, b])
        .unwrap_or([0, 0, 0])
}

fn color([r, g, b]: [u8; 3]) -> Color {
    Color::Rgb { r, g, b }
}
