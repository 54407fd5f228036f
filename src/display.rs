//! The 64x32 monochrome framebuffer.

pub const DISPLAY_WIDTH_PIXELS: usize = 64;
pub const DISPLAY_HEIGHT_PIXELS: usize = 32;
pub const BYTES_PER_SCANLINE: usize = DISPLAY_WIDTH_PIXELS / 8;
pub const DISPLAY_BUFFER_SIZE: usize = BYTES_PER_SCANLINE * DISPLAY_HEIGHT_PIXELS;

/// Sprites are always a byte wide.
pub const SPRITE_WIDTH_PIXELS: usize = 8;

/// Pixel storage plus the redraw flag the host polls before repainting.
#[derive(Clone, PartialEq, Eq)]
pub struct Display {
    pixels: [[bool; DISPLAY_WIDTH_PIXELS]; DISPLAY_HEIGHT_PIXELS],
    redraw: bool,
}

impl Display {
    pub fn new() -> Self {
        Self {
            pixels: [[false; DISPLAY_WIDTH_PIXELS]; DISPLAY_HEIGHT_PIXELS],
            redraw: false,
        }
    }

    pub fn pixel(&self, x: usize, y: usize) -> bool {
        self.pixels[y][x]
    }

    /// Turn every pixel off and raise the redraw flag.
    pub fn clear(&mut self) {
        self.pixels = [[false; DISPLAY_WIDTH_PIXELS]; DISPLAY_HEIGHT_PIXELS];
        self.redraw = true;
    }

    /// XOR a sprite onto the screen with its top left corner at `(x, y)`.
    ///
    /// With `wrap` set every pixel coordinate is taken modulo the screen
    /// size. Otherwise any pixel that lands off the grid is dropped.
    ///
    /// Returns `true` if any lit pixel was turned off.
    pub fn draw_sprite(&mut self, x: u8, y: u8, rows: &[u8], wrap: bool) -> bool {
        let (origin_x, origin_y) = if wrap {
            (x as usize % DISPLAY_WIDTH_PIXELS, y as usize % DISPLAY_HEIGHT_PIXELS)
        } else {
            (x as usize, y as usize)
        };
        let mut collision = false;

        for (row, bits) in rows.iter().enumerate() {
            let mut py = origin_y + row;
            if py >= DISPLAY_HEIGHT_PIXELS {
                if !wrap {
                    break;
                }
                py %= DISPLAY_HEIGHT_PIXELS;
            }

            for col in 0..SPRITE_WIDTH_PIXELS {
                if bits & (0x80 >> col) == 0 {
                    continue;
                }
                let mut px = origin_x + col;
                if px >= DISPLAY_WIDTH_PIXELS {
                    if !wrap {
                        break;
                    }
                    px %= DISPLAY_WIDTH_PIXELS;
                }

                let pixel = &mut self.pixels[py][px];
                collision |= *pixel;
                *pixel ^= true;
            }
        }

        self.redraw = true;
        collision
    }

    pub fn needs_redraw(&self) -> bool {
        self.redraw
    }

    /// Force the host to repaint on its next poll, e.g. after a state restore.
    pub fn request_redraw(&mut self) {
        self.redraw = true;
    }

    /// Clear the redraw flag, returning whether it was set.
    pub fn take_redraw(&mut self) -> bool {
        std::mem::replace(&mut self.redraw, false)
    }

    /// The framebuffer packed 8 pixels per byte, row-major, with the most
    /// significant bit as the leftmost pixel.
    pub fn to_packed(&self) -> [u8; DISPLAY_BUFFER_SIZE] {
        let mut buffer = [0u8; DISPLAY_BUFFER_SIZE];
        for (y, row) in self.pixels.iter().enumerate() {
            for (x, _) in row.iter().enumerate().filter(|(_, lit)| **lit) {
                buffer[y * BYTES_PER_SCANLINE + x / 8] |= 0x80 >> (x % 8);
            }
        }
        buffer
    }

    /// Inverse of [`Display::to_packed`]. Leaves the redraw flag clear.
    pub fn from_packed(buffer: &[u8; DISPLAY_BUFFER_SIZE]) -> Self {
        let mut display = Self::new();
        for (y, row) in display.pixels.iter_mut().enumerate() {
            for (x, pixel) in row.iter_mut().enumerate() {
                *pixel = buffer[y * BYTES_PER_SCANLINE + x / 8] & (0x80 >> (x % 8)) != 0;
            }
        }
        display
    }
}

impl Default for Display {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Display {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let lit = self.pixels.iter().flatten().filter(|p| **p).count();
        write!(f, "Display {{ lit: {}, redraw: {} }}", lit, self.redraw)
    }
}
