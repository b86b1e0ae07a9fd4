//! Thread-local buffer pools for reducing allocation overhead.
//!
//! Each tile render needs a grid buffer (1 byte/pixel) and sometimes an RGBA
//! pixel buffer (4 bytes/pixel). Instead of allocating fresh `Vec`s per
//! request, buffers are cached per worker thread and reused across renders.
//! Buffers are zeroed before reuse so a recycled grid never leaks counts from
//! the previous tile.

use std::cell::RefCell;

use trackmap_common::TILE_SIZE;

const GRID_BYTES: usize = (TILE_SIZE as usize) * (TILE_SIZE as usize);

// Thread-local overlap-grid buffer (1 byte per pixel)
thread_local! {
    static GRID_BUFFER: RefCell<Vec<u8>> = RefCell::new(Vec::with_capacity(GRID_BYTES));
}

// Thread-local pixel buffer (RGBA, 4 bytes per pixel)
thread_local! {
    static PIXEL_BUFFER: RefCell<Vec<u8>> = RefCell::new(Vec::with_capacity(GRID_BYTES * 4));
}

/// Take a zeroed grid buffer of `len` bytes, moving it out of the pool.
///
/// The pool slot is left with a fresh allocation-free `Vec`; whichever buffer
/// is returned here next (via a later `take`) reuses its capacity.
pub fn take_grid_buffer(len: usize) -> Vec<u8> {
    GRID_BUFFER.with(|buf| {
        let mut buf = buf.borrow_mut();
        buf.clear();
        buf.resize(len, 0);
        std::mem::replace(&mut *buf, Vec::with_capacity(len))
    })
}

/// Get a zeroed RGBA pixel buffer, fill it in the closure, and receive it as
/// an owned `Vec`.
pub fn take_pixel_buffer<F>(width: usize, height: usize, f: F) -> Vec<u8>
where
    F: FnOnce(&mut [u8]),
{
    PIXEL_BUFFER.with(|buf| {
        let mut buf = buf.borrow_mut();
        let size = width * height * 4;
        buf.clear();
        buf.resize(size, 0);

        f(&mut buf[..size]);

        std::mem::replace(&mut *buf, Vec::with_capacity(size))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_buffer_is_zeroed() {
        let mut grid = take_grid_buffer(64);
        grid.iter_mut().for_each(|b| *b = 0xff);

        let fresh = take_grid_buffer(64);
        assert!(fresh.iter().all(|&b| b == 0));
        assert_eq!(fresh.len(), 64);
    }

    #[test]
    fn test_pixel_buffer_exact_size() {
        let pixels = take_pixel_buffer(8, 4, |buf| {
            assert_eq!(buf.len(), 8 * 4 * 4);
            buf[0] = 42;
        });
        assert_eq!(pixels.len(), 8 * 4 * 4);
        assert_eq!(pixels[0], 42);
    }
}
