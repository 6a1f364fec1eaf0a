//! Scanline-order reversal for row-major pixel grids.
//!
//! Each scanline is treated as an opaque run of `width * channels` bytes. Pixel values are
//! never inspected. A zero width, height or channel count is a no-op.

/// Copy `src` into `dst` with the rows in reverse order.
///
/// Destination row `y` receives source row `height - 1 - y`. Both slices must hold at least
/// `width * height * channels` bytes; bytes past that length are left alone.
///
/// # Panics
///
/// Panics if either slice is shorter than `width * height * channels`.
pub fn flip_vertical(dst: &mut [u8], src: &[u8], width: usize, height: usize, channels: usize) {
    let row_len = width * channels;
    if row_len == 0 || height == 0 {
        return;
    }
    let len = row_len * height;
    assert!(
        src.len() >= len && dst.len() >= len,
        "flip_vertical: buffers must hold {len} bytes (src {}, dst {})",
        src.len(),
        dst.len()
    );

    for (dst_row, src_row) in dst[..len]
        .chunks_exact_mut(row_len)
        .zip(src[..len].chunks_exact(row_len).rev())
    {
        dst_row.copy_from_slice(src_row);
    }
}

/// Reverse the row order of `image` in place.
///
/// Row `top` is swapped with row `height - 1 - top` for every `top < height / 2`; the middle
/// row of an odd-height grid stays where it is. Applying it twice restores the input.
///
/// # Panics
///
/// Panics if `image` is shorter than `width * height * channels`.
pub fn flip_vertical_inplace(image: &mut [u8], width: usize, height: usize, channels: usize) {
    let row_len = width * channels;
    if row_len == 0 || height < 2 {
        return;
    }
    let len = row_len * height;
    assert!(
        image.len() >= len,
        "flip_vertical_inplace: buffer must hold {len} bytes, got {}",
        image.len()
    );

    for top in 0..height / 2 {
        let bottom = height - 1 - top;
        let (head, tail) = image.split_at_mut(bottom * row_len);
        head[top * row_len..(top + 1) * row_len].swap_with_slice(&mut tail[..row_len]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn grid(width: usize, height: usize, channels: usize) -> Vec<u8> {
        #[allow(clippy::cast_possible_truncation)]
        (0..width * height * channels).map(|i| i as u8).collect()
    }

    #[test]
    fn test_out_of_place_even_height() {
        let src = vec![1, 1, 2, 2, 3, 3, 4, 4];
        let mut dst = vec![0; 8];
        flip_vertical(&mut dst, &src, 1, 4, 2);
        assert_eq!(dst, vec![4, 4, 3, 3, 2, 2, 1, 1]);
    }

    #[test]
    fn test_inplace_odd_height_keeps_middle_row() {
        let mut img = vec![10, 11, 20, 21, 30, 31];
        flip_vertical_inplace(&mut img, 2, 3, 1);
        assert_eq!(img, vec![30, 31, 20, 21, 10, 11]);
    }

    #[test]
    fn test_inplace_single_row_unchanged() {
        let mut img = vec![5, 6, 7];
        flip_vertical_inplace(&mut img, 1, 1, 3);
        assert_eq!(img, vec![5, 6, 7]);
    }

    #[test]
    fn test_degenerate_dimensions_are_noops() {
        let original = vec![9u8; 6];

        let mut img = original.clone();
        flip_vertical_inplace(&mut img, 0, 3, 2);
        flip_vertical_inplace(&mut img, 3, 0, 2);
        flip_vertical_inplace(&mut img, 3, 2, 0);
        assert_eq!(img, original);

        // Empty slices are fine as long as there is nothing to move.
        let mut empty: Vec<u8> = Vec::new();
        flip_vertical_inplace(&mut empty, 0, 100, 4);
        flip_vertical(&mut empty, &[], 100, 0, 4);
        assert!(empty.is_empty());
    }

    #[test]
    fn test_trailing_bytes_untouched() {
        let src = vec![1, 2, 0xAA];
        let mut dst = vec![0, 0, 0xBB];
        flip_vertical(&mut dst, &src, 1, 2, 1);
        assert_eq!(dst, vec![2, 1, 0xBB]);
    }

    #[test]
    #[should_panic(expected = "flip_vertical_inplace")]
    fn test_short_buffer_panics() {
        let mut img = vec![0u8; 5];
        flip_vertical_inplace(&mut img, 2, 3, 1);
    }

    proptest! {
        #[test]
        fn prop_inplace_twice_is_identity(w in 0usize..9, h in 0usize..9, c in 1usize..5) {
            let original = grid(w, h, c);
            let mut img = original.clone();
            flip_vertical_inplace(&mut img, w, h, c);
            flip_vertical_inplace(&mut img, w, h, c);
            prop_assert_eq!(img, original);
        }

        #[test]
        fn prop_out_of_place_twice_is_identity(w in 0usize..9, h in 0usize..9, c in 1usize..5) {
            let src = grid(w, h, c);
            let mut dst = vec![0; src.len()];
            let mut dst2 = vec![0; src.len()];
            flip_vertical(&mut dst, &src, w, h, c);
            flip_vertical(&mut dst2, &dst, w, h, c);
            prop_assert_eq!(dst2, src);
        }

        #[test]
        fn prop_inplace_matches_out_of_place(w in 1usize..9, h in 1usize..9, c in 1usize..5) {
            let src = grid(w, h, c);
            let mut dst = vec![0; src.len()];
            flip_vertical(&mut dst, &src, w, h, c);
            let mut img = src;
            flip_vertical_inplace(&mut img, w, h, c);
            prop_assert_eq!(img, dst);
        }
    }
}
