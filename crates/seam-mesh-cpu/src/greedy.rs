/// Greedy rectangle merge over a row-major `width x height` mask.
///
/// Scans rows top to bottom, left to right. From each unconsumed active cell it grows
/// right while the key matches, then down while the whole run matches, emits
/// `(x, y, w, h, key)` and marks the rectangle consumed. Every active cell ends up in
/// exactly one rectangle.
#[inline]
pub fn greedy_rects<K: Copy + Eq>(
    width: usize,
    height: usize,
    mask: &[Option<K>],
    mut emit: impl FnMut(usize, usize, usize, usize, K),
) {
    debug_assert_eq!(mask.len(), width * height);
    let mut used = vec![false; width * height];
    for y in 0..height {
        for x in 0..width {
            let idx = y * width + x;
            let Some(key) = mask[idx] else {
                continue;
            };
            if used[idx] {
                continue;
            }
            let code = Some(key);
            let mut w = 1;
            while x + w < width && mask[y * width + (x + w)] == code && !used[y * width + (x + w)] {
                w += 1;
            }
            let mut h = 1;
            'expand: while y + h < height {
                for i in 0..w {
                    let j = (y + h) * width + (x + i);
                    if mask[j] != code || used[j] {
                        break 'expand;
                    }
                }
                h += 1;
            }
            emit(x, y, w, h, key);
            for yy in 0..h {
                for xx in 0..w {
                    used[(y + yy) * width + (x + xx)] = true;
                }
            }
        }
    }
}
