/// Grid resolution of the Morton curve; 10 bits per axis, 30 bits per key.
const GRID: f32 = 1024.0;

/// Expands a 10-bit number by inserting two zero bits between each source
/// bit, using the multiply-mask cascade.
fn part1_by2(v: u32) -> u32 {
    let mut v = v & 0x0000_03ff;

    v = v.wrapping_mul(0x0001_0001) & 0xff00_00ff;
    v = v.wrapping_mul(0x0000_0101) & 0x0f00_f00f;
    v = v.wrapping_mul(0x0000_0011) & 0xc30c_30c3;
    v = v.wrapping_mul(0x0000_0005) & 0x4924_9249;

    v
}

/// Transforms a point of the unit cube into its 30-bit Morton key.
///
/// Each coordinate is quantized onto a 1024-wide grid and the grid cells are
/// bit-interleaved, low to high, as `z y x  z y x  ...`; the top two bits of
/// the key are always zero. Inputs outside `0.0 ..= 1.0` are clamped onto
/// the boundary cells.
pub fn morton3d(x: f32, y: f32, z: f32) -> u32 {
    let quantize = |v: f32| (v * GRID).clamp(0.0, GRID - 1.0) as u32;

    let xs = part1_by2(quantize(x));
    let ys = part1_by2(quantize(y));
    let zs = part1_by2(quantize(z));

    (xs << 2) | (ys << 1) | zs
}
