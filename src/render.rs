//! Per-pixel evaluation of an expression tree into an RGBA8 frame buffer.

use crate::expr::Expr;

/// Map a pixel index into the [-1, 1) domain, symmetric about the image
/// center. Kept in this exact affine form; the evaluation order fixes the
/// float rounding and with it the generator's long-standing look.
pub fn to_domain(i: u32, extent: u32) -> f32 {
    let i = i as f32;
    let extent = extent as f32;
    -1.0 + 2.0 * (1.0 + (i - extent) / extent)
}

/// Quantize one channel to a byte: affine map to [0, 255], round, clamp.
/// Channel outputs are not hard-bounded upstream, so the clamp keeps
/// out-of-range values from wrapping.
pub fn quantize(c: f32) -> u8 {
    (c * 127.5 + 127.5).round().clamp(0.0, 255.0) as u8
}

/// Evaluate `tree` at every pixel and write the result into `frame`,
/// row-major RGBA with opaque alpha. The buffer is exactly
/// width * height * 4 bytes long.
pub fn render_into(tree: &Expr, width: u32, height: u32, frame: &mut [u8]) {
    debug_assert_eq!(frame.len(), (width as usize) * (height as usize) * 4);
    for py in 0..height {
        let v = to_domain(py, height);
        for px in 0..width {
            let u = to_domain(px, width);
            let rgb = tree.eval(u, v);
            let idx = ((py as usize) * (width as usize) + px as usize) * 4;
            frame[idx] = quantize(rgb[0]);
            frame[idx + 1] = quantize(rgb[1]);
            frame[idx + 2] = quantize(rgb[2]);
            frame[idx + 3] = 255;
        }
    }
}

/// Allocate a frame buffer and render `tree` into it.
pub fn render(tree: &Expr, width: u32, height: u32) -> Vec<u8> {
    let mut frame = vec![0u8; (width as usize) * (height as usize) * 4];
    render_into(tree, width, height, &mut frame);
    frame
}
