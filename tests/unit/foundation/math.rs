use super::*;

#[test]
fn mul_div255_rounds() {
    assert_eq!(mul_div255(255, 255), 255);
    assert_eq!(mul_div255(255, 128), 128);
    assert_eq!(mul_div255(0, 200), 0);
}

#[test]
fn premultiply_zero_alpha_clears_rgb() {
    let mut px = vec![200u8, 100, 50, 0, 255, 0, 0, 128];
    premultiply_rgba8_in_place(&mut px);
    assert_eq!(px, vec![0, 0, 0, 0, 128, 0, 0, 128]);
}

#[test]
fn flatten_premul_alpha_0_returns_bg() {
    let src = vec![0u8, 0, 0, 0];
    let mut dst = vec![0u8; 4];
    flatten_premul_over_bg_to_opaque_rgba8(&mut dst, &src, [10, 20, 30, 255]).unwrap();
    assert_eq!(dst, vec![10, 20, 30, 255]);
}

#[test]
fn flatten_premul_alpha_255_is_identity() {
    let src = vec![1u8, 2, 3, 255];
    let mut dst = vec![0u8; 4];
    flatten_premul_over_bg_to_opaque_rgba8(&mut dst, &src, [10, 20, 30, 255]).unwrap();
    assert_eq!(dst, src);
}

#[test]
fn flatten_rejects_mismatched_buffers() {
    let mut dst = vec![0u8; 8];
    assert!(flatten_premul_over_bg_to_opaque_rgba8(&mut dst, &[0u8; 4], [0, 0, 0, 255]).is_err());
}
