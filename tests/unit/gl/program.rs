use super::*;

fn frag(x: u32, y: u32, w: u32, h: u32) -> Fragment {
    Fragment {
        coord: [(x as f32 + 0.5) / w as f32, (y as f32 + 0.5) / h as f32],
        pixel: [x, y],
        resolution: [w, h],
    }
}

// 2x2 texture, bottom row first: red, green / blue, white.
const TEXELS: [u8; 16] = [
    255, 0, 0, 255, 0, 255, 0, 255, //
    0, 0, 255, 255, 255, 255, 255, 255,
];

#[test]
fn nearest_sampling_hits_exact_texels() {
    let s = Sampler::new(2, 2, TextureFilter::Nearest, &TEXELS);
    assert_eq!(s.sample([0.25, 0.25]), [1.0, 0.0, 0.0, 1.0]);
    assert_eq!(s.sample([0.75, 0.25]), [0.0, 1.0, 0.0, 1.0]);
    assert_eq!(s.sample([0.25, 0.75]), [0.0, 0.0, 1.0, 1.0]);
    assert_eq!(s.sample([0.75, 0.75]), [1.0, 1.0, 1.0, 1.0]);
}

#[test]
fn texel_fetch_clamps_to_edge() {
    let s = Sampler::new(2, 2, TextureFilter::Nearest, &TEXELS);
    assert_eq!(s.texel(-5, -5), s.texel(0, 0));
    assert_eq!(s.texel(9, 9), s.texel(1, 1));
    assert_eq!((s.width(), s.height()), (2, 2));
}

#[test]
fn linear_sampling_blends_neighbours() {
    let s = Sampler::new(2, 2, TextureFilter::Linear, &TEXELS);
    let c = s.sample([0.5, 0.25]);
    assert!((c[0] - 0.5).abs() < 1e-4);
    assert!((c[1] - 0.5).abs() < 1e-4);
    assert!(c[2].abs() < 1e-4);
    assert!((c[3] - 1.0).abs() < 1e-4);
}

#[test]
fn builtin_programs() {
    let f = frag(0, 0, 4, 4);
    assert_eq!(
        FillProgram(Rgba8::WHITE).shade(&f, &[]),
        [1.0, 1.0, 1.0, 1.0]
    );
    assert_eq!(CopyProgram.shade(&f, &[]), [0.0; 4]);

    let s = Sampler::new(2, 2, TextureFilter::Nearest, &TEXELS);
    assert_eq!(CopyProgram.shade(&f, &[s]), [1.0, 0.0, 0.0, 1.0]);

    let bottom_left = GradientProgram.shade(&frag(0, 0, 100, 100), &[]);
    let top_right = GradientProgram.shade(&frag(99, 99, 100, 100), &[]);
    assert!(bottom_left[0] < 0.01);
    assert!(top_right[0] > 0.98);
    assert_eq!(top_right[3], 1.0);
}

#[test]
fn shader_fn_wraps_closure() {
    let p = ShaderFn::new("red-x", |f: &Fragment, _: &[Sampler<'_>]| [f.coord[0], 0.0, 0.0, 1.0]);
    assert_eq!(p.name(), "red-x");
    assert_eq!(p.shade(&frag(1, 0, 2, 1), &[])[0], 0.75);
    assert_eq!(format!("{p:?}"), "ShaderFn { name: \"red-x\" }");
}
