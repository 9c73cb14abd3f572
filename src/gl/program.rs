//! Fragment programs run by [`GlDevice::draw`](crate::GlDevice::draw).
//!
//! A program is evaluated once per target pixel with the interpolated `vCoord` varying of a
//! full-target quad and returns a straight-alpha color in `0..=1`.

use crate::foundation::core::Rgba8;
use crate::gl::device::TextureFilter;

/// Per-pixel inputs of a fragment program.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Fragment {
    /// Normalized position of the pixel center, `(0, 0)` at the bottom-left corner.
    pub coord: [f32; 2],
    /// Integer pixel position (`gl_FragCoord.xy` floored), bottom-left origin.
    pub pixel: [u32; 2],
    /// Size of the render target in pixels.
    pub resolution: [u32; 2],
}

/// Read-only view of a bound input texture.
#[derive(Clone, Copy, Debug)]
pub struct Sampler<'a> {
    width: u32,
    height: u32,
    filter: TextureFilter,
    data: &'a [u8],
}

impl<'a> Sampler<'a> {
    /// `data` holds `width × height` RGBA8 texels, row 0 at the bottom.
    pub(crate) fn new(width: u32, height: u32, filter: TextureFilter, data: &'a [u8]) -> Self {
        debug_assert_eq!(data.len(), width as usize * height as usize * 4);
        Self {
            width,
            height,
            filter,
            data,
        }
    }

    /// Texture width in texels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Texture height in texels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Fetch a texel with clamp-to-edge addressing (`texelFetch`, bottom-left origin).
    pub fn texel(&self, x: i64, y: i64) -> [f32; 4] {
        let x = x.clamp(0, i64::from(self.width) - 1) as usize;
        let y = y.clamp(0, i64::from(self.height) - 1) as usize;
        let i = (y * self.width as usize + x) * 4;
        let px = &self.data[i..i + 4];
        [
            f32::from(px[0]) / 255.0,
            f32::from(px[1]) / 255.0,
            f32::from(px[2]) / 255.0,
            f32::from(px[3]) / 255.0,
        ]
    }

    /// Sample at normalized coordinates (`texture2D`), honoring the texture filter.
    pub fn sample(&self, uv: [f32; 2]) -> [f32; 4] {
        let fx = uv[0] * self.width as f32 - 0.5;
        let fy = uv[1] * self.height as f32 - 0.5;
        match self.filter {
            TextureFilter::Nearest => self.texel(fx.round() as i64, fy.round() as i64),
            TextureFilter::Linear => {
                let x0 = fx.floor();
                let y0 = fy.floor();
                let tx = fx - x0;
                let ty = fy - y0;
                let (x0, y0) = (x0 as i64, y0 as i64);
                let a = self.texel(x0, y0);
                let b = self.texel(x0 + 1, y0);
                let c = self.texel(x0, y0 + 1);
                let d = self.texel(x0 + 1, y0 + 1);
                std::array::from_fn(|i| {
                    let bottom = a[i] + (b[i] - a[i]) * tx;
                    let top = c[i] + (d[i] - c[i]) * tx;
                    bottom + (top - bottom) * ty
                })
            }
        }
    }
}

/// A fragment shader evaluated on the CPU.
pub trait FragmentProgram: Sync {
    /// Short name used in logs.
    fn name(&self) -> &str {
        "anonymous"
    }

    /// Color of one fragment. Components are clamped to `0..=1` on write.
    fn shade(&self, frag: &Fragment, inputs: &[Sampler<'_>]) -> [f32; 4];
}

/// Writes a constant color.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FillProgram(pub Rgba8);

impl FragmentProgram for FillProgram {
    fn name(&self) -> &str {
        "fill"
    }

    fn shade(&self, _frag: &Fragment, _inputs: &[Sampler<'_>]) -> [f32; 4] {
        self.0.to_f32()
    }
}

/// Copies input 0, stretched over the whole target. Transparent when no input is bound.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CopyProgram;

impl FragmentProgram for CopyProgram {
    fn name(&self) -> &str {
        "copy"
    }

    fn shade(&self, frag: &Fragment, inputs: &[Sampler<'_>]) -> [f32; 4] {
        inputs
            .first()
            .map_or([0.0; 4], |input| input.sample(frag.coord))
    }
}

/// Opaque greyscale `coord.x * coord.y`: black at the bottom-left, white at the top-right.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GradientProgram;

impl FragmentProgram for GradientProgram {
    fn name(&self) -> &str {
        "gradient"
    }

    fn shade(&self, frag: &Fragment, _inputs: &[Sampler<'_>]) -> [f32; 4] {
        let v = frag.coord[0] * frag.coord[1];
        [v, v, v, 1.0]
    }
}

/// Adapts a closure into a [`FragmentProgram`].
pub struct ShaderFn<F> {
    name: &'static str,
    f: F,
}

impl<F> ShaderFn<F>
where
    F: Fn(&Fragment, &[Sampler<'_>]) -> [f32; 4] + Sync,
{
    /// Wrap `f` under `name`.
    pub fn new(name: &'static str, f: F) -> Self {
        Self { name, f }
    }
}

impl<F> std::fmt::Debug for ShaderFn<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShaderFn").field("name", &self.name).finish()
    }
}

impl<F> FragmentProgram for ShaderFn<F>
where
    F: Fn(&Fragment, &[Sampler<'_>]) -> [f32; 4] + Sync,
{
    fn name(&self) -> &str {
        self.name
    }

    fn shade(&self, frag: &Fragment, inputs: &[Sampler<'_>]) -> [f32; 4] {
        (self.f)(frag, inputs)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/gl/program.rs"]
mod tests;
