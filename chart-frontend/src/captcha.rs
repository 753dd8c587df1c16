use rand::Rng;

use crate::backend::{RendererBackend, Segment};
use crate::theme;

pub const FONT: &str = "bold 24px Arial";
pub const NOISE_DOTS: usize = 100;
pub const NOISE_SIZE: f64 = 2.0;
pub const DISTORTION_LINES: usize = 3;
pub const DISTORTION_WIDTH: f32 = 2.0;
/// Max vertical jitter either side of the middle line, in px.
pub const JITTER_Y: f64 = 5.0;
/// Max rotation either side of upright, in radians.
pub const MAX_TILT: f64 = 0.2;

#[derive(Debug, Clone, PartialEq)]
pub struct Glyph {
    pub ch: char,
    pub x: f64,
    pub y: f64,
    pub angle: f64,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NoiseDot {
    pub x: f64,
    pub y: f64,
    pub color: String,
}

/// Everything random about one CAPTCHA image, decided up front.
#[derive(Debug, Clone, PartialEq)]
pub struct CaptchaLayout {
    pub width: f64,
    pub height: f64,
    pub noise: Vec<NoiseDot>,
    pub glyphs: Vec<Glyph>,
    pub lines: Vec<Segment>,
}

impl CaptchaLayout {
    pub fn random<R: Rng + ?Sized>(rng: &mut R, text: &str, width: f64, height: f64) -> Self {
        let noise = (0..NOISE_DOTS)
            .map(|_| NoiseDot {
                color: format!(
                    "rgba({}, {}, {}, 0.1)",
                    rng.gen_range(0..=255u8),
                    rng.gen_range(0..=255u8),
                    rng.gen_range(0..=255u8)
                ),
                x: rng.gen::<f64>() * width,
                y: rng.gen::<f64>() * height,
            })
            .collect();

        let len = text.chars().count().max(1) as f64;
        let glyphs = text
            .chars()
            .enumerate()
            .map(|(i, ch)| Glyph {
                color: format!(
                    "rgb({}, {}, {})",
                    rng.gen_range(0..100u8),
                    rng.gen_range(0..100u8),
                    rng.gen_range(0..100u8)
                ),
                ch,
                x: width / len * (i as f64 + 0.5),
                y: height / 2.0 + (rng.gen::<f64>() - 0.5) * 2.0 * JITTER_Y,
                angle: (rng.gen::<f64>() - 0.5) * 2.0 * MAX_TILT,
            })
            .collect();

        let lines = (0..DISTORTION_LINES)
            .map(|_| {
                (
                    rng.gen::<f64>() * width,
                    rng.gen::<f64>() * height,
                    rng.gen::<f64>() * width,
                    rng.gen::<f64>() * height,
                )
            })
            .collect();

        Self {
            width,
            height,
            noise,
            glyphs,
            lines,
        }
    }
}

/// Background, then noise, glyphs and distortion lines on top.
pub fn render_captcha<B: RendererBackend + ?Sized>(backend: &mut B, layout: &CaptchaLayout) {
    backend.begin_frame(Some(theme::CAPTCHA_BACKGROUND));
    for dot in &layout.noise {
        backend.fill_rect(dot.x, dot.y, NOISE_SIZE, NOISE_SIZE, &dot.color);
    }
    backend.draw_glyphs(&layout.glyphs, FONT);
    backend.draw_segments(&layout.lines, theme::CAPTCHA_LINE, DISTORTION_WIDTH);
}
