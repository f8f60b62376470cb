use crate::rng::SampleRng;

/// 8-bit RGB triple, the only color representation the pipeline uses.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Rgb(pub [u8; 3]);

impl Rgb {
    pub fn r(self) -> u8 {
        self.0[0]
    }

    pub fn g(self) -> u8 {
        self.0[1]
    }

    pub fn b(self) -> u8 {
        self.0[2]
    }
}

/// Foreground/background/border colors for one sample.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ColorScheme {
    pub foreground: Rgb,
    pub background: Rgb,
    pub border: Rgb,
}

impl ColorScheme {
    /// Low-contrast near-grayscale scheme: dark foreground on a light
    /// background, both with up to 15 per-channel jitter. The border color
    /// equals the foreground.
    ///
    /// Consumes 1 draw for each base plus 3 per triple, and one extra draw
    /// only when `random_swap` is set.
    pub fn near_grayscale(rng: &mut SampleRng, random_swap: bool) -> Self {
        let foreground = jittered_triple(rng, 5.0, 50.0, 15.0);
        let background = jittered_triple(rng, 190.0, 50.0, 15.0);
        let (foreground, background) = maybe_swap(rng, random_swap, foreground, background);
        Self {
            foreground,
            background,
            border: foreground,
        }
    }

    /// Colorful scheme with per-channel jitter up to `max_dev` and a fully
    /// independent random border color.
    ///
    /// `max_dev` must stay within [0, 55] so that every channel remains in
    /// range by construction.
    pub fn colorful(rng: &mut SampleRng, max_dev: i32, random_swap: bool) -> Self {
        let dev = f64::from(max_dev);
        let foreground = jittered_triple(rng, 5.0, 50.0, dev);
        let background = jittered_triple(rng, 150.0, 50.0, dev);
        let (foreground, background) = maybe_swap(rng, random_swap, foreground, background);
        let border = Rgb([
            (255.0 * rng.next_f64()) as u8,
            (255.0 * rng.next_f64()) as u8,
            (255.0 * rng.next_f64()) as u8,
        ]);
        Self {
            foreground,
            background,
            border,
        }
    }
}

/// Base value in `[base_min, base_min + base_span)` truncated to an integer,
/// then up to `jitter` added per channel. Truncation (not rounding) matters
/// for draw-for-draw output parity.
fn jittered_triple(rng: &mut SampleRng, base_min: f64, base_span: f64, jitter: f64) -> Rgb {
    let base = (base_min + rng.next_f64() * base_span) as i32;
    let mut channel = |rng: &mut SampleRng| (f64::from(base) + jitter * rng.next_f64()) as u8;
    let r = channel(rng);
    let g = channel(rng);
    let b = channel(rng);
    Rgb([r, g, b])
}

// Short-circuits: no draw is consumed when swapping is disabled.
fn maybe_swap(rng: &mut SampleRng, enabled: bool, fg: Rgb, bg: Rgb) -> (Rgb, Rgb) {
    if enabled && rng.next_f64() > 0.5 {
        (bg, fg)
    } else {
        (fg, bg)
    }
}
