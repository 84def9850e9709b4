/// Straight-alpha RGBA8 color attached to every plotted item.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Rgba8 {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel (255 = opaque).
    pub a: u8,
}

impl Rgba8 {
    /// Opaque black, the default ink for axes and labels.
    pub const BLACK: Self = Self::new(0, 0, 0, 255);
    /// Opaque white.
    pub const WHITE: Self = Self::new(255, 255, 255, 255);
    /// Opaque red.
    pub const RED: Self = Self::new(180, 0, 0, 255);
    /// Opaque green.
    pub const GREEN: Self = Self::new(0, 140, 0, 255);
    /// Opaque blue.
    pub const BLUE: Self = Self::new(0, 0, 180, 255);

    /// Construct a color from straight-alpha components.
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Construct an opaque color.
    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    /// Alpha as a fraction in `[0, 1]`.
    pub fn alpha_f32(self) -> f32 {
        f32::from(self.a) / 255.0
    }
}

impl Default for Rgba8 {
    fn default() -> Self {
        Self::BLACK
    }
}
