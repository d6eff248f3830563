//! Color types and SGR parameter codes.
//!
//! Concrete colors (named ANSI, 256-palette, truecolor) plus the hook for
//! resolving semantic tokens (`accent`, `muted`, …) supplied by the host.
//! The library itself carries no theme: an unresolved token renders unstyled.

/// A terminal color.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum Color {
    /// True color RGB.
    Rgb {
        /// Red component.
        r: u8,
        /// Green component.
        g: u8,
        /// Blue component.
        b: u8,
    },
    /// 256-color palette index.
    Indexed(u8),
    /// Named ANSI color.
    Named(NamedColor),
    /// A semantic token resolved by the host's [`ColorResolver`].
    Token(String),
    /// Reset to terminal default.
    Reset,
}

/// The 16 standard ANSI colors.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum NamedColor {
    /// Black (0).
    Black,
    /// Red (1).
    Red,
    /// Green (2).
    Green,
    /// Yellow (3).
    Yellow,
    /// Blue (4).
    Blue,
    /// Magenta (5).
    Magenta,
    /// Cyan (6).
    Cyan,
    /// White (7).
    White,
    /// Bright black / dark gray (8).
    BrightBlack,
    /// Bright red (9).
    BrightRed,
    /// Bright green (10).
    BrightGreen,
    /// Bright yellow (11).
    BrightYellow,
    /// Bright blue (12).
    BrightBlue,
    /// Bright magenta (13).
    BrightMagenta,
    /// Bright cyan (14).
    BrightCyan,
    /// Bright white (15).
    BrightWhite,
}

/// Resolves semantic color tokens into concrete colors.
///
/// Supplied by the host; the region core only passes tokens through. A
/// resolver returning `None` leaves the token unstyled.
pub trait ColorResolver {
    /// Resolve a token like `"accent"` into a concrete color.
    fn resolve(&self, token: &str) -> Option<Color>;
}

/// The default resolver: knows no tokens.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoThemeResolver;

impl ColorResolver for NoThemeResolver {
    fn resolve(&self, _token: &str) -> Option<Color> {
        None
    }
}

impl Color {
    /// SGR parameter codes for this color as a foreground.
    ///
    /// Tokens are resolved through `resolver` first; an unresolved token
    /// yields no codes.
    pub fn fg_codes(&self, resolver: &dyn ColorResolver) -> Vec<String> {
        match self {
            Color::Rgb { r, g, b } => vec![
                "38".to_string(),
                "2".to_string(),
                r.to_string(),
                g.to_string(),
                b.to_string(),
            ],
            Color::Indexed(i) => vec!["38".to_string(), "5".to_string(), i.to_string()],
            Color::Named(n) => vec![named_fg_code(*n).to_string()],
            Color::Token(t) => match resolver.resolve(t) {
                Some(c) => c.fg_codes(resolver),
                None => Vec::new(),
            },
            Color::Reset => vec!["39".to_string()],
        }
    }

    /// SGR parameter codes for this color as a background.
    pub fn bg_codes(&self, resolver: &dyn ColorResolver) -> Vec<String> {
        match self {
            Color::Rgb { r, g, b } => vec![
                "48".to_string(),
                "2".to_string(),
                r.to_string(),
                g.to_string(),
                b.to_string(),
            ],
            Color::Indexed(i) => vec!["48".to_string(), "5".to_string(), i.to_string()],
            Color::Named(n) => vec![named_bg_code(*n).to_string()],
            Color::Token(t) => match resolver.resolve(t) {
                Some(c) => c.bg_codes(resolver),
                None => Vec::new(),
            },
            Color::Reset => vec!["49".to_string()],
        }
    }
}

/// Get the SGR code for a named foreground color.
fn named_fg_code(color: NamedColor) -> u8 {
    match color {
        NamedColor::Black => 30,
        NamedColor::Red => 31,
        NamedColor::Green => 32,
        NamedColor::Yellow => 33,
        NamedColor::Blue => 34,
        NamedColor::Magenta => 35,
        NamedColor::Cyan => 36,
        NamedColor::White => 37,
        NamedColor::BrightBlack => 90,
        NamedColor::BrightRed => 91,
        NamedColor::BrightGreen => 92,
        NamedColor::BrightYellow => 93,
        NamedColor::BrightBlue => 94,
        NamedColor::BrightMagenta => 95,
        NamedColor::BrightCyan => 96,
        NamedColor::BrightWhite => 97,
    }
}

/// Get the SGR code for a named background color.
fn named_bg_code(color: NamedColor) -> u8 {
    match color {
        NamedColor::Black => 40,
        NamedColor::Red => 41,
        NamedColor::Green => 42,
        NamedColor::Yellow => 43,
        NamedColor::Blue => 44,
        NamedColor::Magenta => 45,
        NamedColor::Cyan => 46,
        NamedColor::White => 47,
        NamedColor::BrightBlack => 100,
        NamedColor::BrightRed => 101,
        NamedColor::BrightGreen => 102,
        NamedColor::BrightYellow => 103,
        NamedColor::BrightBlue => 104,
        NamedColor::BrightMagenta => 105,
        NamedColor::BrightCyan => 106,
        NamedColor::BrightWhite => 107,
    }
}
