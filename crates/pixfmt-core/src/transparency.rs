//! Transparency classes.

use std::fmt;

/// How much of the alpha range a color model can produce.
///
/// Ordered by increasing generality, so "at least bitmask" is
/// `t.max(Transparency::Bitmask)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum Transparency {
    /// Every pixel has alpha 255.
    #[default]
    Opaque,
    /// Alpha is either 0 or 255.
    Bitmask,
    /// Any alpha value.
    Translucent,
}

impl Transparency {
    /// Classifies a single 8-bit alpha value.
    #[inline]
    pub const fn of_alpha(alpha: u8) -> Self {
        match alpha {
            255 => Self::Opaque,
            0 => Self::Bitmask,
            _ => Self::Translucent,
        }
    }
}

impl fmt::Display for Transparency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Opaque => "opaque",
            Self::Bitmask => "bitmask",
            Self::Translucent => "translucent",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ordering() {
        assert!(Transparency::Opaque < Transparency::Bitmask);
        assert_eq!(Transparency::Opaque.max(Transparency::Bitmask), Transparency::Bitmask);
        assert_eq!(
            Transparency::Translucent.max(Transparency::Bitmask),
            Transparency::Translucent
        );
    }

    #[test]
    fn test_of_alpha() {
        let classes: Vec<_> = [255u8, 0, 128].iter().map(|&a| Transparency::of_alpha(a)).collect();
        assert_eq!(
            classes,
            [Transparency::Opaque, Transparency::Bitmask, Transparency::Translucent]
        );
    }
}
