//! Font registration for the `ab_glyph` text path.
//!
//! `ab_glyph` does not discover OS fonts, and bitmap output cannot draw text without a
//! registered face. SVG output writes text as markup and never needs one.

use plotters::style::FontStyle;
use std::path::PathBuf;
use std::sync::OnceLock;

/// Environment variable naming a `.ttf` file to use instead of the system search.
pub const FONT_ENV: &str = "LGAMAP_FONT";

const SYSTEM_FONTS: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu-sans-fonts/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/Library/Fonts/Arial.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

static REGISTERED: OnceLock<bool> = OnceLock::new();

/// Register a "sans-serif" face once per process. Returns whether one is available.
pub fn ensure_fonts_registered() -> bool {
    *REGISTERED.get_or_init(|| {
        let candidates = std::env::var_os(FONT_ENV)
            .map(PathBuf::from)
            .into_iter()
            .chain(SYSTEM_FONTS.iter().map(PathBuf::from));

        for path in candidates {
            let Ok(bytes) = std::fs::read(&path) else {
                continue;
            };
            // register_font keeps a 'static reference for the life of the process.
            let bytes: &'static [u8] = Box::leak(bytes.into_boxed_slice());
            if plotters::style::register_font("sans-serif", FontStyle::Normal, bytes).is_ok() {
                log::debug!("registered font {}", path.display());
                return true;
            }
            log::debug!("{} is not a usable font", path.display());
        }
        log::warn!("no TrueType font found (set {FONT_ENV}); bitmap maps are drawn without text");
        false
    })
}
