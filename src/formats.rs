//! The font formats under comparison.

use strum::{Display, EnumIter, EnumString};

/// A font delivery format. The uppercase name is used for capture
/// directories and report files (`input/WOFF2`, `output/WOFF2.csv`); the
/// lowercase name is the file extension in the font resource URIs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, EnumString, clap::ValueEnum)]
#[strum(serialize_all = "UPPERCASE")]
pub enum FontFormat {
    Woff2,
    Woff,
    Ttf,
    Otf,
}

impl FontFormat {
    /// Directory name holding this format's captures.
    pub fn dir_name(self) -> String {
        self.to_string()
    }

    /// File extension carried by this format's font resources.
    pub fn extension(self) -> String {
        self.to_string().to_lowercase()
    }
}
