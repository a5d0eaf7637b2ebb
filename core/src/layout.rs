#![deny(missing_docs)]

//! # Output Layouts
//!
//! The generated Go tree comes in three shapes. They agree on package
//! resolution but differ in how one generated file names another.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Shape of the generated output tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OutputLayout {
    /// gin server: module-rooted absolute imports, models under `dto`.
    #[default]
    Gin,
    /// go-zero server: models live next to the API package and reference each
    /// other relative to the importing file's directory.
    GoZero,
    /// go-zero `.api` description files: models are imported by file name.
    GoZeroApi,
}

/// How a model import path is written into the importing unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportStyle {
    /// `module/dto/user`
    Absolute,
    /// `../user/profile`, computed from the importing file.
    RelativeToFile,
    /// `profile`, a sibling file name.
    FileName,
}

impl OutputLayout {
    /// All layouts, in declaration order.
    pub const ALL: [OutputLayout; 3] = [Self::Gin, Self::GoZero, Self::GoZeroApi];

    /// Import path style used by this layout.
    pub fn import_style(self) -> ImportStyle {
        match self {
            Self::Gin => ImportStyle::Absolute,
            Self::GoZero => ImportStyle::RelativeToFile,
            Self::GoZeroApi => ImportStyle::FileName,
        }
    }

    /// Whether models share the API package instead of the `dto` package.
    pub fn models_in_api_package(self) -> bool {
        !matches!(self, Self::Gin)
    }

    /// Whether date-time values are carried as plain strings.
    ///
    /// go-zero has no `time.Time` binding.
    pub fn date_time_as_string(self) -> bool {
        !matches!(self, Self::Gin)
    }

    /// Library imports the layout's templates never use and which are dropped
    /// from operation import sets.
    pub fn dropped_operation_imports(self) -> &'static [&'static str] {
        match self {
            Self::Gin => &["strings"],
            Self::GoZero | Self::GoZeroApi => &[],
        }
    }

    /// Stable kebab-case name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Gin => "gin",
            Self::GoZero => "go-zero",
            Self::GoZeroApi => "go-zero-api",
        }
    }
}

impl fmt::Display for OutputLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutputLayout {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|layout| layout.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| {
                format!(
                    "unknown layout '{}', expected one of: gin, go-zero, go-zero-api",
                    s
                )
            })
    }
}
