//! UI event surface and export requests.

use base64::Engine;
use serde::{Deserialize, Serialize};

use crate::config::EventNames;
use crate::types::Saleability;

/// Raster or vector target of an export.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Png,
    Jpg,
    Svg,
}

impl ExportFormat {
    /// Parse a host-supplied format name (case-insensitive).
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "png" => Some(Self::Png),
            "jpg" | "jpeg" => Some(Self::Jpg),
            "svg" => Some(Self::Svg),
            _ => None,
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpg => "jpg",
            Self::Svg => "svg",
        }
    }

    pub fn mime(self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpg => "image/jpeg",
            Self::Svg => "image/svg+xml",
        }
    }
}

/// Everything the host needs to rasterize and download the current map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportRequest {
    pub file_name: String,
    pub mime: String,
    pub svg: String,
}

impl ExportRequest {
    pub fn new(basename: &str, format: ExportFormat, svg: String) -> Self {
        Self {
            file_name: format!("{basename}.{}", format.extension()),
            mime: format.mime().to_string(),
            svg,
        }
    }

    /// The SVG as a `data:` URI, ready to be loaded into an image element.
    pub fn svg_data_uri(&self) -> String {
        let encoded = base64::engine::general_purpose::STANDARD.encode(self.svg.as_bytes());
        format!("data:image/svg+xml;base64,{encoded}")
    }
}

/// One user interaction, as raised by the host page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    CategorySelected(String),
    Reset,
    ReadinessToggle,
    /// Emphasize cells whose saleability tag is in the set.
    SaleabilityFilter(Vec<String>),
    Export(ExportFormat),
}

impl UiEvent {
    /// Build an event from its configured name and a string payload.
    ///
    /// The saleability payload is the slider level ("1" to "4"), the export
    /// payload a format name. Unknown names and bad payloads yield `None`.
    pub fn from_named(names: &EventNames, name: &str, payload: Option<&str>) -> Option<Self> {
        if name == names.reset {
            Some(Self::Reset)
        } else if name == names.community_ready {
            Some(Self::ReadinessToggle)
        } else if name == names.category_selected {
            payload.map(|category| Self::CategorySelected(category.to_string()))
        } else if name == names.saleability {
            let level = payload?.trim().parse::<u8>().ok()?;
            saleability_for_level(level).map(Self::SaleabilityFilter)
        } else if name == names.export {
            ExportFormat::parse(payload.unwrap_or("png")).map(Self::Export)
        } else {
            None
        }
    }
}

/// Saleability tags selected by a slider level.
///
/// | level | tags |
/// |---|---|
/// | 1 | N |
/// | 2 | WC |
/// | 3 | Y, WC |
/// | 4 | N, WC, Y |
pub fn saleability_for_level(level: u8) -> Option<Vec<String>> {
    let tags: &[Saleability] = match level {
        1 => &[Saleability::No],
        2 => &[Saleability::WithCare],
        3 => &[Saleability::Yes, Saleability::WithCare],
        4 => &[Saleability::No, Saleability::WithCare, Saleability::Yes],
        _ => return None,
    };
    Some(tags.iter().map(|t| t.tag().to_string()).collect())
}
