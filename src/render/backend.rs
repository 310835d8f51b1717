//! Render backend trait and the drawing commands it consumes.
//!
//! A layout pass produces a [`Scene`]: an ordered list of placement commands
//! that any backend can replay. The SVG backend is the one shipped; hosts can
//! implement [`RenderBackend`] for other surfaces.

use serde::Serialize;

use crate::error::Result;

use super::colors::CssColor;

/// Named SVG filter applied to a cell background.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Filter {
    /// Resting look of every cell.
    Lighten,
    /// Emphasized look used by highlight and the legend swatches.
    InsetShadow,
}

impl Filter {
    pub fn id(self) -> &'static str {
        match self {
            Self::Lighten => "lighten",
            Self::InsetShadow => "inset-shadow",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAnchor {
    Start,
    Middle,
}

/// A single placement command.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum DrawCommand {
    /// Open a group; commands until the matching `EndGroup` belong to it.
    BeginGroup { id: String },
    EndGroup,
    Rect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        fill: CssColor,
        class: Option<&'static str>,
        filter: Option<Filter>,
        stroke: Option<CssColor>,
    },
    Text {
        x: f64,
        y: f64,
        text: String,
        font_size: f64,
        anchor: TextAnchor,
        fill: CssColor,
    },
    Image {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        href: String,
        class: String,
    },
}

/// Everything needed to draw one frame.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Scene {
    pub width: f64,
    pub height: f64,
    pub commands: Vec<DrawCommand>,
}

impl Scene {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            commands: Vec::new(),
        }
    }

    pub fn push(&mut self, command: DrawCommand) {
        self.commands.push(command);
    }

    /// Commands inside the group with the given id (excluding the group markers).
    pub fn group(&self, id: &str) -> Option<&[DrawCommand]> {
        let start = self.commands.iter().position(
            |c| matches!(c, DrawCommand::BeginGroup { id: group } if group == id),
        )?;
        let body = self.commands.get(start + 1..)?;
        let len = body
            .iter()
            .position(|c| matches!(c, DrawCommand::EndGroup))
            .unwrap_or(body.len());
        body.get(..len)
    }
}

/// Trait for render backends
///
/// Implementations replay a [`Scene`] onto their surface. A render call must
/// fully replace whatever the previous call drew.
pub trait RenderBackend {
    /// Draw a frame.
    fn render(&mut self, scene: &Scene) -> Result<()>;

    /// Drop whatever is currently drawn.
    fn clear(&mut self);
}
