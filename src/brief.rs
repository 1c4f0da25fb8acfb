//! Redesign prompts built from a structured brief.

use serde::{Deserialize, Serialize};
use std::fmt::Write;

/// Material and mood choices for a redesign.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Materials {
    /// Main wall colour.
    pub wall_color: Option<String>,
    /// Accent wall treatment, `none` for no accent wall.
    pub accent_wall: Option<String>,
    /// Floor material.
    pub floor_type: Option<String>,
    /// Curtain type, `none` for bare windows.
    pub curtain_type: Option<String>,
    /// Lighting mood.
    pub lighting_mood: Option<String>,
}

/// A room redesign brief.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DesignBrief {
    /// Kind of room, e.g. `living room`.
    pub room_type: String,
    /// Target style, e.g. `Scandinavian`.
    pub style: String,
    /// Material choices.
    #[serde(default)]
    pub materials: Materials,
}

/// Returns the value unless it is unset, blank or `none`.
fn chosen(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty() && !v.eq_ignore_ascii_case("none"))
}

impl DesignBrief {
    /// Creates a brief with no material choices.
    pub fn new(room_type: impl Into<String>, style: impl Into<String>) -> Self {
        Self {
            room_type: room_type.into(),
            style: style.into(),
            materials: Materials::default(),
        }
    }

    /// Sets the material choices.
    pub fn with_materials(mut self, materials: Materials) -> Self {
        self.materials = materials;
        self
    }

    /// Renders the prompt for the image transform.
    ///
    /// The prompt asks the model to keep layout and furniture placement and
    /// only restyle colours, materials and lighting.
    pub fn render(&self) -> String {
        let room = &self.room_type;
        let style = &self.style;
        let m = &self.materials;
        let lighting = chosen(&m.lighting_mood)
            .map(|mood| format!("{mood} lighting"))
            .unwrap_or_else(|| "natural lighting".to_string());

        let mut out = String::new();
        // writing into a String cannot fail
        let _ = writeln!(
            out,
            "IMPORTANT: Keep the exact same room layout, structure, and furniture placement. \
             Only update the colors, materials, and lighting.\n"
        );
        let _ = writeln!(out, "Redesign this {room} in {style} style with these changes:\n");
        out.push_str(
            "PRESERVE:\n\
             - Keep the exact same room layout and dimensions\n\
             - Keep all existing furniture in the same positions\n\
             - Keep doors, windows, and walls in the same locations\n\
             - Maintain the overall spatial arrangement\n\n",
        );

        out.push_str("CHANGE ONLY:\n");
        let _ = writeln!(
            out,
            "- Wall colors: {}",
            chosen(&m.wall_color).unwrap_or("neutral tones")
        );
        if let Some(accent) = chosen(&m.accent_wall) {
            let _ = writeln!(out, "- Add {accent} accent wall");
        }
        let _ = writeln!(
            out,
            "- Floor material: {} flooring",
            chosen(&m.floor_type).unwrap_or("hardwood")
        );
        if let Some(curtains) = chosen(&m.curtain_type) {
            let _ = writeln!(out, "- Window treatments: {curtains} curtains");
        }
        let _ = writeln!(out, "- Lighting: {lighting}");
        let _ = writeln!(
            out,
            "- Update furniture colors and finishes to match {style} aesthetic"
        );
        out.push_str("- Add decorative elements (plants, artwork) that fit the style\n\n");

        out.push_str("STYLE GUIDELINES:\n");
        let _ = writeln!(out, "- Apply {style} design principles to existing furniture");
        out.push_str(
            "- Maintain the same furniture count and positions\n\
             - Update colors and textures only\n\
             - Keep the room functional and recognizable\n\n",
        );

        let _ = write!(
            out,
            "OUTPUT: Photorealistic image showing the same {room} with updated colors, \
             materials, and lighting. The layout and furniture placement must remain \
             identical. 8K resolution."
        );
        out
    }
}
