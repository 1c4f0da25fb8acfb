//! Prints a room redesign prompt for `room-transform --prompt`.

use clap::Parser;
use roomgen::{DesignBrief, Materials};

#[derive(Parser)]
#[command(name = "design-prompt")]
#[command(about = "Compose a layout-preserving redesign prompt from a design brief")]
#[command(version)]
struct Cli {
    /// Kind of room (e.g. "living room")
    #[arg(long)]
    room_type: String,

    /// Target design style (e.g. "Scandinavian")
    #[arg(long)]
    style: String,

    /// Wall colour
    #[arg(long)]
    wall_color: Option<String>,

    /// Accent wall treatment ("none" to skip)
    #[arg(long)]
    accent_wall: Option<String>,

    /// Floor material
    #[arg(long)]
    floor_type: Option<String>,

    /// Curtain type ("none" to skip)
    #[arg(long)]
    curtain_type: Option<String>,

    /// Lighting mood
    #[arg(long)]
    lighting_mood: Option<String>,

    /// Print the brief and prompt as JSON
    #[arg(long)]
    json: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let brief = DesignBrief::new(cli.room_type, cli.style).with_materials(Materials {
        wall_color: cli.wall_color,
        accent_wall: cli.accent_wall,
        floor_type: cli.floor_type,
        curtain_type: cli.curtain_type,
        lighting_mood: cli.lighting_mood,
    });
    let prompt = brief.render();

    if cli.json {
        let result = serde_json::json!({
            "brief": brief,
            "prompt": prompt,
        });
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!("{prompt}");
    }

    Ok(())
}
