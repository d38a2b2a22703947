//! Live parking view

use anyhow::Result;
use clap::Args;

use parkway_core::vehicle::{EMPTY_ASSET, EMPTY_GLYPH};
use parkway_core::{LotLayout, Session, VehicleClass};

#[derive(Args, Debug)]
pub struct ViewArgs {
    /// Seed for the initial occupancy
    #[arg(long)]
    pub seed: Option<u64>,

    /// Print the grid as JSON
    #[arg(long)]
    pub json: bool,
}

pub async fn run(args: ViewArgs) -> Result<()> {
    let session = Session::new(LotLayout::default_layout(), args.seed);
    if args.json {
        println!("{}", serde_json::to_string_pretty(session.grid())?);
    } else {
        print_grid(&session);
        print_legend();
    }
    Ok(())
}

/// One line per floor: name, slot glyphs, free count
pub fn render_grid(session: &Session) -> Vec<String> {
    let width = session
        .layout()
        .floors()
        .iter()
        .map(|f| f.name.len())
        .max()
        .unwrap_or(0);

    session
        .layout()
        .floors()
        .iter()
        .enumerate()
        .map(|(i, floor)| {
            format!(
                "{:<width$}  {}  free: {}",
                floor.name,
                session.grid().render_floor(i, floor.class),
                session.grid().free_count(i)
            )
        })
        .collect()
}

pub fn print_grid(session: &Session) {
    println!("Live Parking View");
    for line in render_grid(session) {
        println!("{line}");
    }
}

fn print_legend() {
    println!();
    println!("  {EMPTY_GLYPH} free ({EMPTY_ASSET})");
    for class in VehicleClass::ALL {
        println!("  {} {} ({})", class.glyph(), class.label(), class.asset());
    }
}
