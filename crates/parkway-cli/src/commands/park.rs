//! Vehicle entry: find and occupy slots

use anyhow::Result;
use clap::Args;
use tracing::info;

use parkway_core::{LotLayout, Session, VehicleClass};

use super::view::print_grid;

#[derive(Args, Debug)]
pub struct ParkArgs {
    /// Vehicle class: bike, car or mini-truck
    pub vehicle: VehicleClass,

    /// Number of vehicles of this class arriving one after another
    #[arg(short, long, default_value = "1")]
    pub count: usize,

    /// Seed for the initial occupancy and gate choice
    #[arg(long)]
    pub seed: Option<u64>,

    /// Print assignments as JSON
    #[arg(long)]
    pub json: bool,
}

pub async fn run(args: ParkArgs) -> Result<()> {
    let mut session = Session::new(LotLayout::default_layout(), args.seed);
    info!("Parking {} x {}", args.count, args.vehicle);

    for _ in 0..args.count {
        match session.park(args.vehicle) {
            Some(spot) if args.json => println!("{}", serde_json::to_string(&spot)?),
            Some(spot) => {
                println!("Parking found!");
                println!("  Floor:      {}", spot.floor_name);
                println!("  Slot:       {}", spot.slot);
                println!("  Enter from: {}", spot.gate);
                println!("  Available slots on this floor: {}", spot.available);
            }
            None if args.json => println!("null"),
            None => {
                println!("No slot available for {}", args.vehicle);
                break;
            }
        }
    }

    if !args.json {
        println!();
        print_grid(&session);
    }
    Ok(())
}
