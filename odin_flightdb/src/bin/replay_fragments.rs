/*
 * Copyright © 2025, United States Government, as represented by the Administrator of
 * the National Aeronautics and Space Administration. All rights reserved.
 *
 * The “ODIN” software is licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License. You may obtain a copy
 * of the License at http://www.apache.org/licenses/LICENSE-2.0.
 *
 * Unless required by applicable law or agreed to in writing, software distributed under
 * the License is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND,
 * either express or implied. See the License for the specific language governing permissions
 * and limitations under the License.
 */
#![allow(unused)]

use std::{fs::File, io::{BufRead,BufReader}, path::PathBuf};
use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use odin_flightdb::{
    FlightDbConfig, load_config,
    accumulator::FlightAccumulator,
    airframe::AirframeCache,
    fragment::TrackFragment,
    store::{FlightStore,MemFlightStore},
};

/// replay a file with one JSON TrackFragment per line through an in-memory flight accumulator
#[derive(Parser)]
#[command(version, about = "replay recorded track fragments into flights")]
struct CliOpts {
    /// RON config file (default settings if not set)
    #[arg(long)]
    config: Option<PathBuf>,

    /// RON or JSON file with icao24 -> airframe map
    #[arg(long)]
    airframes: Option<PathBuf>,

    /// write the resulting flights to this JSON file
    #[arg(long)]
    snapshot: Option<PathBuf>,

    /// JSON-lines file with TrackFragments
    fragments: PathBuf,
}

#[tokio::main]
async fn main()->Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter( EnvFilter::from_default_env())  // use RUST_LOG to set max level
        .init();

    let opts = CliOpts::parse();

    let config = match &opts.config {
        Some(path) => load_config( path)?,
        None => FlightDbConfig::default()
    };
    let airframes = match &opts.airframes {
        Some(path) => AirframeCache::from_path( path)?,
        None => AirframeCache::new()
    };

    let accumulator = FlightAccumulator::from_config( MemFlightStore::new(), airframes, &config);
    let mut icaos: Vec<String> = Vec::new();

    let reader = BufReader::new( File::open( &opts.fragments)?);
    for (i,line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() { continue }

        let frag: TrackFragment = match serde_json::from_str( &line) {
            Ok(frag) => frag,
            Err(e) => { eprintln!("line {}: invalid fragment: {e}", i+1); continue }
        };

        match accumulator.add_track_fragment( &frag).await {
            Ok(outcome) => {
                println!("{frag} -> {} {}", outcome.branch, outcome.key);
                if !icaos.contains( &frag.icao24) { icaos.push( frag.icao24.clone()) }
            }
            Err(e) => eprintln!("line {}: {e}", i+1)
        }
    }

    println!("\n--- flights");
    for icao24 in &icaos {
        for flight in accumulator.store().lookup_all( icao24).await? {
            println!("{flight}");
        }
    }

    if let Some(path) = &opts.snapshot {
        accumulator.store().save_snapshot( path)?;
        println!("saved snapshot to {path:?}");
    }

    Ok(())
}
