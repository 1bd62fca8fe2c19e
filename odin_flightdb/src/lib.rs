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

//! accumulation of aircraft track fragments (ADS-B and MLAT position batches) into per-flight aggregates.
//!
//! Each incoming [`fragment::TrackFragment`] either continues the most recent flight of its aircraft, is spliced in
//! as the track of the other data source, or starts a new flight if it is not a plausible continuation. See
//! [`accumulator::FlightAccumulator`] for the processing pipeline.

use std::{fs, path::Path, time::Duration};
use serde::{Serialize,Deserialize,Serializer,Deserializer};

pub mod errors;
pub mod trackpoint;
pub mod fragment;
pub mod flight;
pub mod key;
pub mod plausibility;
pub mod waypoints;
pub mod airframe;
pub mod store;
pub mod accumulator;

use errors::{OdinFlightDbError, Result};
use plausibility::GapEnvelopeTest;
use waypoints::{Fix, FixCrossingDetector, DEFAULT_FIXES};

#[derive(Deserialize,Serialize,Debug,Clone)]
#[serde(default)]
pub struct FlightDbConfig {
    /// max time between the end of a track and the start of a fragment that still continues it
    #[serde(deserialize_with="deserialize_duration", serialize_with="serialize_duration")]
    pub max_suffix_gap: Duration,

    /// max time between the end of an out-of-order fragment and the start of the track
    #[serde(deserialize_with="deserialize_duration", serialize_with="serialize_duration")]
    pub max_prefix_gap: Duration,

    pub waypoint_snap_km: f64, // half-size of the box a track has to cross around a fix
    pub fixes: Vec<Fix>,
}

impl Default for FlightDbConfig {
    fn default()->Self {
        FlightDbConfig {
            max_suffix_gap: Duration::from_secs(180),
            max_prefix_gap: Duration::from_secs(540),
            waypoint_snap_km: 1.0,
            fixes: DEFAULT_FIXES.clone(),
        }
    }
}

impl FlightDbConfig {
    pub fn continuity_test (&self)->GapEnvelopeTest {
        GapEnvelopeTest::new( self.max_suffix_gap, self.max_prefix_gap)
    }

    pub fn waypoint_detector (&self)->FixCrossingDetector {
        FixCrossingDetector::new( self.fixes.clone(), self.waypoint_snap_km)
    }
}

/// load a FlightDbConfig from a RON file. Missing fields are set to their defaults
pub fn load_config<P: AsRef<Path>> (path: P)->Result<FlightDbConfig> {
    let path = path.as_ref();
    let s = fs::read_to_string( path)
        .map_err( |e| OdinFlightDbError::ConfigError( format!("cannot read config {path:?}: {e}")))?;
    Ok( ron::from_str( &s)? )
}

// durations in configs are human readable strings such as "3m" or "90s"
fn deserialize_duration<'a,D> (deserializer: D)->std::result::Result<Duration,D::Error> where D: Deserializer<'a> {
    let s = String::deserialize( deserializer)?;
    parse_duration::parse( &s).map_err( |e| serde::de::Error::custom( format!("{e:?}")))
}

fn serialize_duration<S> (dur: &Duration, s: S)->std::result::Result<S::Ok,S::Error> where S: Serializer {
    s.serialize_str( &format!("{}s", dur.as_secs()))
}
