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

//! storage keys for Flight aggregates.
//!
//! A key has two parts: a root (partition) that is derived from the aircraft identifier or callsign, so that all
//! flights of one aircraft can be read from a single strongly consistent scope, and a leaf that is derived from the
//! epoch seconds of the first trackpoint of the flight. Since both parts are content derived, delivering the same
//! "new flight" fragment twice yields the same key and hence overwrites instead of duplicating the flight.

use std::{fmt, str::FromStr};
use serde::{Serialize,Deserialize};

use crate::{flight::Flight, errors::{key_error, OdinFlightDbError, Result}};

pub const CALLSIGN_ROOT_PREFIX: &str = "c:";

#[derive(Serialize,Deserialize,Debug,Clone,PartialEq,Eq,Hash,PartialOrd,Ord)]
pub struct FlightKey {
    pub root: Option<String>,
    pub id: i64,
}

impl FlightKey {
    pub fn new (root: Option<String>, id: i64)->Self { FlightKey{ root, id } }

    pub fn root (&self)->Option<&str> { self.root.as_deref() }

    pub fn encode (&self)->String { self.to_string() }
}

impl fmt::Display for FlightKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!( f, "{}/{}", self.root.as_deref().unwrap_or(""), self.id)
    }
}

impl FromStr for FlightKey {
    type Err = OdinFlightDbError;

    fn from_str (s: &str)->Result<Self> {
        let (root, id) = s.rsplit_once('/').ok_or_else( || key_error!("no separator in key '{s}'"))?;
        let id: i64 = id.parse().map_err( |_| key_error!("invalid id in key '{s}'"))?;
        let root = if root.is_empty() { None } else { Some(root.to_string()) };
        Ok( FlightKey{ root, id } )
    }
}

/// the partition part of a key: aircraft id if we have one, normalized callsign otherwise
pub fn root_key (icao24: &str, callsign: Option<&str>)->Option<String> {
    if !icao24.is_empty() {
        Some( icao24.to_string())
    } else {
        callsign.filter( |cs| !cs.is_empty()).map( |cs| format!("{CALLSIGN_ROOT_PREFIX}{}", cs.to_lowercase()))
    }
}

/// return the key under which `flight` has to be stored. Flights that already have been persisted keep their key
pub fn derive_key (flight: &Flight)->Result<FlightKey> {
    if let Some(key) = flight.key() {
        return Ok( key.clone())
    }

    let root = root_key( &flight.icao24, flight.callsign.as_deref());
    let first_secs = flight.first_trackpoint().map( |p| p.timestamp.timestamp());

    match (root, first_secs) {
        (None, None) => Err( key_error!("flight has neither identifier, callsign nor trackpoints")),
        (root, first_secs) => Ok( FlightKey::new( root, first_secs.unwrap_or(0)))
    }
}
