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

use std::{collections::{BTreeMap,BTreeSet}, fmt};
use chrono::{DateTime,Utc};
use serde::{Serialize,Deserialize};

use crate::{
    fragment::TrackFragment,
    key::FlightKey,
    trackpoint::{DataSourceKind, Track, Trackpoint}
};

/// static data about the physical aircraft. This does not change between flights
#[derive(Serialize,Deserialize,Debug,Clone,Default,PartialEq)]
pub struct Airframe {
    pub icao24: String,
    pub registration: String,
    pub equipment_type: String,
    pub callsign_prefix: String, // airline ICAO prefix if this airframe was seen with a Type-C callsign
}

impl Airframe {
    /// fill in all fields that are still empty from `other`. Returns true if anything changed
    pub fn overlay (&mut self, other: &Airframe)->bool {
        let mut changed = false;
        for (field, value) in [
            (&mut self.icao24, &other.icao24),
            (&mut self.registration, &other.registration),
            (&mut self.equipment_type, &other.equipment_type),
            (&mut self.callsign_prefix, &other.callsign_prefix),
        ] {
            if field.is_empty() && !value.is_empty() {
                *field = value.clone();
                changed = true;
            }
        }
        changed
    }
}

impl fmt::Display for Airframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!( f, "[{}] {} {} {}", self.icao24, self.registration, self.callsign_prefix, self.equipment_type)
    }
}

/// what happened to a flight while processing a fragment. This replaces a free-text debug log so that
/// processing decisions can be checked without string matching
#[derive(Serialize,Deserialize,Debug,Clone,PartialEq)]
pub enum DiagnosticEvent {
    NewIdentity { source: DataSourceKind },
    FirstTrackOnAggregate { source: DataSourceKind },
    Extended { source: DataSourceKind, target: DataSourceKind, n_added: usize, n_existing: usize, rationale: String },
    Split { rationale: String },
    CallsignBackfilled { callsign: String },
    AirframeFound { registration: String },
    WaypointFound { name: String, time: DateTime<Utc> },
}

#[derive(Serialize,Deserialize,Debug,Clone)]
pub struct DiagnosticEntry {
    pub logged: DateTime<Utc>,
    pub fragment: String, // short description of the fragment that caused this entry
    pub event: DiagnosticEvent,
}

pub const MLAT_TAG: &str = "MLAT";

/// the per-flight aggregate that is built up from track fragments.
/// A Flight owns its tracks (at most one per DataSourceKind) and waypoints
#[derive(Serialize,Deserialize,Debug,Clone,Default)]
pub struct Flight {
    pub icao24: String,
    pub callsign: Option<String>,
    pub airframe: Option<Airframe>,

    tracks: BTreeMap<DataSourceKind,Track>,
    waypoints: BTreeMap<String,DateTime<Utc>>,
    tags: BTreeSet<String>,
    diagnostics: Vec<DiagnosticEntry>,

    key: Option<FlightKey>, // set once the flight was persisted
    last_update: Option<DateTime<Utc>>,
}

impl Flight {
    pub fn new (icao24: impl Into<String>, callsign: Option<&str>)->Self {
        Flight {
            icao24: icao24.into(),
            callsign: callsign.filter(|cs| !cs.is_empty()).map(|cs| cs.to_string()),
            ..Flight::default()
        }
    }

    /// a brand new flight that is seeded entirely from the given fragment
    pub fn from_fragment (frag: &TrackFragment)->Self {
        let mut flight = Flight::new( frag.icao24.as_str(), frag.callsign());
        flight.tracks.insert( frag.source, frag.to_track());
        flight.update_tags();
        flight
    }

    //--- tracks

    pub fn has_track (&self, kind: DataSourceKind)->bool { self.tracks.contains_key(&kind) }
    pub fn track (&self, kind: DataSourceKind)->Option<&Track> { self.tracks.get(&kind) }
    pub fn track_mut (&mut self, kind: DataSourceKind)->Option<&mut Track> { self.tracks.get_mut(&kind) }
    pub fn tracks (&self)->impl Iterator<Item=(&DataSourceKind,&Track)> { self.tracks.iter() }

    pub fn insert_track (&mut self, kind: DataSourceKind, track: Track) {
        self.tracks.insert( kind, track);
        self.update_tags();
    }

    /// get the bucket for `kind`, creating an empty one if it does not exist yet
    pub fn ensure_track (&mut self, kind: DataSourceKind)->&mut Track {
        if kind == DataSourceKind::Mlat { self.tags.insert( MLAT_TAG.to_string()); }
        self.tracks.entry(kind).or_default()
    }

    /// the first non-empty track, in DataSourceKind order (ADSB before MLAT)
    pub fn any_track (&self)->Option<&Track> {
        self.tracks.values().find( |t| !t.is_empty())
    }

    pub fn first_trackpoint (&self)->Option<&Trackpoint> {
        self.any_track().and_then( |t| t.first())
    }

    pub fn n_points (&self)->usize { self.tracks.values().map( |t| t.len()).sum() }

    /// earliest start and latest end over all tracks
    pub fn times (&self)->Option<(DateTime<Utc>,DateTime<Utc>)> {
        let s = self.tracks.values().filter_map( |t| t.start()).min()?;
        let e = self.tracks.values().filter_map( |t| t.end()).max()?;
        Some((s,e))
    }

    //--- identity

    /// adopt the callsign if we don't have one yet. Once set a callsign is never overwritten
    pub fn backfill_callsign (&mut self, callsign: Option<&str>)->bool {
        match (&self.callsign, callsign) {
            (None, Some(cs)) if !cs.is_empty() => {
                self.callsign = Some(cs.to_string());
                true
            }
            _ => false
        }
    }

    pub fn needs_airframe (&self)->bool {
        self.airframe.as_ref().map_or( true, |af| af.registration.is_empty())
    }

    pub fn overlay_airframe (&mut self, af: &Airframe)->bool {
        match &mut self.airframe {
            Some(own) => own.overlay(af),
            None => { self.airframe = Some(af.clone()); true }
        }
    }

    //--- waypoints

    /// record a waypoint crossing unless we already have one for this fix (first crossing wins).
    /// Returns true if the waypoint was added
    pub fn set_waypoint (&mut self, name: &str, time: DateTime<Utc>)->bool {
        if self.waypoints.contains_key(name) {
            false
        } else {
            self.waypoints.insert( name.to_string(), time);
            true
        }
    }

    pub fn waypoint (&self, name: &str)->Option<DateTime<Utc>> { self.waypoints.get(name).copied() }
    pub fn has_waypoint (&self, name: &str)->bool { self.waypoints.contains_key(name) }
    pub fn waypoints (&self)->&BTreeMap<String,DateTime<Utc>> { &self.waypoints }

    /// waypoint names in order of crossing time
    pub fn route (&self)->Vec<&str> {
        let mut wps: Vec<(&String,&DateTime<Utc>)> = self.waypoints.iter().collect();
        wps.sort_by_key( |(_,t)| **t);
        wps.into_iter().map( |(name,_)| name.as_str()).collect()
    }

    //--- tags

    pub fn set_tag (&mut self, tag: &str) { self.tags.insert( tag.to_string()); }
    pub fn has_tag (&self, tag: &str)->bool { self.tags.contains(tag) }
    pub fn tags (&self)->impl Iterator<Item=&str> { self.tags.iter().map( |t| t.as_str()) }

    fn update_tags (&mut self) {
        if self.has_track( DataSourceKind::Mlat) { self.set_tag( MLAT_TAG) }
    }

    //--- diagnostics

    pub fn log (&mut self, fragment: &str, event: DiagnosticEvent) {
        self.diagnostics.push( DiagnosticEntry{ logged: Utc::now(), fragment: fragment.to_string(), event });
    }

    pub fn diagnostics (&self)->&[DiagnosticEntry] { self.diagnostics.as_slice() }
    pub fn diagnostic_events (&self)->impl Iterator<Item=&DiagnosticEvent> { self.diagnostics.iter().map( |e| &e.event) }

    //--- persistence handle

    pub fn key (&self)->Option<&FlightKey> { self.key.as_ref() }
    pub fn set_key (&mut self, key: FlightKey) { self.key = Some(key) }

    pub fn last_update (&self)->Option<DateTime<Utc>> { self.last_update }
    pub fn set_last_update (&mut self, date: DateTime<Utc>) { self.last_update = Some(date) }
}

impl fmt::Display for Flight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!( f, "Flight( icao24: {}", self.icao24)?;
        if let Some(cs) = &self.callsign { write!( f, ", cs: \"{cs}\"")?; }
        if let Some(af) = &self.airframe { if !af.registration.is_empty() { write!( f, ", reg: {}", af.registration)?; } }
        for (kind,track) in &self.tracks { write!( f, ", {kind}: {track}")?; }
        if !self.waypoints.is_empty() { write!( f, ", route: {:?}", self.route())?; }
        if let Some(key) = &self.key { write!( f, ", key: {key}")?; }
        write!( f, ")")
    }
}
