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

use std::fmt;
use chrono::{DateTime,Utc};
use serde::{Serialize,Deserialize};

use crate::trackpoint::{DataSourceKind, Track, Trackpoint};
use crate::errors::{malformed_fragment, Result};

/// a decoded position message as it comes out of an ADS-B/MLAT receiver feed
#[derive(Serialize,Deserialize,Debug,Clone)]
pub struct PositionReport {
    pub timestamp: DateTime<Utc>,
    pub latitude: f64,
    pub longitude: f64,
    pub altitude_ft: Option<i64>,
    pub groundspeed_kn: Option<f64>,
    pub heading: Option<f64>,
    pub is_mlat: bool,
    pub receiver: String,
}

impl PositionReport {
    pub fn to_trackpoint (&self)->Trackpoint {
        let source = if self.is_mlat { DataSourceKind::Mlat } else { DataSourceKind::Adsb };
        let mut tp = Trackpoint::new( self.timestamp, self.latitude, self.longitude, source)
            .with_receiver( self.receiver.as_str());
        if let Some(alt) = self.altitude_ft { tp = tp.with_altitude_ft( alt as f64) }
        if let Some(spd) = self.groundspeed_kn { tp = tp.with_groundspeed_kn( spd) }
        if let Some(hdg) = self.heading { tp = tp.with_heading( hdg) }
        tp
    }
}

/// one inbound delivery of time ordered positions for one aircraft and one data source.
/// Fragments are what gets glued together into Flight tracks
#[derive(Serialize,Deserialize,Debug,Clone)]
pub struct TrackFragment {
    pub icao24: String,
    pub callsign: Option<String>, // MLAT feeds often report this late
    pub source: DataSourceKind,
    pub points: Vec<Trackpoint>,
}

impl TrackFragment {
    pub fn new (icao24: impl Into<String>, callsign: Option<&str>, source: DataSourceKind, points: Vec<Trackpoint>)->Self {
        TrackFragment {
            icao24: icao24.into(),
            callsign: callsign.filter(|cs| !cs.is_empty()).map( |cs| cs.to_string()),
            source,
            points
        }
    }

    /// build a fragment from a batch of unordered receiver reports. The data source is taken from the first report,
    /// reports with duplicated timestamps are dropped. Returns None if there are no reports
    pub fn from_reports (icao24: &str, callsign: Option<&str>, mut reports: Vec<PositionReport>)->Option<Self> {
        let source = if reports.first()?.is_mlat { DataSourceKind::Mlat } else { DataSourceKind::Adsb };

        reports.sort_by_key( |r| r.timestamp);
        reports.dedup_by_key( |r| r.timestamp);
        let points = reports.iter().map( |r| {
            let mut tp = r.to_trackpoint();
            tp.source = source;
            tp
        }).collect();

        Some( TrackFragment::new( icao24, callsign, source, points))
    }

    /// check the caller contract. This has to pass before we touch any store
    pub fn validate (&self)->Result<()> {
        if self.icao24.is_empty() {
            return Err( malformed_fragment!("no aircraft identifier"))
        }
        if self.points.is_empty() {
            return Err( malformed_fragment!("{} has no trackpoints", self.icao24))
        }
        for w in self.points.windows(2) {
            if w[0].timestamp >= w[1].timestamp {
                return Err( malformed_fragment!("{} trackpoints not strictly time ordered at {}", self.icao24, w[1].timestamp))
            }
        }
        if let Some(p) = self.points.iter().find( |p| p.source != self.source) {
            return Err( malformed_fragment!("{} {} fragment contains {} trackpoint", self.icao24, self.source, p.source))
        }
        Ok(())
    }

    pub fn callsign (&self)->Option<&str> { self.callsign.as_deref().filter(|cs| !cs.is_empty()) }

    pub fn first (&self)->Option<&Trackpoint> { self.points.first() }
    pub fn last (&self)->Option<&Trackpoint> { self.points.last() }

    pub fn len (&self)->usize { self.points.len() }
    pub fn is_empty (&self)->bool { self.points.is_empty() }

    pub fn to_track (&self)->Track { Track::from_points( self.points.clone()) }
}

impl fmt::Display for TrackFragment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!( f, "[{}/{}]{}", self.icao24, self.callsign().unwrap_or(""), self.source)?;
        if let (Some(first),Some(last)) = (self.first(), self.last()) {
            write!( f, " {} +{}s", first.timestamp.format("%H:%M:%S"), (last.timestamp - first.timestamp).num_seconds())?;
        }
        write!( f, " ({} points)", self.points.len())
    }
}
