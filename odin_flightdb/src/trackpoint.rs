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

use std::{fmt, time::Duration};
use chrono::{DateTime,Utc};
use serde::{Serialize,Deserialize};
use uom::si::{f64::{Length,Velocity}, length::foot, velocity::knot};
use geo::{BoundingRect, Coord, LineString, Rect};

/// the surveillance system a trackpoint was obtained from. Each kind gets its own track bucket in a Flight
#[derive(Serialize,Deserialize,Debug,Clone,Copy,PartialEq,Eq,PartialOrd,Ord,Hash)]
pub enum DataSourceKind {
    /// primary surveillance (aircraft broadcasts its own position)
    #[serde(rename="ADSB")] Adsb,
    /// multilateration (position computed from receiver time differences)
    #[serde(rename="MLAT")] Mlat,
}

impl DataSourceKind {
    pub fn track_name (&self)->&'static str {
        match self {
            DataSourceKind::Adsb => "ADSB",
            DataSourceKind::Mlat => "MLAT",
        }
    }
}

impl fmt::Display for DataSourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!( f, "{}", self.track_name())
    }
}

/// a single time-stamped position sample. Trackpoints are never modified after creation
#[derive(Serialize,Deserialize,Debug,Clone,PartialEq)]
pub struct Trackpoint {
    pub timestamp: DateTime<Utc>,
    pub latitude: f64,  // degrees
    pub longitude: f64, // degrees
    pub altitude: Length, // pressure altitude
    pub groundspeed: Velocity,
    pub heading: f64, // [0,360) degrees
    pub source: DataSourceKind,
    pub receiver: String,
}

impl Trackpoint {
    pub fn new (timestamp: DateTime<Utc>, latitude: f64, longitude: f64, source: DataSourceKind)->Self {
        Trackpoint {
            timestamp, latitude, longitude,
            altitude: Length::new::<foot>(0.0),
            groundspeed: Velocity::new::<knot>(0.0),
            heading: 0.0,
            source,
            receiver: String::new(),
        }
    }

    pub fn with_altitude_ft (mut self, alt_ft: f64)->Self { self.altitude = Length::new::<foot>(alt_ft); self }
    pub fn with_groundspeed_kn (mut self, spd_kn: f64)->Self { self.groundspeed = Velocity::new::<knot>(spd_kn); self }
    pub fn with_heading (mut self, hdg: f64)->Self { self.heading = hdg; self }
    pub fn with_receiver (mut self, receiver: impl Into<String>)->Self { self.receiver = receiver.into(); self }

    /// geo coordinate (x = longitude, y = latitude)
    pub fn coord (&self)->Coord<f64> { Coord { x: self.longitude, y: self.latitude } }
}

impl fmt::Display for Trackpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!( f, "[{}] ({:.5},{:.5}) {:.0}ft, {:.0}kn, {:.0}deg {}",
            self.timestamp.format("%H:%M:%S"), self.latitude, self.longitude,
            self.altitude.get::<foot>(), self.groundspeed.get::<knot>(), self.heading, self.source)
    }
}

/// time ordered sequence of trackpoints from a single source.
/// Timestamps are strictly increasing, which means there are no two points with the same timestamp
#[derive(Serialize,Deserialize,Debug,Clone,PartialEq,Default)]
#[serde(transparent)]
pub struct Track(Vec<Trackpoint>);

impl Track {
    pub fn new ()->Self { Track(Vec::new()) }

    /// sort and remove points with duplicated timestamps (first one wins)
    pub fn from_points (mut points: Vec<Trackpoint>)->Self {
        points.sort_by_key( |p| p.timestamp);
        points.dedup_by_key( |p| p.timestamp);
        Track(points)
    }

    pub fn points (&self)->&[Trackpoint] { self.0.as_slice() }
    pub fn len (&self)->usize { self.0.len() }
    pub fn is_empty (&self)->bool { self.0.is_empty() }

    pub fn first (&self)->Option<&Trackpoint> { self.0.first() }
    pub fn last (&self)->Option<&Trackpoint> { self.0.last() }

    pub fn start (&self)->Option<DateTime<Utc>> { self.0.first().map(|p| p.timestamp) }
    pub fn end (&self)->Option<DateTime<Utc>> { self.0.last().map(|p| p.timestamp) }

    pub fn duration (&self)->Duration {
        match (self.start(), self.end()) {
            (Some(s),Some(e)) => (e - s).to_std().unwrap_or(Duration::ZERO),
            _ => Duration::ZERO
        }
    }

    /// insert points in time order, skipping any point whose timestamp is already in the track.
    /// Returns the number of points that were actually added
    pub fn merge (&mut self, points: &[Trackpoint])->usize {
        let mut n_added = 0;
        for p in points {
            // fast path for the common case of a strict suffix
            if self.0.last().map_or( true, |last| last.timestamp < p.timestamp) {
                self.0.push( p.clone());
                n_added += 1;
            } else if let Err(idx) = self.0.binary_search_by_key( &p.timestamp, |tp| tp.timestamp) {
                self.0.insert( idx, p.clone());
                n_added += 1;
            }
        }
        n_added
    }

    pub fn padded_window (&self, start: DateTime<Utc>, end: DateTime<Utc>, padding: usize)->&[Trackpoint] {
        padded_window( self.points(), start, end, padding)
    }

    pub fn bounding_rect (&self)->Option<Rect<f64>> { bounding_rect( self.points()) }
}

impl From<Vec<Trackpoint>> for Track {
    fn from (points: Vec<Trackpoint>)->Self { Track::from_points(points) }
}

impl fmt::Display for Track {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.first(), self.last()) {
            (Some(first),Some(last)) => write!( f, "Track( {} points, {} -> {} )",
                self.len(), first.timestamp.format("%H:%M:%S"), last.timestamp.format("%H:%M:%S")),
            _ => write!( f, "Track( empty )")
        }
    }
}

pub fn bounding_rect (points: &[Trackpoint])->Option<Rect<f64>> {
    let ls: LineString<f64> = points.iter().map( |p| p.coord()).collect();
    ls.bounding_rect()
}

/// the points within [start,end] (inclusive), plus up to `padding` neighbors on either side.
/// If no point falls into the window the result holds the (up to `padding`) points bracketing it
pub fn padded_window (points: &[Trackpoint], start: DateTime<Utc>, end: DateTime<Utc>, padding: usize)->&[Trackpoint] {
    let i0 = points.partition_point( |p| p.timestamp < start);
    let i1 = points.partition_point( |p| p.timestamp <= end).max(i0);

    &points[i0.saturating_sub(padding) .. (i1 + padding).min(points.len())]
}
