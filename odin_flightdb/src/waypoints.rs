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
use lazy_static::lazy_static;
use geo::{Intersects, Line, Point, Rect, coord};

use crate::trackpoint::Trackpoint;

const KM_PER_DEG_LAT: f64 = 111.32;

/// a named geographic fix
#[derive(Serialize,Deserialize,Debug,Clone,PartialEq)]
pub struct Fix {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl Fix {
    pub fn new (name: &str, latitude: f64, longitude: f64)->Self {
        Fix { name: name.to_string(), latitude, longitude }
    }

    /// lat/lon aligned box with half-size `snap_km` around the fix
    pub fn snap_box (&self, snap_km: f64)->Rect<f64> {
        let dlat = snap_km / KM_PER_DEG_LAT;
        let dlon = snap_km / (KM_PER_DEG_LAT * self.latitude.to_radians().cos().max(0.01));
        Rect::new(
            coord!{ x: self.longitude - dlon, y: self.latitude - dlat },
            coord!{ x: self.longitude + dlon, y: self.latitude + dlat }
        )
    }
}

lazy_static! {
    /// approximate positions of some SFO arrival fixes, used if no catalogue is configured
    pub static ref DEFAULT_FIXES: Vec<Fix> = vec![
        Fix::new( "SERFR", 36.0683, -121.3647),
        Fix::new( "EPICK", 36.9506, -121.9522),
        Fix::new( "EDDYY", 37.3263, -122.0997),
        Fix::new( "SWELS", 37.3688, -122.0500),
        Fix::new( "MENLO", 37.4637, -122.1533),
    ];
}

#[derive(Serialize,Deserialize,Debug,Clone,PartialEq)]
pub struct WaypointCrossing {
    pub name: String,
    pub time: DateTime<Utc>,
}

impl fmt::Display for WaypointCrossing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!( f, "{}@{}", self.name, self.time.format("%H:%M:%S"))
    }
}

/// finds the fixes a sequence of trackpoints crosses. Results are produced lazily and the returned
/// iterator is consumed once per call
pub trait WaypointDetector {
    fn detect<'a> (&'a self, points: &'a [Trackpoint])->Box<dyn Iterator<Item=WaypointCrossing> + 'a>;
}

/// detector that checks the straight segments between consecutive trackpoints against a box around each fix.
/// The crossing time is the timestamp of the end point of the first matching segment
#[derive(Debug,Clone)]
pub struct FixCrossingDetector {
    fixes: Vec<Fix>,
    snap_km: f64,
}

impl FixCrossingDetector {
    pub fn new (fixes: Vec<Fix>, snap_km: f64)->Self {
        FixCrossingDetector { fixes, snap_km }
    }

    pub fn fixes (&self)->&[Fix] { self.fixes.as_slice() }

    fn crossing (&self, fix: &Fix, points: &[Trackpoint])->Option<WaypointCrossing> {
        let bx = fix.snap_box( self.snap_km);

        let time = if let [p] = points {
            bx.intersects( &Point::from( p.coord())).then_some( p.timestamp)
        } else {
            points.windows(2)
                .find( |w| bx.intersects( &Line::new( w[0].coord(), w[1].coord())))
                .map( |w| w[1].timestamp)
        }?;

        Some( WaypointCrossing{ name: fix.name.clone(), time })
    }
}

impl Default for FixCrossingDetector {
    fn default()->Self { FixCrossingDetector::new( DEFAULT_FIXES.clone(), 1.0) }
}

impl WaypointDetector for FixCrossingDetector {
    fn detect<'a> (&'a self, points: &'a [Trackpoint])->Box<dyn Iterator<Item=WaypointCrossing> + 'a> {
        Box::new( self.fixes.iter().filter_map( move |fix| self.crossing( fix, points)))
    }
}
