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

use chrono::{DateTime,Utc};
use odin_flightdb::{
    waypoints::{Fix, FixCrossingDetector, WaypointDetector, DEFAULT_FIXES},
    trackpoint::{DataSourceKind, Trackpoint},
};

fn t (secs: i64)->DateTime<Utc> { DateTime::from_timestamp( 1_700_000_000 + secs, 0).unwrap() }

fn at (secs: i64, lat: f64, lon: f64)->Trackpoint { Trackpoint::new( t(secs), lat, lon, DataSourceKind::Adsb) }

#[test]
fn test_segment_crossing () {
    let detector = FixCrossingDetector::new( vec![ Fix::new( "TESTA", 37.5, -122.0)], 1.0);

    // 37.4 -> 37.6 passes over the fix, crossing time is the end of the segment
    let points = vec![ at( 0, 37.3, -122.0), at( 10, 37.4, -122.0), at( 20, 37.6, -122.0)];
    let found: Vec<_> = detector.detect( &points).collect();
    println!("found: {found:?}");

    assert_eq!( found.len(), 1);
    assert_eq!( found[0].name, "TESTA");
    assert_eq!( found[0].time, t(20));
}

#[test]
fn test_no_crossing () {
    let detector = FixCrossingDetector::new( vec![ Fix::new( "TESTA", 37.5, -122.0)], 1.0);

    let points = vec![ at( 0, 37.3, -121.5), at( 10, 37.7, -121.5)]; // ~44km east of the fix
    assert_eq!( detector.detect( &points).count(), 0);

    let points = vec![ at( 0, 37.6, -122.0), at( 10, 37.7, -122.0)]; // north of the fix
    assert_eq!( detector.detect( &points).count(), 0);
}

#[test]
fn test_single_point () {
    let detector = FixCrossingDetector::new( vec![ Fix::new( "TESTA", 37.5, -122.0)], 1.0);

    assert_eq!( detector.detect( &[ at( 5, 37.501, -122.001)]).count(), 1);
    assert_eq!( detector.detect( &[ at( 5, 37.6, -122.0)]).count(), 0);
}

#[test]
fn test_multiple_fixes () {
    let detector = FixCrossingDetector::new( vec![
        Fix::new( "NORTH", 37.8, -122.0),
        Fix::new( "SOUTH", 37.2, -122.0),
        Fix::new( "EAST", 37.5, -121.0),
    ], 1.0);

    let points: Vec<Trackpoint> = (0..=10).map( |i| at( i*10, 37.1 + i as f64 * 0.08, -122.0)).collect();
    let mut found: Vec<_> = detector.detect( &points).map( |wc| wc.name).collect();
    found.sort();

    assert_eq!( found, vec!["NORTH".to_string(), "SOUTH".to_string()]);
}

#[test]
fn test_default_detector () {
    let detector = FixCrossingDetector::default();
    assert_eq!( detector.fixes(), DEFAULT_FIXES.as_slice());

    // straight south over MENLO
    let points = vec![ at( 0, 37.50, -122.1533), at( 30, 37.44, -122.1533)];
    let found: Vec<_> = detector.detect( &points).map( |wc| wc.name).collect();
    assert_eq!( found, vec!["MENLO".to_string()]);
}
