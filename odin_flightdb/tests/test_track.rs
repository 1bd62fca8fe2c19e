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
use uom::si::length::foot;
use odin_flightdb::{
    errors::OdinFlightDbError,
    fragment::{PositionReport, TrackFragment},
    trackpoint::{DataSourceKind, Track, Trackpoint},
};

fn t (secs: i64)->DateTime<Utc> { DateTime::from_timestamp( 1_700_000_000 + secs, 0).unwrap() }

fn tp (secs: i64, source: DataSourceKind)->Trackpoint {
    Trackpoint::new( t(secs), 37.0 + secs as f64 * 0.001, -122.0, source)
}

fn adsb (secs: &[i64])->Vec<Trackpoint> { secs.iter().map( |s| tp( *s, DataSourceKind::Adsb)).collect() }

fn timestamps (track: &Track)->Vec<DateTime<Utc>> { track.points().iter().map( |p| p.timestamp).collect() }

// run with "cargo test test_merge -- --nocapture"

#[test]
fn test_merge_suffix () {
    let mut track = Track::from_points( adsb(&[0,5,10]));
    let n = track.merge( &adsb(&[15,20]));
    println!("{track}");

    assert_eq!( n, 2);
    assert_eq!( timestamps(&track), vec![t(0),t(5),t(10),t(15),t(20)]);
}

#[test]
fn test_merge_idempotent () {
    let frag = adsb(&[10,15,20]);

    let mut once = Track::from_points( adsb(&[0,5]));
    once.merge( &frag);

    let mut twice = Track::from_points( adsb(&[0,5]));
    twice.merge( &frag);
    let n = twice.merge( &frag);

    assert_eq!( n, 0);
    assert_eq!( once, twice);
}

#[test]
fn test_merge_out_of_order_and_overlap () {
    let mut track = Track::from_points( adsb(&[10,20,30]));
    let n = track.merge( &adsb(&[0,15,20,25,40]));
    println!("{track}");

    assert_eq!( n, 4); // 20 is already there
    assert_eq!( timestamps(&track), vec![t(0),t(10),t(15),t(20),t(25),t(30),t(40)]);
    assert!( track.points().windows(2).all( |w| w[0].timestamp < w[1].timestamp));
}

#[test]
fn test_from_points_sorts_and_dedups () {
    let track = Track::from_points( adsb(&[20,0,10,10]));
    assert_eq!( timestamps(&track), vec![t(0),t(10),t(20)]);
    assert_eq!( track.start(), Some(t(0)));
    assert_eq!( track.end(), Some(t(20)));
    assert_eq!( track.duration().as_secs(), 20);
}

#[test]
fn test_padded_window () {
    let track = Track::from_points( adsb(&[0,10,20,30,40]));

    let w = track.padded_window( t(12), t(28), 1);
    assert_eq!( w.iter().map(|p| p.timestamp).collect::<Vec<_>>(), vec![t(10),t(20),t(30)]);

    let w = track.padded_window( t(10), t(20), 0);
    assert_eq!( w.len(), 2);

    // no point inside the window - we get the bracketing points
    let w = track.padded_window( t(12), t(18), 1);
    assert_eq!( w.iter().map(|p| p.timestamp).collect::<Vec<_>>(), vec![t(10),t(20)]);
}

#[test]
fn test_fragment_validation () {
    let ok = TrackFragment::new( "a1b2c3", Some("UAL123"), DataSourceKind::Adsb, adsb(&[0,5]));
    assert!( ok.validate().is_ok());

    let empty = TrackFragment::new( "a1b2c3", None, DataSourceKind::Adsb, vec![]);
    assert!( matches!( empty.validate(), Err(OdinFlightDbError::MalformedFragment(_))));

    let no_id = TrackFragment::new( "", None, DataSourceKind::Adsb, adsb(&[0]));
    assert!( matches!( no_id.validate(), Err(OdinFlightDbError::MalformedFragment(_))));

    let unordered = TrackFragment::new( "a1b2c3", None, DataSourceKind::Adsb, adsb(&[5,0]));
    assert!( matches!( unordered.validate(), Err(OdinFlightDbError::MalformedFragment(_))));

    let mixed = TrackFragment::new( "a1b2c3", None, DataSourceKind::Mlat, adsb(&[0,5]));
    assert!( matches!( mixed.validate(), Err(OdinFlightDbError::MalformedFragment(_))));
}

#[test]
fn test_empty_callsign_is_none () {
    let frag = TrackFragment::new( "a1b2c3", Some(""), DataSourceKind::Adsb, adsb(&[0]));
    assert_eq!( frag.callsign(), None);
}

#[test]
fn test_fragment_from_reports () {
    let report = |secs: i64| PositionReport {
        timestamp: t(secs), latitude: 37.5, longitude: -122.0,
        altitude_ft: Some(5000), groundspeed_kn: Some(250.0), heading: Some(90.0),
        is_mlat: true, receiver: "rx1".to_string()
    };

    assert!( TrackFragment::from_reports( "a1b2c3", None, vec![]).is_none());

    let frag = TrackFragment::from_reports( "a1b2c3", Some("SWA12"), vec![ report(10), report(0), report(10)]).unwrap();
    println!("{frag}");

    assert_eq!( frag.source, DataSourceKind::Mlat);
    assert_eq!( frag.len(), 2);
    assert!( frag.validate().is_ok());
    assert_eq!( frag.points[0].timestamp, t(0));
    assert!( (frag.points[0].altitude.get::<foot>() - 5000.0).abs() < 1e-6);
    assert_eq!( frag.points[0].receiver, "rx1");
}
