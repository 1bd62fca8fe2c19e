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

use std::time::Duration;
use odin_flightdb::{FlightDbConfig, load_config, waypoints::DEFAULT_FIXES};

#[test]
fn test_load_config () {
    let path = concat!( env!("CARGO_MANIFEST_DIR"), "/configs/flightdb.ron");
    let config = load_config( path).unwrap();
    println!("{config:?}");

    assert_eq!( config.max_suffix_gap, Duration::from_secs(180));
    assert_eq!( config.max_prefix_gap, Duration::from_secs(540));
    assert_eq!( config.fixes.len(), 5);
    assert_eq!( config.waypoint_detector().fixes().len(), 5);
}

#[test]
fn test_default_config () {
    let config = FlightDbConfig::default();
    assert_eq!( config.max_suffix_gap, Duration::from_secs(180));
    assert_eq!( config.waypoint_snap_km, 1.0);
    assert_eq!( config.fixes, *DEFAULT_FIXES);
}

#[test]
fn test_partial_config () {
    let config: FlightDbConfig = ron::from_str( r#"FlightDbConfig( max_suffix_gap: "90s", fixes: [] )"#).unwrap();

    assert_eq!( config.max_suffix_gap, Duration::from_secs(90));
    assert_eq!( config.max_prefix_gap, Duration::from_secs(540));
    assert!( config.fixes.is_empty());
    assert_eq!( config.continuity_test().max_suffix_gap, Duration::from_secs(90));
}

#[test]
fn test_missing_config () {
    assert!( load_config( "does/not/exist.ron").is_err());
}
