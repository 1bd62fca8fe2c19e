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
#![allow(unused)]

use chrono::{DateTime,Utc};
use odin_flightdb::{
    flight::Flight,
    fragment::TrackFragment,
    key::{derive_key, FlightKey},
    store::{FlightStore, MemFlightStore},
    trackpoint::{DataSourceKind, Trackpoint},
};

fn t (secs: i64)->DateTime<Utc> { DateTime::from_timestamp( 1_700_000_000 + secs, 0).unwrap() }

fn flight (icao24: &str, secs: &[i64])->(FlightKey,Flight) {
    let points = secs.iter().map( |s| Trackpoint::new( t(*s), 37.0, -122.0, DataSourceKind::Adsb)).collect();
    let flight = Flight::from_fragment( &TrackFragment::new( icao24, None, DataSourceKind::Adsb, points));
    (derive_key( &flight).unwrap(), flight)
}

#[tokio::test]
async fn test_most_recent_and_delete () {
    let store = MemFlightStore::new();
    let (k1,f1) = flight( "A1B2C3", &[0,5]);
    let (k2,f2) = flight( "A1B2C3", &[500,505]);
    let (k3,f3) = flight( "D4E5F6", &[10]);

    store.persist( &k1, &f1).await.unwrap();
    store.persist( &k2, &f2).await.unwrap();
    store.persist( &k3, &f3).await.unwrap();

    let recent = store.lookup_most_recent( "A1B2C3").await.unwrap().unwrap();
    assert_eq!( recent.key(), Some(&k2));
    assert!( recent.last_update().is_some());
    assert_eq!( store.lookup_all( "A1B2C3").await.unwrap().len(), 2);
    assert!( store.lookup_most_recent( "FFFFFF").await.unwrap().is_none());

    // deleting the most recent flight falls back to the previous one
    assert!( store.delete_key( &k2).await.unwrap());
    assert!( !store.delete_key( &k2).await.unwrap());
    assert_eq!( store.lookup_most_recent( "A1B2C3").await.unwrap().and_then( |f| f.key().cloned()), Some(k1.clone()));

    assert!( store.delete_key( &k1).await.unwrap());
    assert!( store.lookup_most_recent( "A1B2C3").await.unwrap().is_none());
    assert_eq!( store.len(), 1);
}

#[tokio::test]
async fn test_persist_is_upsert () {
    let store = MemFlightStore::new();
    let (key,mut f) = flight( "A1B2C3", &[0]);

    store.persist( &key, &f).await.unwrap();
    f.callsign = Some("UAL123".to_string());
    store.persist( &key, &f).await.unwrap();

    assert_eq!( store.len(), 1);
    let stored = store.lookup_key( &key).await.unwrap().unwrap();
    assert_eq!( stored.callsign.as_deref(), Some("UAL123"));
}

#[tokio::test]
async fn test_snapshot () {
    let store = MemFlightStore::new();
    let (k1,f1) = flight( "A1B2C3", &[0,5]);
    let (k2,f2) = flight( "A1B2C3", &[500]);
    store.persist( &k1, &f1).await.unwrap();
    store.persist( &k2, &f2).await.unwrap();

    let path = std::env::temp_dir().join( format!("odin_flightdb_snapshot_{}.json", std::process::id()));
    store.save_snapshot( &path).unwrap();
    let restored = MemFlightStore::load_snapshot( &path).unwrap();
    let _ = std::fs::remove_file( &path);

    assert_eq!( restored.len(), 2);
    let recent = restored.lookup_most_recent( "A1B2C3").await.unwrap().unwrap();
    assert_eq!( recent.key(), Some(&k2));
    assert_eq!( restored.lookup_key( &k1).await.unwrap().map( |f| f.n_points()), Some(2));

    // loading does not restamp flights
    for key in [&k1, &k2] {
        let saved = store.lookup_key( key).await.unwrap().and_then( |f| f.last_update());
        let loaded = restored.lookup_key( key).await.unwrap().and_then( |f| f.last_update());
        println!("{key}: saved {saved:?}, loaded {loaded:?}");
        assert!( saved.is_some());
        assert_eq!( loaded, saved);
    }
}
