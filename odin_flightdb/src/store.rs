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

use std::{fs::File, io::{BufReader,BufWriter}, path::Path, sync::atomic::{AtomicU64,Ordering}};
use async_trait::async_trait;
use dashmap::DashMap;
use serde::{Serialize,Deserialize};
use chrono::Utc;

use crate::{flight::Flight, key::FlightKey, errors::Result};

/// the persistence facade the accumulator works against.
/// `lookup_most_recent` has to reflect all previous `persist` calls for the same identifier (read-your-writes)
#[async_trait]
pub trait FlightStore: Send + Sync {
    async fn lookup_most_recent (&self, icao24: &str)->Result<Option<Flight>>;

    /// upsert - an existing flight stored under the same key is replaced
    async fn persist (&self, key: &FlightKey, flight: &Flight)->Result<()>;

    async fn lookup_key (&self, key: &FlightKey)->Result<Option<Flight>>;

    /// all flights for the given identifier, ordered by the time they were last persisted
    async fn lookup_all (&self, icao24: &str)->Result<Vec<Flight>>;

    async fn delete_key (&self, key: &FlightKey)->Result<bool>;
}

/// in-memory FlightStore. Entries carry a write sequence number that defines "most recent"
#[derive(Debug,Default)]
pub struct MemFlightStore {
    seq: AtomicU64,
    flights: DashMap<FlightKey,(u64,Flight)>,
    most_recent: DashMap<String,FlightKey>, // icao24 -> key of the last written flight
}

#[derive(Serialize,Deserialize)]
struct SnapshotEntry {
    key: FlightKey,
    flight: Flight,
}

impl MemFlightStore {
    pub fn new ()->Self { MemFlightStore::default() }

    pub fn len (&self)->usize { self.flights.len() }
    pub fn is_empty (&self)->bool { self.flights.is_empty() }

    /// store `flight` as is. Callers set key and last_update
    fn insert (&self, key: &FlightKey, flight: Flight) {
        let seq = self.seq.fetch_add( 1, Ordering::Relaxed);
        let icao24 = flight.icao24.clone();
        self.flights.insert( key.clone(), (seq,flight));
        if !icao24.is_empty() {
            self.most_recent.insert( icao24, key.clone());
        }
    }

    /// flights in write order
    fn sorted_entries (&self)->Vec<(u64,FlightKey,Flight)> {
        let mut list: Vec<(u64,FlightKey,Flight)> = self.flights.iter()
            .map( |e| (e.value().0, e.key().clone(), e.value().1.clone()))
            .collect();
        list.sort_by_key( |(seq,_,_)| *seq);
        list
    }

    pub fn save_snapshot<P: AsRef<Path>> (&self, path: P)->Result<()> {
        let entries: Vec<SnapshotEntry> = self.sorted_entries().into_iter()
            .map( |(_,key,flight)| SnapshotEntry{ key, flight })
            .collect();
        let writer = BufWriter::new( File::create(path)?);
        Ok( serde_json::to_writer_pretty( writer, &entries)? )
    }

    pub fn load_snapshot<P: AsRef<Path>> (path: P)->Result<Self> {
        let reader = BufReader::new( File::open(path)?);
        let entries: Vec<SnapshotEntry> = serde_json::from_reader(reader)?;

        let store = MemFlightStore::new();
        for SnapshotEntry{ key, mut flight } in entries {
            flight.set_key( key.clone()); // snapshots keep their last_update
            store.insert( &key, flight);
        }
        Ok(store)
    }
}

#[async_trait]
impl FlightStore for MemFlightStore {
    async fn lookup_most_recent (&self, icao24: &str)->Result<Option<Flight>> {
        let key = self.most_recent.get(icao24).map( |e| e.value().clone());
        Ok( key.and_then( |key| self.flights.get(&key).map( |e| e.value().1.clone())) )
    }

    async fn persist (&self, key: &FlightKey, flight: &Flight)->Result<()> {
        let mut flight = flight.clone();
        flight.set_key( key.clone());
        flight.set_last_update( Utc::now());
        self.insert( key, flight);
        Ok(())
    }

    async fn lookup_key (&self, key: &FlightKey)->Result<Option<Flight>> {
        Ok( self.flights.get(key).map( |e| e.value().1.clone()) )
    }

    async fn lookup_all (&self, icao24: &str)->Result<Vec<Flight>> {
        Ok( self.sorted_entries().into_iter()
            .filter( |(_,_,f)| f.icao24 == icao24)
            .map( |(_,_,f)| f)
            .collect() )
    }

    async fn delete_key (&self, key: &FlightKey)->Result<bool> {
        let Some((_,(_,flight))) = self.flights.remove(key) else { return Ok(false) };

        // re-point the most-recent index to the last remaining flight of this aircraft
        let is_indexed = self.most_recent.get( &flight.icao24).is_some_and( |e| e.value() == key);
        if is_indexed {
            let last = self.flights.iter()
                .filter( |e| e.value().1.icao24 == flight.icao24)
                .max_by_key( |e| e.value().0)
                .map( |e| e.key().clone());
            match last {
                Some(last) => { self.most_recent.insert( flight.icao24.clone(), last); }
                None => { self.most_recent.remove( &flight.icao24); }
            }
        }
        Ok(true)
    }
}
