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

use std::{fmt, sync::Arc};
use dashmap::DashMap;
use tokio::sync::Mutex;
use tracing::{debug,info,warn};

use crate::{
    FlightDbConfig,
    airframe::AirframeLookup,
    errors::Result,
    flight::{DiagnosticEvent, Flight},
    fragment::TrackFragment,
    key::{derive_key, FlightKey},
    plausibility::{ContinuityTest, GapEnvelopeTest},
    store::FlightStore,
    trackpoint::{DataSourceKind, Track, Trackpoint},
    waypoints::{FixCrossingDetector, WaypointCrossing, WaypointDetector},
};

/* #region target selection *************************************************************************************/

/// pick the bucket a new fragment should be checked against. If a flight has non-empty tracks from both sources
/// we use the one that was updated last, which lets a flight hand over between ADS-B and MLAT coverage
pub fn select_accumulation_target (flight: &Flight)->Option<DataSourceKind> {
    let adsb = flight.track( DataSourceKind::Adsb).filter( |t| !t.is_empty());
    let mlat = flight.track( DataSourceKind::Mlat).filter( |t| !t.is_empty());

    match (adsb, mlat) {
        (None, None) => None,
        (Some(_), None) => Some(DataSourceKind::Adsb),
        (None, Some(_)) => Some(DataSourceKind::Mlat),
        (Some(adsb), Some(mlat)) => if mlat.end() > adsb.end() { Some(DataSourceKind::Mlat) } else { Some(DataSourceKind::Adsb) }
    }
}

pub fn select_target (flight: &Flight)->Option<&Track> {
    select_accumulation_target( flight).and_then( |kind| flight.track(kind))
}

/* #endregion target selection */

/* #region fragment merge ***************************************************************************************/

/// the decision that was made for a fragment
#[derive(Debug,Clone,Copy,PartialEq,Eq)]
pub enum FragmentBranch {
    NewIdentity,           // no flight for this aircraft yet
    FirstTrackOnAggregate, // flight without any (non-empty) track
    Extend,                // fragment continues the selected track
    Split,                 // fragment does not continue the selected track, start a new flight
}

impl fmt::Display for FragmentBranch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FragmentBranch::NewIdentity => "new identity",
            FragmentBranch::FirstTrackOnAggregate => "first track on aggregate",
            FragmentBranch::Extend => "extend",
            FragmentBranch::Split => "split",
        };
        write!( f, "{s}")
    }
}

/// result of folding a fragment into the (optional) most recent flight of its aircraft
#[derive(Debug)]
pub struct Accumulation {
    pub flight: Flight,
    pub branch: FragmentBranch,
    pub n_added: usize,

    /// last persisted point of the destination track if the fragment is a strict suffix of it. This is only
    /// used as additional waypoint detection input and never stored
    pub bridge: Option<Trackpoint>,
}

impl Accumulation {
    /// the points we run waypoint detection on: the fragment, prefixed with the bridge point if there is one
    pub fn detection_input (&self, frag: &TrackFragment)->Vec<Trackpoint> {
        let mut points = Vec::with_capacity( frag.len() + 1);
        if let Some(p) = &self.bridge { points.push( p.clone()) }
        points.extend_from_slice( &frag.points);
        points
    }
}

/// merge `frag` into `existing` (the most recent flight for the fragment's aircraft, if any).
/// This does not touch any store. A rejected fragment never modifies `existing`, it produces a new Flight
pub fn accumulate<C> (existing: Option<Flight>, frag: &TrackFragment, gate: &C)->Accumulation where C: ContinuityTest + ?Sized {
    let label = frag.to_string();

    let Some(mut flight) = existing else {
        let mut flight = Flight::from_fragment( frag);
        flight.log( &label, DiagnosticEvent::NewIdentity{ source: frag.source });
        debug!("{label}: new identity");
        return Accumulation{ flight, branch: FragmentBranch::NewIdentity, n_added: frag.len(), bridge: None }
    };

    let Some(target) = select_accumulation_target( &flight) else {
        flight.insert_track( frag.source, frag.to_track());
        flight.log( &label, DiagnosticEvent::FirstTrackOnAggregate{ source: frag.source });
        debug!("{label}: first track on existing flight");
        backfill_callsign( &mut flight, frag, &label);
        return Accumulation{ flight, branch: FragmentBranch::FirstTrackOnAggregate, n_added: frag.len(), bridge: None }
    };

    let (accepted, rationale) = match flight.track(target) {
        Some(track) => gate.is_plausible_continuation( track, &frag.points),
        None => (false, format!("no {target} track")) // can't happen, selector only returns existing tracks
    };

    if accepted {
        backfill_callsign( &mut flight, frag, &label);

        let bridge = match (flight.track(frag.source).and_then(|t| t.last()), frag.first()) {
            (Some(last), Some(first)) if last.timestamp < first.timestamp => Some(last.clone()),
            _ => None
        };

        // on cross-source acceptance this creates the bucket for the fragment source
        let dest = flight.ensure_track( frag.source);
        let n_existing = dest.len();
        let n_added = dest.merge( &frag.points);

        debug!("{label}: extending {target} (adding {n_added} to {n_existing} points): {rationale}");
        flight.log( &label, DiagnosticEvent::Extended{ source: frag.source, target, n_added, n_existing, rationale });
        Accumulation{ flight, branch: FragmentBranch::Extend, n_added, bridge }

    } else {
        info!("{label}: not a plausible continuation of {target} track, starting new flight: {rationale}");
        let mut flight = Flight::from_fragment( frag);
        flight.log( &label, DiagnosticEvent::Split{ rationale });
        Accumulation{ flight, branch: FragmentBranch::Split, n_added: frag.len(), bridge: None }
    }
}

fn backfill_callsign (flight: &mut Flight, frag: &TrackFragment, label: &str) {
    if flight.backfill_callsign( frag.callsign()) {
        if let Some(callsign) = flight.callsign.clone() {
            debug!("{label}: backfilled callsign {callsign}");
            flight.log( label, DiagnosticEvent::CallsignBackfilled{ callsign });
        }
    }
}

/// add all fixes detected in `points` that the flight does not have yet. Returns the newly added crossings
pub fn apply_waypoints<W> (flight: &mut Flight, detector: &W, points: &[Trackpoint], label: &str)->Vec<WaypointCrossing>
    where W: WaypointDetector + ?Sized
{
    let mut added = Vec::new();
    for wc in detector.detect( points) {
        if flight.set_waypoint( &wc.name, wc.time) {
            flight.log( label, DiagnosticEvent::WaypointFound{ name: wc.name.clone(), time: wc.time });
            added.push(wc);
        }
    }
    added
}

/// enrich with airframe data if the flight does not have it yet
pub fn apply_airframe<A> (flight: &mut Flight, airframes: &A, label: &str) where A: AirframeLookup + ?Sized {
    if flight.needs_airframe() {
        match airframes.lookup( &flight.icao24) {
            Some(af) => {
                if flight.overlay_airframe( &af) {
                    flight.log( label, DiagnosticEvent::AirframeFound{ registration: af.registration.clone() });
                }
            }
            None => debug!("{label}: no airframe for {}", flight.icao24)
        }
    }
}

/* #endregion fragment merge */

/* #region accumulator ******************************************************************************************/

/// what happened to a fragment that was added
#[derive(Debug,Clone)]
pub struct AddOutcome {
    pub branch: FragmentBranch,
    pub key: FlightKey,
    pub n_added: usize,
    pub waypoints: Vec<WaypointCrossing>, // newly detected waypoints
}

/// builds flights from track fragments, one read-modify-write cycle per fragment.
/// Fragments for the same aircraft are serialized through a per-identifier lock, fragments for different aircraft
/// can be processed concurrently
pub struct FlightAccumulator <S,C,W,A>
    where S: FlightStore, C: ContinuityTest, W: WaypointDetector, A: AirframeLookup
{
    store: S,
    gate: C,
    detector: W,
    airframes: A,
    locks: LockMap,
}

impl<S,A> FlightAccumulator<S,GapEnvelopeTest,FixCrossingDetector,A> where S: FlightStore, A: AirframeLookup {
    pub fn from_config (store: S, airframes: A, config: &FlightDbConfig)->Self {
        FlightAccumulator::new( store, config.continuity_test(), config.waypoint_detector(), airframes)
    }
}

impl<S,C,W,A> FlightAccumulator<S,C,W,A>
    where S: FlightStore, C: ContinuityTest, W: WaypointDetector, A: AirframeLookup
{
    pub fn new (store: S, gate: C, detector: W, airframes: A)->Self {
        FlightAccumulator { store, gate, detector, airframes, locks: DashMap::new() }
    }

    pub fn store (&self)->&S { &self.store }

    /// process a single fragment. This either persists the fully updated flight or nothing.
    /// There are no retries - since keys are content derived the caller can safely re-deliver on error
    pub async fn add_track_fragment (&self, frag: &TrackFragment)->Result<AddOutcome> {
        frag.validate()?;

        // entry has to outlive the guard, both are dropped on every exit path including cancellation
        let entry = LockEntry::acquire( &self.locks, &frag.icao24);
        let _guard = entry.mutex().lock().await;
        self.process( frag).await
    }

    async fn process (&self, frag: &TrackFragment)->Result<AddOutcome> {
        let existing = self.store.lookup_most_recent( &frag.icao24).await?;

        let acc = accumulate( existing, frag, &self.gate);
        let detection_input = acc.detection_input( frag);
        let Accumulation{ mut flight, branch, n_added, .. } = acc;
        let label = frag.to_string();

        apply_airframe( &mut flight, &self.airframes, &label);
        let waypoints = apply_waypoints( &mut flight, &self.detector, &detection_input, &label);

        let key = derive_key( &flight)?;
        flight.set_key( key.clone());
        self.store.persist( &key, &flight).await?;

        debug!("{label}: {branch} -> persisted {flight}");
        Ok( AddOutcome{ branch, key, n_added, waypoints })
    }

    /// number of identifiers that currently have a fragment in flight (processed or waiting)
    pub fn n_active_identifiers (&self)->usize { self.locks.len() }
}

type LockMap = DashMap<String,Arc<Mutex<()>>>;

/// per-identifier lock map entry that is removed when the last user goes away
struct LockEntry<'a> {
    locks: &'a LockMap,
    icao24: &'a str,
    mutex: Arc<Mutex<()>>,
}

impl<'a> LockEntry<'a> {
    fn acquire (locks: &'a LockMap, icao24: &'a str)->Self {
        let mutex = locks.entry( icao24.to_string()).or_default().value().clone();
        LockEntry { locks, icao24, mutex }
    }

    fn mutex (&self)->&Mutex<()> { &self.mutex }
}

impl Drop for LockEntry<'_> {
    fn drop (&mut self) {
        // the map and this entry are the only references if nobody else holds or waits for the lock
        self.locks.remove_if( self.icao24, |_,mutex| Arc::ptr_eq( mutex, &self.mutex) && Arc::strong_count(mutex) == 2);
    }
}

/* #endregion accumulator */
