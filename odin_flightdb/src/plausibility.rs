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
use chrono::{DateTime,Utc};
use geo::{Intersects, Rect, coord};

use crate::trackpoint::{bounding_rect, padded_window, Track, Trackpoint};

/// margin (in degrees) we add around bounding rects before checking time-overlapping tracks for space overlap.
/// ADS-B and MLAT positions of the same aircraft are not exactly the same
pub const SPACE_OVERLAP_MARGIN_DEG: f64 = 0.005;

/// the plausibility gate: does `fragment` continue the same physical flight as `track`?
/// Implementations have to be pure functions of the two point sequences. The returned rationale is only
/// kept for diagnostics, it is never used to make decisions
pub trait ContinuityTest {
    fn is_plausible_continuation (&self, track: &Track, fragment: &[Trackpoint])->(bool,String);
}

/// closures can be used as continuity tests (mostly useful for scripted tests)
impl<F> ContinuityTest for F where F: Fn(&Track,&[Trackpoint])->(bool,String) {
    fn is_plausible_continuation (&self, track: &Track, fragment: &[Trackpoint])->(bool,String) {
        self( track, fragment)
    }
}

/// default gate that only looks at time gaps for disjoint tracks and bounding box overlap for tracks that overlap in time.
/// This is sufficient since fragments are already known to come from the same transponder
#[derive(Debug,Clone)]
pub struct GapEnvelopeTest {
    pub max_suffix_gap: Duration, // fragment after the end of the track
    pub max_prefix_gap: Duration, // out-of-order delivery of a fragment before the start of the track
}

impl GapEnvelopeTest {
    pub fn new (max_suffix_gap: Duration, max_prefix_gap: Duration)->Self {
        GapEnvelopeTest { max_suffix_gap, max_prefix_gap }
    }
}

impl Default for GapEnvelopeTest {
    fn default()->Self {
        GapEnvelopeTest::new( Duration::from_secs(180), Duration::from_secs(540))
    }
}

impl ContinuityTest for GapEnvelopeTest {
    fn is_plausible_continuation (&self, track: &Track, fragment: &[Trackpoint])->(bool,String) {
        let (Some(t1s), Some(t1e)) = (track.start(), track.end()) else {
            return (true, "empty track, nothing to compare".to_string())
        };
        let (Some(t2s), Some(t2e)) = (fragment.first().map(|p| p.timestamp), fragment.last().map(|p| p.timestamp)) else {
            return (false, "empty fragment".to_string())
        };
        let span = format!("track {} -> {}, fragment {} -> {}", t1s.format("%H:%M:%S"), t1e.format("%H:%M:%S"), t2s.format("%H:%M:%S"), t2e.format("%H:%M:%S"));

        if t2s > t1e {
            let gap = secs_between( t1e, t2s);
            if gap <= self.max_suffix_gap {
                (true, format!("{span}: disjoint suffix after {}s, plausible", gap.as_secs()))
            } else {
                (false, format!("{span}: suffix gap of {}s is too long (>{}s)", gap.as_secs(), self.max_suffix_gap.as_secs()))
            }

        } else if t2e < t1s {
            let gap = secs_between( t2e, t1s);
            if gap <= self.max_prefix_gap {
                (true, format!("{span}: disjoint prefix before {}s, plausible", gap.as_secs()))
            } else {
                (false, format!("{span}: prefix gap of {}s is too long (>{}s)", gap.as_secs(), self.max_prefix_gap.as_secs()))
            }

        } else { // time overlap - check if the overlapping parts also overlap in space
            let start = t1s.max(t2s);
            let end = t1e.min(t2e);
            let a = bounding_rect( track.padded_window( start, end, 1));
            let b = bounding_rect( padded_window( fragment, start, end, 1));

            match (a,b) {
                (Some(a),Some(b)) if expand(&a).intersects( &expand(&b)) => {
                    (true, format!("{span}: time and space overlap, plausible"))
                }
                _ => (false, format!("{span}: no space overlap despite time overlap"))
            }
        }
    }
}

fn secs_between (earlier: DateTime<Utc>, later: DateTime<Utc>)->Duration {
    (later - earlier).to_std().unwrap_or(Duration::ZERO)
}

fn expand (r: &Rect<f64>)->Rect<f64> {
    let (min,max) = (r.min(), r.max());
    Rect::new(
        coord!{ x: min.x - SPACE_OVERLAP_MARGIN_DEG, y: min.y - SPACE_OVERLAP_MARGIN_DEG },
        coord!{ x: max.x + SPACE_OVERLAP_MARGIN_DEG, y: max.y + SPACE_OVERLAP_MARGIN_DEG }
    )
}
