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

use std::{collections::HashMap, fs::File, io::BufReader, path::Path};
use serde::{Serialize,Deserialize};

use crate::{flight::Airframe, errors::{OdinFlightDbError, Result}};

/// best-effort airframe metadata source. A miss is never an error
pub trait AirframeLookup {
    fn lookup (&self, icao24: &str)->Option<Airframe>;
}

/// map from icao24 to airframe data that is built up over time
#[derive(Serialize,Deserialize,Debug,Clone,Default)]
pub struct AirframeCache {
    map: HashMap<String,Airframe>
}

impl AirframeCache {
    pub fn new ()->Self { AirframeCache::default() }

    /// load a map of icao24 -> Airframe from a RON or JSON file
    pub fn from_path<P: AsRef<Path>> (path: P)->Result<Self> {
        let path = path.as_ref();
        let reader = BufReader::new( File::open(path)?);
        let map: HashMap<String,Airframe> = match path.extension().and_then(|e| e.to_str()) {
            Some("ron") => ron::de::from_reader(reader)?,
            Some("json") => serde_json::from_reader(reader)?,
            _ => return Err( OdinFlightDbError::ConfigError( format!("unsupported airframe file format {path:?}")))
        };
        Ok( AirframeCache{ map } )
    }

    pub fn insert (&mut self, af: Airframe) {
        self.map.insert( af.icao24.clone(), af);
    }

    pub fn len (&self)->usize { self.map.len() }
    pub fn is_empty (&self)->bool { self.map.is_empty() }
}

impl AirframeLookup for AirframeCache {
    fn lookup (&self, icao24: &str)->Option<Airframe> {
        self.map.get(icao24).cloned()
    }
}
