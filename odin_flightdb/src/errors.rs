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

use thiserror::Error;

pub type Result<T> = std::result::Result<T,OdinFlightDbError>;

#[derive(Error,Debug)]
pub enum OdinFlightDbError {

    /// caller contract violation - rejected before any store access
    #[error("malformed fragment {0}")]
    MalformedFragment(String),

    #[error("flight lookup failed {0}")]
    LookupError(String),

    #[error("flight persist failed {0}")]
    PersistError(String),

    #[error("flight key error {0}")]
    KeyError(String),

    #[error("config error {0}")]
    ConfigError(String),

    #[error("IO error {0}")]
    IOError( #[from] std::io::Error),

    #[error("RON error {0}")]
    RonError( #[from] ron::error::SpannedError),

    #[error("JSON error {0}")]
    JsonError( #[from] serde_json::Error),
}

macro_rules! malformed_fragment {
    ($fmt:literal $(, $arg:expr )* ) => {
        crate::errors::OdinFlightDbError::MalformedFragment( format!( $fmt $(, $arg)* ))
    };
}
pub (crate) use malformed_fragment;

macro_rules! key_error {
    ($fmt:literal $(, $arg:expr )* ) => {
        crate::errors::OdinFlightDbError::KeyError( format!( $fmt $(, $arg)* ))
    };
}
pub (crate) use key_error;
