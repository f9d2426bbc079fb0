// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Shared application services for livemap hosts (config, map prefs).
//! Keeps the sync engine and its adapters free of storage concerns.

pub mod config;
pub mod prefs;
