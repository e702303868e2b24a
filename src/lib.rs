// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod budget;
pub mod cli;
pub mod commands;
pub mod db;
pub mod distribution;
pub mod errors;
pub mod icons;
pub mod ledger;
pub mod models;
pub mod savings;
pub mod stats;
pub mod store;
pub mod utils;
