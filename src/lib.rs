// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod aggregate;
pub mod backup;
pub mod bill;
pub mod calc;
pub mod cli;
pub mod commands;
pub mod config;
pub mod db;
pub mod error;
pub mod exchange;
pub mod models;
pub mod settlement;
pub mod store;
pub mod utils;
