// Copyright (c) 2024 Mike Tsao

use crate::prelude::*;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, IntoStaticStr};

/// Something a user wants the tempo to do. A presentation layer produces
/// these, and [Controller::dispatch()](crate::control::Controller::dispatch)
/// routes each one to the matching controller operation.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Display, IntoStaticStr, Serialize, Deserialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum Intent {
    /// Turn the model on.
    Start,
    /// Turn the model off.
    Stop,
    /// Jump to a specific rate.
    SetRate(Bpm),
    /// Speed up by one step.
    Increase,
    /// Slow down by one step.
    Decrease,
}
