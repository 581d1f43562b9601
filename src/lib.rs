// Copyright (c) 2024 Mike Tsao

#![deny(missing_docs)]
#![allow(rustdoc::private_intra_doc_links)]

//! Beatkeeper keeps a shared tempo and tells anyone who registers about beats
//! and tempo changes.
//!
//! The pieces, from the bottom up:
//!
//! * A [PulseGenerator](traits::PulseGenerator) is whatever actually
//! produces beats. Beatkeeper only tells it to start, stop, and change rate.
//! * A [TempoModel] owns the rate and the on/off state, commands the
//! generator, and notifies two independent sets of listeners:
//! [ObservesBeat](traits::ObservesBeat) and
//! [ObservesRate](traits::ObservesRate).
//! * A [Controller] turns user [Intent](control::Intent)s into model calls
//! and keeps a view's start/stop controls in sync.
//! * A [TempoDisplay](entities::TempoDisplay) is a ready-made view.
//!
//! Everything is wired explicitly:
//!
//! ```
//! use beatkeeper::prelude::*;
//! use std::sync::Arc;
//!
//! # fn main() -> anyhow::Result<()> {
//! let model = Arc::new(TempoModel::new_with(SilentPulseGenerator::default()));
//! let uids = ListenerUidFactory::default();
//! let display = TempoDisplay::new_with(uids.mint_next(), &model);
//! let controller = Controller::new_with(Arc::clone(&model), display.clone());
//!
//! controller.dispatch(Intent::Start)?;
//! controller.dispatch(Intent::Increase)?;
//! assert_eq!(model.rate(), Bpm(91));
//! assert_eq!(display.read().unwrap().readout(), RateReadout::Rate(Bpm(91)));
//! # Ok(())
//! # }
//! ```

/// A collection of imports that are useful to users of this crate. `use
/// beatkeeper::prelude::*;` for easier onboarding.
pub mod prelude {
    pub use super::{
        control::prelude::*, entities::prelude::*, model::prelude::*, observation::prelude::*,
        traits::prelude::*, types::prelude::*, util::prelude::*,
    };
}

pub use {control::Controller, model::TempoModel};

pub mod control;
pub mod entities;
pub mod model;
pub mod observation;
pub mod traits;
pub mod types;
pub mod util;
