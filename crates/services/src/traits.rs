// Copyright (c) 2024 Mike Tsao

//! Traits used by services.

use crossbeam::channel::{Receiver, SelectedOperation, Sender};

/// A service runs on its own daemon thread and talks to clients only through
/// crossbeam channels: clients send it Inputs, and it answers with Events.
pub trait ProvidesService<I: core::fmt::Debug, E: core::fmt::Debug> {
    /// Where clients send Inputs. Clone it freely.
    fn sender(&self) -> &Sender<I>;

    /// Sends an Input without blocking. A failure (the daemon is gone) is
    /// logged, not returned.
    fn send_input(&self, input: I) {
        if let Err(e) = self.sender().try_send(input) {
            log::warn!("While sending: {e:?}");
        }
    }

    /// Where the service's Events arrive.
    fn receiver(&self) -> &Receiver<E>;

    /// Completes a receive that a crossbeam [Select](crossbeam::channel::Select)
    /// picked, logging the error if the channel turned out to be
    /// disconnected.
    fn recv_operation<T>(
        oper: SelectedOperation,
        r: &Receiver<T>,
    ) -> Result<T, crossbeam::channel::RecvError> {
        let result = oper.recv(r);
        if let Err(e) = result {
            log::warn!("ProvidesService: while receiving from {r:?}: {e}");
        }
        result
    }
}
