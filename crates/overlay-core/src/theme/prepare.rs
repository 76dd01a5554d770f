//! Background renderer preparation.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use super::Theme;
use crate::component::Component;
use crate::error::{Result, ThemeError};

/// Handle to a background prepare pass started by
/// [`ThemeBuilder::async_build_and_prepare`](super::ThemeBuilder::async_build_and_prepare).
///
/// Dropping the handle detaches the thread; failures are still logged.
#[derive(Debug)]
pub struct PrepareHandle {
    handle: JoinHandle<Result<usize>>,
}

impl PrepareHandle {
    pub(crate) fn spawn(theme: Theme, components: Vec<Arc<dyn Component>>) -> Result<Self> {
        let total = components.len();
        let handle = thread::Builder::new()
            .name("theme-prepare".to_string())
            .spawn(move || {
                let outcome = panic::catch_unwind(AssertUnwindSafe(|| theme.prepare(&components)));
                match outcome {
                    Ok(Ok(prepared)) => {
                        log::debug!("background prepare finished: {}/{} renderers", prepared, total);
                        Ok(prepared)
                    }
                    Ok(Err(err)) => {
                        log::error!("background prepare failed: {}", err);
                        Err(err)
                    }
                    Err(payload) => {
                        let message = panic_message(payload.as_ref());
                        log::error!("background prepare panicked: {}", message);
                        Err(ThemeError::PrepareAborted(message))
                    }
                }
            })?;

        Ok(Self { handle })
    }

    /// Whether the background pass has finished.
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Wait for the background pass.
    ///
    /// Returns the number of components prepared, or the error that stopped
    /// the pass.
    pub fn join(self) -> Result<usize> {
        match self.handle.join() {
            Ok(result) => result,
            Err(payload) => Err(ThemeError::PrepareAborted(panic_message(payload.as_ref()))),
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
