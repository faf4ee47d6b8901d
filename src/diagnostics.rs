//! Error reporting collaborator shared by interaction and particle systems.

use std::error::Error;

use bevy::prelude::*;

/// Severity for [`ErrorHandler::log`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

/// Sink for diagnostic messages and handled errors.
pub trait ErrorHandler: Send + Sync {
    fn log(&self, message: &str, level: LogLevel);

    fn handle_error(&self, error: &dyn Error, context: &str);
}

/// Forwards everything to Bevy's tracing macros.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingErrorHandler;

impl ErrorHandler for TracingErrorHandler {
    fn log(&self, message: &str, level: LogLevel) {
        match level {
            LogLevel::Debug => debug!("{}", message),
            LogLevel::Info => info!("{}", message),
            LogLevel::Warn => warn!("{}", message),
            LogLevel::Error => error!("{}", message),
        }
    }

    fn handle_error(&self, error: &dyn Error, context: &str) {
        error!("{}: {}", context, error_chain(error));
    }
}

/// Render an error with its sources, outermost first.
pub fn error_chain(error: &dyn Error) -> String {
    let mut text = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        text.push_str(": ");
        text.push_str(&cause.to_string());
        source = cause.source();
    }
    text
}
