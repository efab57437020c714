//! Publishing the active selection: environment attributes and listeners.

mod environment;
mod subscribers;

pub use environment::{AttributeNames, Environment, RootAttributes};
pub(crate) use subscribers::ListenerList;
pub use subscribers::{Listener, Subscription};
