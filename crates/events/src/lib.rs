//! Turn notification pipeline.
//!
//! - [`GameUpdateEvent`]: the trigger envelope: one accepted game mutation.
//! - [`RecipientResolver`]: user id to registered delivery addresses.
//! - [`Dispatcher`]: best-effort batched send over a [`PushChannel`].
//! - [`delivery`]: push channel implementations (FCM).
//! - [`TurnNotifier`]: `handle(event)`: evaluate, resolve, dispatch.

pub mod delivery;
pub mod dispatcher;
pub mod event;
pub mod notifier;
pub mod resolver;

pub use delivery::fcm::{FcmChannel, FcmConfig};
pub use delivery::{AddressResult, DeliveryStatus, PushChannel, PushError};
pub use dispatcher::{DispatchOutcome, Dispatcher};
pub use event::GameUpdateEvent;
pub use notifier::{HandleError, HandleOutcome, TurnNotifier};
pub use resolver::RecipientResolver;
