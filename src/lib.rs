// Intent selection for the slicer's configuration front-end.
//
// # Lock Usage Policy
//
// Collaborators are shared behind `Arc` and accessed through `&self`, so the
// in-memory implementations keep their state behind `parking_lot` locks.
// New code should follow these rules:
//
//   - Never hold a state lock while publishing a `ConfigurationEvent`.
//     Observers run synchronously and will read (and write) the same state.
//
//   - `ChangeNotifier::notify` snapshots its subscriber list before
//     dispatching, so observers may subscribe, unsubscribe or trigger further
//     notifications from inside `on_event`.

pub mod machine;
pub mod notifier;
pub mod quality_manager;
pub mod registry;
pub mod selector;

pub use print_intent_config as config;

pub use machine::{ExtruderStack, GlobalStack, MachineConfiguration, MachineManager};
pub use notifier::{ChangeNotifier, ConfigurationEvent, ConfigurationObserver, ObserverId};
pub use quality_manager::{QualityManager, StaticQualityManager};
pub use registry::{InMemoryRegistry, ProfileRegistry};
pub use selector::IntentSelector;
