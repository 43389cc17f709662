//! Plugin composition for data grids.
//!
//! Independently authored plugins contribute named getters, actions and
//! templates to one ordered [`PluginStack`]. The [`PluginHost`] resolves a
//! single consistent computed state from them, runs actions in batches that
//! publish at most one change notification per field, and reconciles
//! controlled and uncontrolled plugin state.

pub mod config;
pub mod dispatch;
pub mod error;
pub mod host;
pub mod plugin;
pub mod plugins;
pub mod resolve;
pub mod stack;
pub mod state;
pub mod value;

pub use config::{CollisionPolicy, HostConfig};
pub use dispatch::{ActionContext, Batch, CommitReport, FieldChange};
pub use error::{BoxError, CapabilityKind, EngineError, Result};
pub use host::{ComputedState, PluginHost};
pub use plugin::{
    Capability, Plugin, PluginDefinition, PluginDependency, PluginId, PluginRegistration,
    registered_plugins,
};
pub use resolve::GetterContext;
pub use stack::{PluginStack, StackLint};
pub use state::{Controllable, FieldBinding, FieldMode};
pub use value::Value;

pub mod prelude {
    pub use crate::config::{CollisionPolicy, HostConfig};
    pub use crate::dispatch::{ActionContext, CommitReport};
    pub use crate::error::{EngineError, Result};
    pub use crate::host::PluginHost;
    pub use crate::plugin::{Plugin, PluginDefinition, PluginId};
    pub use crate::plugins::{
        FilteringState, GridCore, GroupingState, LocalFiltering, LocalPaging, PagingState,
        RowDetailState, SelectionState, SortingState,
    };
    pub use crate::resolve::GetterContext;
    pub use crate::state::{Controllable, FieldBinding};
    pub use crate::value::Value;
}
