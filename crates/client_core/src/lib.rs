//! Client-side list state for the IoT dashboard: paginated sensor readings
//! and device events, URL query synchronization, and device commands.

pub mod controller;
pub mod device;
pub mod error;
pub mod history;
pub mod page;
pub mod query;
pub mod resource;
pub mod source;
pub mod view;
pub mod window;

pub use controller::{ListEvent, LoadOutcome, PagedListController};
pub use device::DeviceControlClient;
pub use error::{ListError, ListResult};
pub use history::{MemoryHistory, NavigationHistory};
pub use page::ListPage;
pub use query::ListQuery;
pub use resource::ListResource;
pub use source::{build_http_client, HttpListSource, ListSource};
pub use window::{PageControl, PageWindow};
