//! Filter-and-aggregate core of the rental listings dashboard.
//!
//! Nothing in here depends on the UI toolkit: the binary feeds user
//! selections into [`state::DashboardState`] and draws the resulting
//! [`view::DashboardView`].

pub mod config;
pub mod data;
pub mod state;
pub mod view;

pub use data::error::LoadError;
pub use data::filter::{apply, FilterOptions, ListingView, Selections};
pub use data::loader::{load_file, DatasetSource};
pub use data::model::{CellValue, Furnishing, Listing, ListingTable};
pub use view::{format_rent, render, DashboardView, RenderOptions};
