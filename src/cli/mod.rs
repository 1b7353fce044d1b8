pub mod allocate;
pub mod setup;
pub mod ui;
