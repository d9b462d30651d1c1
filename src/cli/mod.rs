pub mod envs;
pub mod fetch;
pub mod setup;
pub mod ui;
