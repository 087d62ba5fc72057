pub mod auto_fill_service;

pub use auto_fill_service::{spawn_auto_fill_service, AutoFillService};
