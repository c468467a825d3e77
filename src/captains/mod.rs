// Captain (driver) accounts with their vehicles

pub mod handlers;
pub mod models;
pub mod repository;
pub mod service;

pub use handlers::{captain_profile, login_captain, logout_captain, register_captain};
pub use models::{
    Captain, CaptainAuthResponse, CaptainProfileResponse, CaptainResponse, CaptainStatus,
    Location, NewCaptain, RegisterCaptainRequest, Vehicle, VehicleRequest, VehicleType,
};
pub use repository::{CaptainStore, MemoryCaptainStore, PgCaptainStore};
pub use service::CaptainService;

#[cfg(test)]
mod tests;
