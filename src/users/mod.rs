// User (rider) accounts: registration, login, profile and logout

pub mod handlers;
pub mod models;
pub mod repository;
pub mod service;

pub use handlers::{login_user, logout_user, register_user, user_profile};
pub use models::{NewUser, RegisterUserRequest, User, UserAuthResponse, UserProfileResponse, UserResponse};
pub use repository::{MemoryUserStore, PgUserStore, UserStore};
pub use service::UserService;
