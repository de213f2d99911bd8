pub mod application_repository;
pub mod event_repository;

// Re-export all repositories for convenient access
pub use application_repository::ApplicationRepository;
pub use event_repository::EventRepository;
