pub mod application_service;
pub mod event_service;
pub mod lottery_service;

pub use application_service::ApplicationService;
pub use event_service::EventService;
pub use lottery_service::LotteryService;
