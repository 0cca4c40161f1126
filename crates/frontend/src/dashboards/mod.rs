pub mod overview;

pub use overview::DashboardPage;
