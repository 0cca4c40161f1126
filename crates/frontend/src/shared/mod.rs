pub mod api;
pub mod api_utils;
pub mod config;
pub mod data;
pub mod date_utils;
pub mod list_utils;
pub mod navigation;
pub mod notifications;
pub mod storage;
pub mod theme;

#[cfg(test)]
pub mod testing;
