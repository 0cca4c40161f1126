pub mod login;
pub mod not_authorized;
pub mod not_found;
