pub mod auth;
pub mod mapping;
pub mod pincode;
pub mod rto;
pub mod vehicle;
