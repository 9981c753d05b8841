pub mod admin;
pub mod migrate;
pub mod password;
pub mod serve;
