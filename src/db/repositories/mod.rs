pub mod admin;
pub mod signup;
pub mod workshop;
