pub mod credentials;
pub mod flows;
pub mod pages;
