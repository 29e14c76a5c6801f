pub mod alumni_admin;
pub mod pages;
