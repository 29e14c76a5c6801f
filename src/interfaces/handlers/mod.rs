pub mod alumni_admin;
pub mod media;
pub mod pages;
pub mod system;
